use tracing::{debug, info, warn};

use crate::{
    error::{FormError, TransportError, ViewError},
    form::EntryForm,
    traits::CatalogApi,
    types::{
        book::{BookEntry, BookId},
        notification::Notification,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    data:   Option<Vec<BookEntry>>,
    status: FetchStatus,
    stale:  bool,
}

impl QueryCache {
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.data.is_none() && matches!(self.status, FetchStatus::Idle | FetchStatus::Fetching)
    }

    pub fn entries(&self) -> &[BookEntry] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    fn begin_fetch(&mut self) {
        self.status = FetchStatus::Fetching;
    }

    fn resolve(&mut self, entries: Vec<BookEntry>) {
        self.data = Some(entries);
        self.status = FetchStatus::Ready;
        self.stale = false;
    }

    fn fail(&mut self) {
        self.status = FetchStatus::Failed;
        self.stale = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub id:         Option<BookId>,
    pub title:      &'a str,
    pub genre:      &'a str,
    pub page_count: i64,
    pub cover:      Option<&'a str>,
}

impl<'a> From<&'a BookEntry> for Card<'a> {
    fn from(entry: &'a BookEntry) -> Self {
        Self {
            id:         entry.id,
            title:      &entry.title,
            genre:      &entry.genre,
            page_count: entry.page_count,
            cover:      entry.cover(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen<'a> {
    Loading,
    Empty,
    Grid(Vec<Card<'a>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingMutation {
    Create(BookEntry),
    Update(BookId, BookEntry),
}

impl PendingMutation {
    pub async fn send<C: CatalogApi>(&self, client: &C) -> Result<BookEntry, TransportError> {
        match self {
            PendingMutation::Create(entry) => client.create(entry).await,
            PendingMutation::Update(id, entry) => client.update(*id, entry).await,
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            PendingMutation::Create(_) => "Book created",
            PendingMutation::Update(..) => "Book updated",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            PendingMutation::Create(_) => "Could not create book",
            PendingMutation::Update(..) => "Could not update book",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Completion {
    Succeeded,
    /// The failure was turned into a notification and the dialog is still open.
    Failed,
}

pub struct CatalogView<C> {
    client:           C,
    cache:            QueryCache,
    form:             Option<EntryForm>,
    editing:          Option<BookId>,
    pending_delete:   Option<BookId>,
    mutation_pending: bool,
    notifications:    Vec<Notification>,
}

impl<C: CatalogApi> CatalogView<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cache: QueryCache::default(),
            form: None,
            editing: None,
            pending_delete: None,
            mutation_pending: false,
            notifications: vec![],
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn entries(&self) -> &[BookEntry] {
        self.cache.entries()
    }

    /// Fetches the list unless it is loaded or already being fetched. A failed first load is
    /// retried.
    pub async fn mount(&mut self) {
        let retry = self.cache.status() == FetchStatus::Failed && !self.cache.is_loaded();
        if self.cache.status() == FetchStatus::Idle || retry {
            self.refresh().await;
        }
    }

    pub async fn refresh(&mut self) {
        self.cache.begin_fetch();
        match self.client.list().await {
            Ok(entries) => {
                debug!("Loaded {} books", entries.len());
                self.cache.resolve(entries);
            }
            Err(e) => {
                warn!("Loading books failed: {e}");
                self.cache.fail();
                self.notify(Notification::error("Could not load books"));
            }
        }
    }

    pub async fn refresh_if_stale(&mut self) {
        if self.cache.is_stale() {
            self.refresh().await;
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        if self.cache.is_loading() {
            return Screen::Loading;
        }
        let entries = self.cache.entries();
        if entries.is_empty() {
            Screen::Empty
        } else {
            Screen::Grid(entries.iter().map(Card::from).collect())
        }
    }

    pub fn form(&self) -> Option<&EntryForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut EntryForm> {
        self.form.as_mut()
    }

    pub fn editing(&self) -> Option<BookId> {
        self.editing
    }

    pub fn is_mutation_pending(&self) -> bool {
        self.mutation_pending
    }

    pub fn open_create(&mut self) {
        self.form = Some(EntryForm::new());
        self.editing = None;
    }

    pub fn open_edit(&mut self, id: BookId) -> Result<(), ViewError> {
        let entry = self
            .entries()
            .iter()
            .find(|entry| entry.id == Some(id))
            .ok_or(ViewError::UnknownBook(id))?;
        self.form = Some(EntryForm::edit(entry));
        self.editing = Some(id);
        Ok(())
    }

    /// Dismisses the form. A request already in flight still completes.
    pub fn close_form(&mut self) {
        self.form = None;
        self.editing = None;
    }

    pub fn begin_submit(&mut self) -> Result<PendingMutation, ViewError> {
        if self.mutation_pending {
            return Err(FormError::Busy.into());
        }
        let form = self.form.as_mut().ok_or(ViewError::NoActiveForm)?;
        let entry = form.submit()?;
        self.mutation_pending = true;
        Ok(match self.editing {
            Some(id) => PendingMutation::Update(id, entry),
            None => PendingMutation::Create(entry),
        })
    }

    pub fn complete_submit(
        &mut self,
        mutation: &PendingMutation,
        result: Result<BookEntry, TransportError>,
    ) -> Completion {
        self.mutation_pending = false;
        match result {
            Ok(saved) => {
                info!("{} ({:?})", mutation.success_message(), saved.id);
                self.cache.invalidate();
                self.close_form();
                self.notify(Notification::success(mutation.success_message()));
                Completion::Succeeded
            }
            Err(e) => {
                warn!("{}: {e}", mutation.failure_message());
                if let Some(form) = self.form.as_mut() {
                    form.resume();
                }
                self.notify(Notification::error(mutation.failure_message()));
                Completion::Failed
            }
        }
    }

    pub async fn submit_form(&mut self) -> Result<Completion, ViewError> {
        let mutation = self.begin_submit()?;
        let result = mutation.send(&self.client).await;
        let completion = self.complete_submit(&mutation, result);
        self.refresh_if_stale().await;
        Ok(completion)
    }

    pub fn pending_delete(&self) -> Option<BookId> {
        self.pending_delete
    }

    pub fn request_delete(&mut self, id: BookId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Deletes the book awaiting confirmation. A failure keeps the prompt so it can be retried.
    pub async fn confirm_delete(&mut self) -> Result<Completion, ViewError> {
        let id = self.pending_delete.ok_or(ViewError::NoPendingDelete)?;
        match self.client.delete(id).await {
            Ok(()) => {
                info!("Book deleted ({id})");
                self.cache.invalidate();
                self.pending_delete = None;
                self.notify(Notification::success("Book deleted"));
                self.refresh_if_stale().await;
                Ok(Completion::Succeeded)
            }
            Err(e) => {
                warn!("Could not delete book {id}: {e}");
                self.notify(Notification::error("Could not delete book"));
                Ok(Completion::Failed)
            }
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
