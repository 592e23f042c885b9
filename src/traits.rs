use crate::{
    error::TransportError,
    types::book::{BookEntry, BookId},
};

#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    async fn list(&self) -> Result<Vec<BookEntry>, TransportError>;

    async fn create(&self, entry: &BookEntry) -> Result<BookEntry, TransportError>;

    /// Replaces every field of book `id`. Whether `id` exists is for the server to decide.
    async fn update(&self, id: BookId, entry: &BookEntry) -> Result<BookEntry, TransportError>;

    async fn delete(&self, id: BookId) -> Result<(), TransportError>;
}
