use std::{collections::BTreeMap, fmt::Display};

use reqwest::Url;

use crate::{
    error::{FormError, ValidationError},
    types::book::{BookEntry, BookId},
};

pub const TITLE_MAX_LEN: usize = 200;
pub const GENRE_MAX_LEN: usize = 100;
pub const PAGE_COUNT_MIN: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Genre,
    PageCount,
    CoverUrl,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Genre, Field::PageCount, Field::CoverUrl];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Genre => "Genre",
            Field::PageCount => "Page count",
            Field::CoverUrl => "Cover URL",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::CoverUrl)
    }

    pub fn constraints(&self) -> &'static [Constraint] {
        match self {
            Field::Title => &[Constraint::Required, Constraint::MaxLength(TITLE_MAX_LEN)],
            Field::Genre => &[Constraint::Required, Constraint::MaxLength(GENRE_MAX_LEN)],
            Field::PageCount => &[Constraint::Integer, Constraint::AtLeast(PAGE_COUNT_MIN)],
            Field::CoverUrl => &[Constraint::Url],
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A named rule over the raw text of one field. Numbers and URLs are read with surrounding
/// whitespace ignored; text is taken as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Required,
    MaxLength(usize),
    Integer,
    AtLeast(i64),
    Url,
}

impl Constraint {
    pub fn check(&self, field: Field, value: &str) -> Option<ValidationError> {
        match *self {
            Constraint::Required => value.is_empty().then_some(ValidationError::Required(field)),
            Constraint::MaxLength(max) => {
                (value.chars().count() > max).then_some(ValidationError::TooLong { field, max })
            }
            Constraint::Integer => {
                parse_count(value.trim())
                    .is_none()
                    .then_some(ValidationError::NotAnInteger(field))
            }
            Constraint::AtLeast(min) => match parse_count(value.trim()) {
                Some(n) if n < min => Some(ValidationError::TooSmall { field, min }),
                _ => None,
            },
            Constraint::Url => {
                let value = value.trim();
                (!value.is_empty() && Url::parse(value).is_err())
                    .then_some(ValidationError::InvalidUrl(field))
            }
        }
    }
}

fn parse_count(value: &str) -> Option<i64> {
    if value.is_empty() {
        Some(0)
    } else {
        value.parse().ok()
    }
}

pub fn check_field(field: Field, value: &str) -> Vec<ValidationError> {
    field
        .constraints()
        .iter()
        .filter_map(|constraint| constraint.check(field, value))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Vec<ValidationError>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: Field) -> &[ValidationError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &[ValidationError])> {
        self.0.iter().map(|(field, errors)| (*field, errors.as_slice()))
    }

    fn insert(&mut self, field: Field, errors: Vec<ValidationError>) {
        if errors.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, errors);
        }
    }

    fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut errors = self.0.values().flatten().peekable();
        while let Some(error) = errors.next() {
            write!(f, "{error}")?;
            if errors.peek().is_some() {
                write!(f, "; ")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    id:         Option<BookId>,
    title:      String,
    genre:      String,
    page_count: String,
    cover_url:  String,
    errors:     FieldErrors,
    state:      FormState,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(entry: &BookEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title.clone(),
            genre: entry.genre.clone(),
            page_count: entry.page_count.to_string(),
            cover_url: entry.cover_url.clone(),
            ..Self::default()
        }
    }

    pub fn is_editing_existing(&self) -> bool {
        self.id.is_some()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Genre => &self.genre,
            Field::PageCount => &self.page_count,
            Field::CoverUrl => &self.cover_url,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Genre => &mut self.genre,
            Field::PageCount => &mut self.page_count,
            Field::CoverUrl => &mut self.cover_url,
        };
        *slot = value.into();
        self.errors.clear(field);
        Ok(())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn validate(&self) -> Result<BookEntry, FieldErrors> {
        let mut errors = FieldErrors::default();
        for field in Field::ALL {
            errors.insert(field, check_field(field, self.value(field)));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(BookEntry {
            id:         self.id,
            title:      self.title.clone(),
            genre:      self.genre.clone(),
            page_count: parse_count(self.page_count.trim()).unwrap_or_default(),
            cover_url:  self.cover_url.trim().to_string(),
        })
    }

    pub fn submit(&mut self) -> Result<BookEntry, FormError> {
        if self.is_submitting() {
            return Err(FormError::Busy);
        }
        match self.validate() {
            Ok(entry) => {
                self.errors = FieldErrors::default();
                self.state = FormState::Submitting;
                Ok(entry)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Submitting -> editing. Values are kept as they were submitted.
    pub fn resume(&mut self) {
        self.state = FormState::Editing;
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Saving..."
        } else if self.is_editing_existing() {
            "Update"
        } else {
            "Create"
        }
    }
}
