use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::{
    form::{Field, FieldErrors},
    types::book::BookId,
};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url:    String,
        status: StatusCode,
    },

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not the JSON we expected; the error carries the offending path.
    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
}

impl TransportError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(e) => e.status(),
            TransportError::Decode(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: Field, max: usize },
    #[error("{field} must be at least {min}")]
    TooSmall { field: Field, min: i64 },
    #[error("{0} must be a whole number")]
    NotAnInteger(Field),
    #[error("{0} must be a valid URL")]
    InvalidUrl(Field),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("The form is still saving")]
    Busy,
    #[error("{0}")]
    Invalid(FieldErrors),
}

/// Misuse of the catalog view by its caller. Transport failures never surface here.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("No book with id {0} is loaded")]
    UnknownBook(BookId),
    #[error("No form is open")]
    NoActiveForm,
    #[error("No book is waiting for delete confirmation")]
    NoPendingDelete,
    #[error(transparent)]
    Form(#[from] FormError),
}
