use std::rc::Rc;

use thiserror::Error;

/// Failure reported by a key-value storage backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Writing the sales collection to storage failed. The in-memory collection
/// already holds the change when this is returned.
#[derive(Debug, Error, Clone)]
pub enum PersistError {
    #[error("unable to encode sales {0}")]
    Encode(Rc<serde_json::Error>),
    #[error("unable to write sales: {0}")]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(Rc::new(value))
    }
}

/// Reading the persisted sales collection failed.
#[derive(Debug, Error, Clone)]
pub enum LoadError {
    #[error("unable to read stored sales: {0}")]
    Storage(#[from] StorageError),
    #[error("stored sales are not valid JSON {0}")]
    Decode(Rc<serde_json::Error>),
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(Rc::new(value))
    }
}

/// Rejections from the new sale form. The messages are shown to the user as-is.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Amount is too large")]
    AmountTooLarge,
    #[error("No sale ids are left")]
    IdsExhausted,
}

#[derive(Debug, Error, Clone)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Configuration {0}")]
    Config(String),
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        Self::Config(format!("{value:#}"))
    }
}

pub type AppResult<T> = Result<T, AppError>;
