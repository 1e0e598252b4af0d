use thiserror::Error;

use crate::messages;

pub type ApiResult<T> = core::result::Result<T, ApiError>;
pub type StorageResult<T> = core::result::Result<T, StorageError>;

/// Failure of a single backend call, after status/transport normalisation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", messages::ITEM_NOT_FOUND)]
    NotFound,
    #[error("{}", messages::SERVER_ERROR)]
    Server { status: u16 },
    #[error("{}", messages::REQUEST_TIMEOUT)]
    Timeout,
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Anything the normalisation hook does not classify, passed through untouched.
    #[error(transparent)]
    Http(Box<ureq::Error>),
}

impl ApiError {
    /// HTTP status behind the error, when there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Server { status } => Some(*status),
            ApiError::Http(inner) => match inner.as_ref() {
                ureq::Error::Status(code, _) => Some(*code),
                ureq::Error::Transport(_) => None,
            },
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculatorError {
    #[error("{}", messages::EMPTY_FOOD_NAME)]
    EmptyFoodName,
    #[error("{}", messages::NON_POSITIVE_WEIGHT)]
    NonPositiveWeight,
    #[error("{}", messages::INVALID_WEIGHT)]
    InvalidWeight(String),
}
