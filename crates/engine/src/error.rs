//! The module contains the error the engine can throw.
//!
//! Errors fall into four groups:
//!
//! - [`KeyNotFound`] / [`Forbidden`]: the request referenced a missing
//!   session/user or the requester is not a member. Client errors, the
//!   computation is not attempted.
//! - [`ExternalService`]: the exchange-rate provider is unreachable or
//!   returned garbage and no cached rate could cover for it.
//! - [`Inconsistency`]: the bookkeeping itself is broken (an expenditure with
//!   no payers, a member netted against themself). Fatal, never retried.
//! - [`Database`]: anything sea-orm bubbles up.
//!
//! [`KeyNotFound`]: EngineError::KeyNotFound
//! [`Forbidden`]: EngineError::Forbidden
//! [`ExternalService`]: EngineError::ExternalService
//! [`Inconsistency`]: EngineError::Inconsistency
//! [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("External service failure: {0}")]
    ExternalService(String),
    #[error("Internal inconsistency: {0}")]
    Inconsistency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCurrency(a), Self::InvalidCurrency(b)) => a == b,
            (Self::ExternalService(a), Self::ExternalService(b)) => a == b,
            (Self::Inconsistency(a), Self::Inconsistency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
