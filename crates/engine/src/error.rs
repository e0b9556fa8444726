//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when an expense total or a split value is not
//!   acceptable, or a total no longer fits in cents.
//! - [`InvalidInput`] thrown when a required name, description or password is
//!   blank.
//! - [`EmptyParticipants`] thrown when an expense has nobody to split with.
//! - [`ParticipantNotFound`] thrown when a settlement targets a user with no
//!   split in the expense.
//! - [`Forbidden`] thrown when the caller lacks membership or admin rights.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`InvalidData`] thrown when a stored row cannot be read back.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`EmptyParticipants`]: EngineError::EmptyParticipants
//!  [`ParticipantNotFound`]: EngineError::ParticipantNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidData`]: EngineError::InvalidData
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An expense needs at least one participant")]
    EmptyParticipants,
    #[error("\"{0}\" is not part of this expense")]
    ParticipantNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid member: {0}")]
    InvalidMember(String),
    #[error("Invalid split type: {0}")]
    InvalidSplitType(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::EmptyParticipants, Self::EmptyParticipants) => true,
            (Self::ParticipantNotFound(a), Self::ParticipantNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidMember(a), Self::InvalidMember(b)) => a == b,
            (Self::InvalidSplitType(a), Self::InvalidSplitType(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidData(a), Self::InvalidData(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
