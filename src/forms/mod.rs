//! Form definitions backing the enquiry modal.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod enquiry;

pub use enquiry::FormMode;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("form is read-only")]
    ReadOnly,

    #[error("no product row at index {0}")]
    ProductIndexOutOfRange(usize),

    #[error("invalid date/time")]
    InvalidDateTime,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid name")]
    InvalidName,

    #[error("cannot switch form from {from} to {to}")]
    InvalidModeTransition { from: FormMode, to: FormMode },

    #[error("invalid value: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
}
