//! Controllers and service functions that drive the enquiry views.

use thiserror::Error;

pub mod enquiries;
pub mod enquiry_form;
pub mod enquiry_table;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("entity not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("repository error: {0}")]
    Repository(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    #[error("no enquiry modal is open")]
    ModalClosed,
}

pub type ServiceResult<T> = Result<T, ServiceError>;
