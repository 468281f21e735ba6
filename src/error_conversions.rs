//! Error conversion glue between the layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here and are only compiled with the `client` feature.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::InvalidModeTransition { from, to } => {
                ServiceError::InvalidTransition(format!("{from} -> {to}"))
            }
            other => ServiceError::Form(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other.to_string()),
        }
    }
}
