//! Storage layer: free functions over an explicitly passed connection.
//! Entities hold data only; all persistence flows through here.

use crate::{error::AppError, validation::ValidationError};

pub mod items;
pub mod shopcarts;

/// Write failures ride the validation channel so a rejected commit
/// surfaces to the caller as a failed request, never a retry.
pub(crate) fn storage_error(err: sea_orm::DbErr) -> AppError {
    AppError::Validation(ValidationError::Storage(err.to_string()))
}
