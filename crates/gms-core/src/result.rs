//! Convenience result type alias for GMS.

use crate::error::AppError;

/// A specialized `Result` type for GMS operations.
pub type AppResult<T> = Result<T, AppError>;
