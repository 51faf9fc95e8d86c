//! 互动领域错误

use mesa_errors::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("Notification title must not be empty")]
    EmptyTitle,
}

impl From<EngagementError> for AppError {
    fn from(err: EngagementError) -> Self {
        AppError::validation(err.to_string())
    }
}
