use axum::http::StatusCode;
use thiserror::Error;

/// Input that falls outside the dashboard's fixed domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("day index {index} is outside 0..={max}")]
    DayOutOfRange { index: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("settings storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings record is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_become_bad_requests() {
        let err: AppError = DomainError::DayOutOfRange { index: 9, max: 6 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "day index 9 is outside 0..=6");
    }

    #[test]
    fn storage_errors_become_internal_errors() {
        let parse = serde_json::from_str::<u8>("{").unwrap_err();
        let err: AppError = StorageError::from(parse).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.starts_with("settings record is not valid JSON"));
    }
}
