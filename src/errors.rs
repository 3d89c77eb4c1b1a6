use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::types::envelope::{write_json, ClientErrorMessage};

/// Errors produced by [`KVStore`](crate::KVStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No data is stored under `name`.
    #[error("attempted to access data associated with name: {name} - not found")]
    NotFound { name: String },
}

/// Everything a request handler can fail with.
///
/// Client faults map to a 4xx status and a `{"error": ...}` body, server
/// faults to a bare 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("request method: '{method}' not supported")]
    BadMethod { method: String },

    #[error("malformed storage request: {0}")]
    MalformedRequest(String),

    #[error("uploaded data exceeds the limit of {limit} bytes")]
    UploadTooLarge { limit: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn client_error_msg(&self) -> ClientErrorMessage {
        ClientErrorMessage {
            error: self.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Storage(StorageError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::BadMethod { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("DataStorageHandler - request failed: {}", self);
            return HttpResponse::build(status).finish();
        }
        write_json(status, &self.client_error_msg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let not_found = ApiError::from(StorageError::NotFound {
            name: "x".to_string(),
        });
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::BadMethod {
                method: "PUT".to_string()
            }
            .status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::MalformedRequest("no data".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_key() {
        let err = ApiError::from(StorageError::NotFound {
            name: "greeting".to_string(),
        });
        assert_eq!(
            err.client_error_msg().error,
            "attempted to access data associated with name: greeting - not found"
        );
    }
}
