pub mod datastorage;
pub mod health;

use actix_web::{HttpRequest, HttpResponse};
use futures_util::FutureExt;
use log::{error, warn};
use std::future::Future;
use std::panic::AssertUnwindSafe;

use crate::errors::ApiError;

pub use datastorage::{delete_data, retrieve_data, store_data, NameQuery, UploadLimits};
pub use health::health;

/// Runs a handler body, turning a panic inside it into a 500.
///
/// The panic is logged together with `handler` and the worker carries on
/// serving other requests.
pub async fn recover<F>(handler: &str, fut: F) -> Result<HttpResponse, ApiError>
where
    F: Future<Output = Result<HttpResponse, ApiError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string());
            error!("{} - recovered from panic: {}", handler, reason);
            Err(ApiError::Internal(format!("{} panicked: {}", handler, reason)))
        }
    }
}

/// Default service of every resource: any method without a route lands here.
pub async fn bad_method(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    warn!(
        "{} - rejected unsupported request method: {}",
        req.path(),
        req.method()
    );
    Err(ApiError::BadMethod {
        method: req.method().to_string(),
    })
}
