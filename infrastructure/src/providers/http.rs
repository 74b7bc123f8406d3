//! Shared request plumbing for the HTTP backends.

use moa_application::{BackendError, CallContext};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Send `request` under `ctx` and decode a JSON body.
///
/// The request timeout is the context's remaining time, and the whole
/// exchange is abandoned as soon as the context is cancelled.
pub(crate) async fn send_json<T: DeserializeOwned>(
    ctx: &CallContext,
    request: RequestBuilder,
    model: &str,
) -> Result<T, BackendError> {
    let request = match ctx.remaining() {
        Some(remaining) => request.timeout(remaining),
        None => request,
    };

    ctx.run(async {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, model));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse response: {}", e)))
    })
    .await
}

pub(crate) fn transport_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::ConnectionError(e.to_string())
    } else {
        BackendError::RequestFailed(e.to_string())
    }
}

pub(crate) fn status_error(status: StatusCode, body: String, model: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Authentication(body),
        StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited,
        StatusCode::NOT_FOUND => BackendError::ModelNotFound(model.to_string()),
        _ => BackendError::RequestFailed(format!("HTTP {}: {}", status, body)),
    }
}
