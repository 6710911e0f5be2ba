use crate::ApiResult;

use async_trait::async_trait;
use serde_json::Value;

/// Minimal HTTP surface the session layer needs from its client.
///
/// Paths are relative to the auth API root (e.g. `/auth/me`). Non-success
/// responses must come back as [`crate::ApiError::Status`] so callers can branch
/// on the status code. An empty success body is returned as `Value::Null`.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn get(&self, path: &str) -> ApiResult<Value>;

    async fn post(&self, path: &str, body: Option<Value>) -> ApiResult<Value>;
}
