use crate::{ApiError, ApiResult, AuthTransport, TokenStore};

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;

/// reqwest-backed [`AuthTransport`].
///
/// Attaches `Authorization: Bearer <access token>` whenever the token store
/// holds one.
pub struct HttpTransport {
    pub base_url: String,
    client: ReqwestClient,
    tokens: TokenStore,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    /// * `base_url` - API root without the `/auth` segment (e.g. "https://api.example.com/api")
    /// * `timeout` - Per-request timeout
    /// * `tokens` - Source of the bearer token
    pub fn new(base_url: &str, timeout: Duration, tokens: TokenStore) -> ApiResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            tokens,
        })
    }

    /// Build a request with the bearer token, if any
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url);

        if let Some(token) = self.tokens.access_token() {
            req = req.bearer_auth(token);
        }

        req
    }

    /// Execute request and turn non-success statuses into `ApiError::Status`
    async fn execute(&self, req: reqwest::RequestBuilder) -> ApiResult<Value> {
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else if status.is_success() {
            serde_json::from_str(&text)?
        } else {
            // Error pages are not always JSON
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        let code = error_code(&body);

        debug!("{} -> {} ({})", status.as_u16(), message, code.as_deref().unwrap_or("-"));

        Err(ApiError::status(status.as_u16(), message, code, body))
    }
}

#[async_trait]
impl AuthTransport for HttpTransport {
    async fn get(&self, path: &str) -> ApiResult<Value> {
        let req = self.request(Method::GET, path);
        self.execute(req).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> ApiResult<Value> {
        let mut req = self.request(Method::POST, path);
        if let Some(body) = body {
            req = req.json(&body);
        }
        self.execute(req).await
    }
}

/// Error text, preferring a nested `error` object over the root `message`.
fn error_message(body: &Value) -> Option<String> {
    let nested = body.get("error").filter(|e| e.is_object());

    nested
        .and_then(|e| e.get("messageAr").or_else(|| e.get("message")))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(String::from)
}

fn error_code(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("code"))
        .or_else(|| body.get("code"))
        .and_then(Value::as_str)
        .map(String::from)
}
