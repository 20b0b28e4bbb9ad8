//! Subscription submission transport.
//!
//! The manager hands a finished request (path, headers, JSON body) to a
//! [`SubscriptionTransport`] and gets the raw response back. [`HttpTransport`]
//! sends it with reqwest, which uses `fetch` when compiled to wasm32.

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::cookie::{get_cookie, CookieSource};
use crate::services::errors::{CookieError, TransportError};

/// One POST of a subscription payload
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait(?Send)]
pub trait SubscriptionTransport {
    /// CSRF token for authenticated submissions, if the host has one.
    fn csrf_token(&self) -> Result<Option<String>, CookieError>;

    async fn post_json(&self, request: SubmissionRequest) -> Result<SubmissionResponse, TransportError>;
}

/// reqwest-backed transport posting to `base_url` + request path.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    cookies: Rc<dyn CookieSource>,
    csrf_cookie_name: String,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        cookies: Rc<dyn CookieSource>,
        csrf_cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            cookies,
            csrf_cookie_name: csrf_cookie_name.into(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait(?Send)]
impl SubscriptionTransport for HttpTransport {
    fn csrf_token(&self) -> Result<Option<String>, CookieError> {
        get_cookie(&self.cookies.cookie_string(), &self.csrf_cookie_name)
    }

    async fn post_json(&self, request: SubmissionRequest) -> Result<SubmissionResponse, TransportError> {
        let url = self.url_for(&request.path);
        let body = serde_json::to_vec(&request.body)
            .map_err(|e| TransportError::Request(format!("Failed to serialize body: {}", e)))?;

        let mut builder = self.client.post(&url).body(body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("POST {}", url);
        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!("POST {} -> {} ({} bytes)", url, status, body.len());
        Ok(SubmissionResponse { status, body })
    }
}
