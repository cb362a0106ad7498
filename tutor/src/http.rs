//! HTTP access to the tutor backend.
//!
//! This module defines the `Backend` trait over the two endpoints the form talks to,
//! so the form logic can be exercised against a recording mock as well as a real server.

use crate::errors::Result;
use crate::form::{QuestionRequest, UploadRequest};
use async_trait::async_trait;
use url::Url;

/// Path of the multipart upload endpoint.
pub const UPLOAD_PATH: &str = "/upload-file";
/// Path of the question endpoint.
pub const ASK_PATH: &str = "/ask";

/// Raw response from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Declared `Content-Type` header, if any
    pub content_type: Option<String>,
    /// Response body as a string
    pub body: String,
}

impl HttpResponse {
    /// Build a JSON response, mostly useful for tests.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Some("application/json; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// True when the declared content type is `application/json`, ignoring case and parameters.
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false)
    }
}

/// Trait for calling the backend.
///
/// Each call is a single request with no retry and no explicit timeout; errors are only
/// returned when no response could be obtained at all. Interpreting the response is left
/// to the caller.
#[async_trait]
pub trait Backend: Send + Sync {
    /// POST the file as multipart field `file` to `/upload-file`.
    async fn upload_file(&self, request: &UploadRequest) -> Result<HttpResponse>;

    /// POST `{"query": ...}` to `/ask`.
    async fn ask(&self, request: &QuestionRequest) -> Result<HttpResponse>;
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Production backend client using reqwest.
#[derive(Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestBackend {
    /// Create a new client for the backend rooted at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn read_response(response: reqwest::Response, url: &str) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        tracing::info!(
            url = %url,
            status = status,
            content_type = content_type.as_deref().unwrap_or(""),
            response_len = body.len(),
            "Backend request completed"
        );

        Ok(HttpResponse { status, content_type, body })
    }
}

#[async_trait]
impl Backend for ReqwestBackend {
    #[tracing::instrument(skip(self, request), fields(file_name = %request.file_name, size = request.bytes.len()))]
    async fn upload_file(&self, request: &UploadRequest) -> Result<HttpResponse> {
        let url = self.url(UPLOAD_PATH);

        let part = reqwest::multipart::Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type())?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(url = %url, "Uploading file");

        let response = self.client.post(&url).multipart(form).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Upload request failed");
            e
        })?;

        Self::read_response(response, &url).await
    }

    #[tracing::instrument(skip(self, request), fields(query_len = request.query.len()))]
    async fn ask(&self, request: &QuestionRequest) -> Result<HttpResponse> {
        let url = self.url(ASK_PATH);

        tracing::debug!(url = %url, "Submitting question");

        let response = self.client.post(&url).json(request).send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Ask request failed");
            e
        })?;

        Self::read_response(response, &url).await
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// What a recorded call sent.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBody {
    Multipart { file_name: String, bytes: Vec<u8> },
    Json(serde_json::Value),
}

/// Record of a call made to the mock backend.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub path: String,
    pub body: MockBody,
}

/// Mock backend for testing.
///
/// Responses are keyed by `"POST {path}"` and returned in FIFO order. Calls with no
/// configured response fail, which also makes accidental network calls visible.
///
/// # Example
/// ```ignore
/// let mock = MockBackend::new();
/// mock.add_response("POST /ask", Ok(HttpResponse::json(200, r#"{"answer": "42"}"#)));
/// ```
#[derive(Clone, Default)]
pub struct MockBackend {
    responses: Arc<Mutex<HashMap<String, Vec<Result<HttpResponse>>>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predetermined response for a method and path, e.g. `"POST /ask"`.
    pub fn add_response(&self, key: &str, response: Result<HttpResponse>) {
        self.responses.lock().entry(key.to_string()).or_default().push(response);
    }

    /// Get all calls that have been made to this mock.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn respond(&self, path: &str, body: MockBody) -> Result<HttpResponse> {
        self.calls.lock().push(MockCall {
            path: path.to_string(),
            body,
        });

        let key = format!("POST {path}");
        let mut responses = self.responses.lock();
        if let Some(queue) = responses.get_mut(&key) {
            if !queue.is_empty() {
                return queue.remove(0);
            }
        }

        Err(anyhow::anyhow!("No mock response configured for {key}").into())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn upload_file(&self, request: &UploadRequest) -> Result<HttpResponse> {
        self.respond(
            UPLOAD_PATH,
            MockBody::Multipart {
                file_name: request.file_name.clone(),
                bytes: request.bytes.clone(),
            },
        )
    }

    async fn ask(&self, request: &QuestionRequest) -> Result<HttpResponse> {
        self.respond(ASK_PATH, MockBody::Json(serde_json::to_value(request)?))
    }
}
