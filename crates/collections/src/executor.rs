//! The request executor seam.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ForceError;

/// HTTP methods the collections resource is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One call to the remote API, relative to the instance root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path, e.g. `/services/data/v43.0/composite/sobjects`.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A request with no headers, query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach a JSON body. `DELETE` requests must not carry one.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Sends an already-authorized request and returns the decoded JSON body.
///
/// Implementations own authentication, timeouts and any transport-level
/// retry policy. Error statuses map to [`ForceError::Api`] or
/// [`ForceError::Transport`]; a success status whose body is not JSON maps
/// to [`ForceError::MalformedBody`].
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value, ForceError>;
}

#[async_trait]
impl<E: RequestExecutor + ?Sized> RequestExecutor for Arc<E> {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value, ForceError> {
        (**self).execute(request).await
    }
}
