//! HTTP request executor backed by `ureq`.
//!
//! `ureq` is blocking, so each call runs on `tokio::task::spawn_blocking`.
//! Error statuses are read rather than raised by the agent so fault bodies
//! can be surfaced as [`ForceError::Api`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiFault, ForceError};
use crate::executor::{ApiRequest, Method, RequestExecutor};

/// Executor that talks to one instance with a fixed bearer token.
#[derive(Clone)]
pub struct HttpExecutor {
    instance_url: String,
    access_token: String,
    agent: ureq::Agent,
}

impl HttpExecutor {
    /// Executor for `instance_url`. `timeout` bounds each whole call.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let mut config = ureq::Agent::config_builder().http_status_as_error(false);
        if timeout.is_some() {
            config = config.timeout_global(timeout);
        }
        let agent: ureq::Agent = config.build().into();

        HttpExecutor {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            agent,
        }
    }

    /// Executor for the configured instance, token and timeout.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            config.instance_url.clone(),
            config.access_token.clone(),
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    /// Full URL for an instance-relative path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.instance_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("instance_url", &self.instance_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value, ForceError> {
        let url = self.url_for(&request.path);
        debug!("Sending {} {}", request.method, url);

        let agent = self.agent.clone();
        let authorization = format!("Bearer {}", self.access_token);

        tokio::task::spawn_blocking(move || send(&agent, &url, &authorization, &request))
            .await
            .map_err(|e| ForceError::Transport {
                message: format!("task join error: {}", e),
            })?
    }
}

fn prepare<B>(
    builder: ureq::RequestBuilder<B>,
    authorization: &str,
    request: &ApiRequest,
) -> ureq::RequestBuilder<B> {
    let mut builder = builder
        .header("Authorization", authorization)
        .header("Accept", "application/json");
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in &request.query {
        builder = builder.query(name, value);
    }
    builder
}

fn send(
    agent: &ureq::Agent,
    url: &str,
    authorization: &str,
    request: &ApiRequest,
) -> Result<serde_json::Value, ForceError> {
    let result = match (request.method, &request.body) {
        (Method::Post, Some(body)) => {
            prepare(agent.post(url), authorization, request).send_json(body)
        }
        (Method::Post, None) => prepare(agent.post(url), authorization, request).send_empty(),
        (Method::Patch, Some(body)) => {
            prepare(agent.patch(url), authorization, request).send_json(body)
        }
        (Method::Patch, None) => prepare(agent.patch(url), authorization, request).send_empty(),
        (Method::Delete, None) => prepare(agent.delete(url), authorization, request).call(),
        (Method::Delete, Some(_)) => {
            return Err(ForceError::BodyNotAllowed {
                method: Method::Delete,
            })
        }
    };
    let response = result.map_err(|e| ForceError::Transport {
        message: e.to_string(),
    })?;

    let status = response.status().as_u16();
    let text = response
        .into_body()
        .read_to_string()
        .map_err(|e| ForceError::Transport {
            message: format!("failed to read response body: {}", e),
        })?;

    if !(200..300).contains(&status) {
        if let Ok(faults) = serde_json::from_str::<Vec<ApiFault>>(&text) {
            if !faults.is_empty() {
                warn!("{} {} rejected with status {}", request.method, url, status);
                return Err(ForceError::Api { status, faults });
            }
        }
        return Err(ForceError::Transport {
            message: format!("unexpected status {} from {}: {}", status, url, text),
        });
    }

    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| {
        debug!("Response body: {}", text);
        ForceError::MalformedBody {
            message: e.to_string(),
        }
    })
}
