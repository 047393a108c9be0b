use std::io::Read;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use ureq::tls::TlsConfig;
use ureq::{Agent, Body, Error as UreqError, http};

use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::ServiceResponse;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// The REST transport. Session-lifecycle operations (authenticate, status,
/// workload deletion) are the only ones the service exposes over plain HTTP;
/// everything else rides the CLI tool.
#[derive(Debug, Clone)]
pub struct RestTransport {
    agent: Agent,
    base_url: String,
}

impl RestTransport {
    #[must_use]
    pub fn new(config: &OptimizerConfig) -> Self {
        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)));
        if !config.tls_verify() {
            builder = builder.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        let agent: Agent = builder.build().into();

        Self {
            agent,
            base_url: config.api_url().to_string(),
        }
    }

    /// POSTs a JSON body and normalizes the JSON reply.
    pub fn post_json(&self, path: &str, body: Value) -> OptimizerResult<ServiceResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "posting to optimizer service");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(map_ureq_error)?;

        let mut response = ensure_success(response)?;
        let value: Value = response.body_mut().read_json().map_err(|error| {
            OptimizerError::transport_with("failed to parse service reply as JSON", error)
        })?;
        ServiceResponse::from_raw(value)
    }
}

fn ensure_success(response: http::Response<Body>) -> OptimizerResult<http::Response<Body>> {
    let status = response.status().as_u16();
    if status >= 400 {
        let body = body_to_string(response)?;
        let trimmed = body.trim();
        let rendered = if trimmed.is_empty() {
            "<empty body>"
        } else {
            trimmed
        };
        Err(OptimizerError::transport(format!(
            "service returned HTTP {status}: {rendered}"
        )))
    } else {
        Ok(response)
    }
}

fn body_to_string(response: http::Response<Body>) -> OptimizerResult<String> {
    let mut reader = response.into_body().into_reader();
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|error| OptimizerError::transport_with("failed to read service reply", error))?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}

fn map_ureq_error(error: UreqError) -> OptimizerError {
    match error {
        UreqError::StatusCode(status) => {
            OptimizerError::transport(format!("service returned HTTP {status}"))
        }
        UreqError::Timeout(_) => OptimizerError::transport("service request timed out"),
        UreqError::Io(io_error) => {
            OptimizerError::transport_with("I/O failure talking to the service", io_error)
        }
        other => OptimizerError::transport_with("service request failed", other),
    }
}
