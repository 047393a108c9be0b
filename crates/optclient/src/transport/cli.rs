use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, OptimizerResult};
use crate::models::ServiceResponse;

/// Number of leading stdout lines the upload command may prepend to its JSON
/// reply (a `{"url":...}` echo plus banner text).
const UPLOAD_BANNER_LINES: usize = 3;

/// The external-process transport. Bulk and analytic operations go through
/// the service's CLI tool rather than its REST surface; this wrapper turns a
/// command name and argument list into one normalized [`ServiceResponse`].
#[derive(Debug, Clone)]
pub struct CliTransport {
    cli_path: PathBuf,
    api_url: String,
    auth_config: Option<String>,
}

impl CliTransport {
    #[must_use]
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            cli_path: config.cli_path().to_path_buf(),
            api_url: config.api_url().to_string(),
            auth_config: config.product_secret().map(str::to_string),
        }
    }

    /// Runs `<tool> navopt --endpoint-url=<url> <command> [...args]` and
    /// normalizes stdout into a [`ServiceResponse`].
    ///
    /// Exit contract: 0 is success; `upload` exiting 1 is the tool's known
    /// quirk of reporting success through a non-zero code and is salvaged by
    /// discarding the leading banner lines before parsing. Every other
    /// non-zero exit is a transport failure. Empty output resolves to the
    /// default error reply instead of failing.
    pub fn execute(&self, command: &str, args: &[String]) -> OptimizerResult<ServiceResponse> {
        let mut invocation = Command::new(&self.cli_path);
        invocation
            .arg("navopt")
            .arg(format!("--endpoint-url={}", self.api_url))
            .arg(command);
        if let Some(secret) = &self.auth_config {
            invocation.args(["--auth-config", secret]);
        }
        invocation.args(args);

        debug!(tool = %self.cli_path.display(), command, "invoking optimizer cli");

        let output = invocation.output().map_err(|error| {
            OptimizerError::transport_with(
                format!(
                    "failed to launch optimizer cli `{}`",
                    self.cli_path.display()
                ),
                error,
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let payload = if output.status.success() {
            stdout
        } else if command == "upload" && output.status.code() == Some(1) {
            // Do not generalize: only `upload` reports success this way.
            info!(command, "upload reported success despite exit code 1");
            strip_upload_banner(&stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OptimizerError::transport(describe_failure(
                command,
                output.status.code(),
                stderr.trim(),
            )));
        };

        if payload.trim().is_empty() {
            return Ok(ServiceResponse::error_default());
        }
        ServiceResponse::from_json_str(&payload)
    }
}

/// The salvageable JSON starts after the first [`UPLOAD_BANNER_LINES`] lines.
fn strip_upload_banner(stdout: &str) -> String {
    stdout
        .split('\n')
        .skip(UPLOAD_BANNER_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_failure(command: &str, code: Option<i32>, stderr: &str) -> String {
    let exit = match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    };
    if stderr.is_empty() {
        format!("optimizer cli command `{command}` failed with {exit}")
    } else {
        format!("optimizer cli command `{command}` failed with {exit}: {stderr}")
    }
}
