use std::path::{Path, PathBuf};

use crate::error::{OptimizerError, OptimizerResult};

pub const DEFAULT_CLI_PATH: &str = "ccs";

/// Connection settings for the optimizer advisory service. Immutable once the
/// client is constructed; `product_name` may still be resolved through a
/// tenant lookup when it is not configured explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizerConfig {
    api_url: String,
    email: Option<String>,
    email_password: Option<String>,
    product_secret: Option<String>,
    product_auth_secret: Option<String>,
    product_name: Option<String>,
    tls_verify: bool,
    cli_path: PathBuf,
}

impl OptimizerConfig {
    pub fn new(api_url: impl Into<String>) -> OptimizerResult<Self> {
        let api_url = api_url.into();
        let trimmed = api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(OptimizerError::Configuration(
                "api_url must not be empty".to_string(),
            ));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(OptimizerError::Configuration(format!(
                "api_url must be an http(s) URL, got `{trimmed}`"
            )));
        }

        Ok(Self {
            api_url: trimmed.to_string(),
            email: None,
            email_password: None,
            product_secret: None,
            product_auth_secret: None,
            product_name: None,
            tls_verify: true,
            cli_path: PathBuf::from(DEFAULT_CLI_PATH),
        })
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_email_password(mut self, password: impl Into<String>) -> Self {
        self.email_password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_product_secret(mut self, secret: impl Into<String>) -> Self {
        self.product_secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn with_product_auth_secret(mut self, secret: impl Into<String>) -> Self {
        self.product_auth_secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    #[must_use]
    pub fn with_cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = path.into();
        self
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    #[must_use]
    pub fn email_password(&self) -> Option<&str> {
        self.email_password.as_deref()
    }

    #[must_use]
    pub fn product_secret(&self) -> Option<&str> {
        self.product_secret.as_deref()
    }

    #[must_use]
    pub fn product_auth_secret(&self) -> Option<&str> {
        self.product_auth_secret.as_deref()
    }

    #[must_use]
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    #[must_use]
    pub fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    #[must_use]
    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    /// The adapter is usable once it knows where the service lives and which
    /// workload namespace to talk to.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.api_url.is_empty() && self.product_name.is_some()
    }
}
