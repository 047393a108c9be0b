use std::fmt::{Display, Formatter};

use anyhow::{Context, Result};

use crate::models::ServiceResponse;

pub mod insights;
pub mod session;
pub mod upload;

/// Marker error raised when the service answered but reported an error
/// status; `main` maps it to its own exit code.
#[derive(Debug, Clone)]
pub struct ServiceFailure {
    response: ServiceResponse,
}

impl ServiceFailure {
    #[must_use]
    pub fn new(response: ServiceResponse) -> Self {
        Self { response }
    }

    #[must_use]
    pub fn response(&self) -> &ServiceResponse {
        &self.response
    }
}

impl Display for ServiceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "service reported status `{}`", self.response.status)
    }
}

impl std::error::Error for ServiceFailure {}

/// Prints the reply as pretty JSON; an error status becomes a
/// [`ServiceFailure`] so the process exits non-zero.
pub(crate) fn emit(response: ServiceResponse) -> Result<()> {
    let rendered =
        serde_json::to_string_pretty(&response).context("failed to encode service reply")?;
    println!("{rendered}");

    if response.is_error() {
        return Err(anyhow::Error::new(ServiceFailure::new(response)));
    }
    Ok(())
}
