use thiserror::Error;

pub type OptimizerResult<T> = Result<T, OptimizerError>;

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the optimizer client. Every remote failure, whether it
/// came from the external CLI tool or a REST call, is reported as `Transport`
/// so callers never branch on which transport carried the operation.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("Error while accessing Optimizer: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("invalid optimizer configuration: {0}")]
    Configuration(String),

    #[error("failed to stage upload payload: {message}")]
    Upload {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl OptimizerError {
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn transport_with(
        message: impl Into<String>,
        source: impl Into<BoxedCause>,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn upload_with(message: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::Upload {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
