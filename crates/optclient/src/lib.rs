#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;
pub mod upload;

pub use client::OptimizerClient;
pub use config::OptimizerConfig;
pub use error::{OptimizerError, OptimizerResult};
pub use models::ServiceResponse;
pub use upload::{QueryRecord, UploadData, UploadFormat};
