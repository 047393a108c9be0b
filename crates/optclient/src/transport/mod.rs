pub mod cli;
pub mod rest;

pub use cli::CliTransport;
pub use rest::RestTransport;
