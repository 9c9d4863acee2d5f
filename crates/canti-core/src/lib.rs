pub mod config;
pub mod error;

pub use config::{CantiConfig, LoggingConfig, ServerConfig, UpstreamConfig};
pub use error::{CantiError, Result};

#[cfg(test)]
mod tests;
