//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::adapters::size_table::SizeTableLoadError;
use crate::config::ConfigError;
use nestuity_core::ports::PortError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The configured size table could not be loaded.
    #[error("Size table error: {0}")]
    SizeTable(#[from] SizeTableLoadError),

    /// The HTTP client for the backend could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
