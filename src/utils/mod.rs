//! Utils module - Shared utilities and helpers

/// Tracing setup and verbose CLI output
pub mod logging;

/// Endpoint and parameter validation
pub mod validation;
