//! Storage layer
//!
//! Client configuration, the CLI settings file (TOML) and credential lookup
//! from the environment.

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
