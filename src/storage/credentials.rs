//! Access key / secret key lookup
//!
//! Keys come from the VISEARCH_ACCESS_KEY and VISEARCH_SECRET_KEY
//! environment variables (or matching CLI flags). They are never written to
//! the settings file.

use crate::api::auth::Credentials;
use crate::error::ConfigError;
use std::env;

pub const ACCESS_KEY_VAR: &str = "VISEARCH_ACCESS_KEY";
pub const SECRET_KEY_VAR: &str = "VISEARCH_SECRET_KEY";

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|k| !k.is_empty())
}

pub fn get_access_key() -> Option<String> {
    non_empty_var(ACCESS_KEY_VAR)
}

pub fn get_secret_key() -> Option<String> {
    non_empty_var(SECRET_KEY_VAR)
}

/// Build credentials, preferring explicit values over the environment.
pub fn resolve_credentials(
    access_key: Option<String>,
    secret_key: Option<String>,
) -> Result<Credentials, ConfigError> {
    let access_key = access_key
        .filter(|k| !k.is_empty())
        .or_else(get_access_key)
        .ok_or_else(|| ConfigError::MissingField {
            field: "access_key".to_string(),
        })?;
    let secret_key = secret_key
        .filter(|k| !k.is_empty())
        .or_else(get_secret_key)
        .ok_or_else(|| ConfigError::MissingField {
            field: "secret_key".to_string(),
        })?;

    Ok(Credentials::new(access_key, secret_key))
}
