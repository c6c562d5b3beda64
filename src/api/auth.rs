use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Access key / secret key pair of a ViSearch app.
///
/// Every request carries these as HTTP Basic credentials. Nothing is cached
/// between requests and there is no token exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// `Authorization` header value: `Basic base64(access_key:secret_key)`.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.access_key, self.secret_key));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &mask_secret(&self.secret_key))
            .finish()
    }
}

/// Show only the edges of a secret, e.g. `abcd...wxyz`.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() > 8 && secret.is_ascii() {
        format!("{}...{}", &secret[..4], &secret[secret.len() - 4..])
    } else {
        "*****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let credentials = Credentials::new("K", "S");
        assert_eq!(credentials.authorization_header(), "Basic SzpT");
    }

    #[test]
    fn test_authorization_header_is_stable() {
        let credentials = Credentials::new("access", "secret");
        let first = credentials.authorization_header();
        assert_eq!(first, credentials.authorization_header());
        assert_eq!(first, "Basic YWNjZXNzOnNlY3JldA==");
    }

    #[test]
    fn test_debug_masks_secret() {
        let credentials = Credentials::new("my_access_key", "super_secret_value");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("my_access_key"));
        assert!(!debug.contains("super_secret_value"));
        assert!(debug.contains("supe...alue"));
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask_secret("short"), "*****");
        assert_eq!(mask_secret(""), "*****");
    }
}
