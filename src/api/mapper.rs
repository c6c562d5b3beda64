//! Response body mapping
//!
//! Turns the text returned by the transport into result values. Every body
//! is read as a [`ResponseEnvelope`] first; a non-success status becomes a
//! [`ServiceError`] before the typed mapping is attempted.

use crate::api::models::{ApiResponse, ResponseEnvelope};
use crate::error::{MappingError, ServiceError, ViSearchError};
use serde::Deserialize;
use serde_json::Value;

/// Shared, stateless mapper; one per client.
#[derive(Debug, Default, Clone)]
pub struct ResponseMapper;

impl ResponseMapper {
    pub fn new() -> Self {
        ResponseMapper
    }

    /// Map `body` returned by `endpoint` into `T`, failing on service errors.
    pub fn map<T: ApiResponse>(&self, endpoint: &str, body: &str) -> Result<T, ViSearchError> {
        let value = self.parse(endpoint, body)?;

        let envelope = ResponseEnvelope::deserialize(&value).map_err(|source| {
            MappingError::Schema {
                endpoint: endpoint.to_string(),
                type_name: ResponseEnvelope::TYPE_NAME,
                source,
            }
        })?;
        if !envelope.is_success() {
            return Err(ServiceError::Failed {
                method: envelope.method.unwrap_or_else(|| endpoint.to_string()),
                status: envelope.status,
                messages: envelope.error,
            }
            .into());
        }

        self.decode(endpoint, &value)
    }

    /// Map `body` into `T` without looking at the envelope.
    pub fn map_unchecked<T: ApiResponse>(
        &self,
        endpoint: &str,
        body: &str,
    ) -> Result<T, ViSearchError> {
        let value = self.parse(endpoint, body)?;
        self.decode(endpoint, &value)
    }

    fn parse(&self, endpoint: &str, body: &str) -> Result<Value, MappingError> {
        serde_json::from_str(body).map_err(|source| MappingError::Malformed {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn decode<T: ApiResponse>(&self, endpoint: &str, value: &Value) -> Result<T, ViSearchError> {
        T::deserialize(value).map_err(|source| {
            MappingError::Schema {
                endpoint: endpoint.to_string(),
                type_name: T::TYPE_NAME,
                source,
            }
            .into()
        })
    }
}
