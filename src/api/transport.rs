use crate::api::auth::Credentials;
use crate::api::params::{ImageSource, RequestParams};
use crate::api::pool::ConnectionPool;
use crate::error::{ConfigError, TransportCause, TransportError};
use crate::storage::config::ClientConfig;
use crate::utils::validation::validate_endpoint;
use reqwest::Method;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::path::Path;
use tracing::debug;
use url::Url;

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const USER_AGENT: &str = concat!("visearch-rust-sdk/", env!("CARGO_PKG_VERSION"));
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
pub const IMAGE_PART: &str = "image";

/// The three request shapes every operation funnels through.
///
/// Implementations return the raw response body; interpreting it is the
/// caller's job.
pub trait HttpTransport: Send + Sync {
    /// GET `path` with `params` as the query string.
    fn get(&self, path: &str, params: &RequestParams) -> Result<String, TransportError>;

    /// POST `params` as an `application/x-www-form-urlencoded` body.
    fn post(&self, path: &str, params: &RequestParams) -> Result<String, TransportError>;

    /// POST a `multipart/form-data` body: one text part per parameter plus
    /// the binary `image` part.
    fn post_image(
        &self,
        path: &str,
        params: &RequestParams,
        image: &ImageSource,
    ) -> Result<String, TransportError>;
}

/// Blocking HTTP client bound to one ViSearch endpoint.
#[derive(Debug)]
pub struct ViSearchHttpClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    pool: ConnectionPool,
}

impl ViSearchHttpClient {
    pub fn new(
        endpoint: &str,
        credentials: Credentials,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        validate_endpoint(endpoint)?;
        if credentials.access_key().is_empty() {
            return Err(ConfigError::MissingField {
                field: "access_key".to_string(),
            });
        }
        if credentials.secret_key().is_empty() {
            return Err(ConfigError::MissingField {
                field: "secret_key".to_string(),
            });
        }
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            // Whole-request deadline; blocking reqwest has no per-read timeout.
            .timeout(config.read_timeout())
            .pool_max_idle_per_host(config.max_connections_per_route)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(ViSearchHttpClient {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
            pool: ConnectionPool::new(config.pool_capacity(), config.connect_timeout()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    pub fn post_image_file(
        &self,
        path: &str,
        params: &RequestParams,
        file: &Path,
    ) -> Result<String, TransportError> {
        self.post_image(path, params, &ImageSource::file(file))
    }

    pub fn post_image_bytes(
        &self,
        path: &str,
        params: &RequestParams,
        data: &[u8],
        filename: &str,
    ) -> Result<String, TransportError> {
        self.post_image(path, params, &ImageSource::bytes(data, filename))
    }

    /// Build an authenticated request without sending it.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, TransportError> {
        let url = self.resolve(&method, path)?;
        Ok(self.authenticated(method, url))
    }

    fn resolve(&self, method: &Method, path: &str) -> Result<Url, TransportError> {
        let raw = format!("{}{}", self.endpoint, path);
        Url::parse(&raw).map_err(|e| TransportError::new(method.as_str(), raw, e.into()))
    }

    fn authenticated(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, self.credentials.authorization_header())
    }

    fn multipart_form(params: &RequestParams, image: &ImageSource) -> std::io::Result<Form> {
        let form = params
            .iter()
            .fold(Form::new(), |form, (k, v)| form.text(k.to_string(), v.to_string()));

        match image {
            ImageSource::File(path) => form.file(IMAGE_PART, path),
            ImageSource::Bytes { data, filename } => {
                let mime = mime_guess::from_path(filename).first_or_octet_stream();
                let part = Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(mime.as_ref())
                    .map_err(std::io::Error::other)?;
                Ok(form.part(IMAGE_PART, part))
            }
        }
    }

    /// Send one request and read the body as text.
    ///
    /// Holds a pool permit for the whole round trip. There is exactly one
    /// attempt; every failure comes back as a [`TransportError`] naming the
    /// method and URL.
    fn execute(
        &self,
        method: Method,
        url: Url,
        request: RequestBuilder,
    ) -> Result<String, TransportError> {
        let fail =
            |cause: TransportCause| TransportError::new(method.as_str(), url.as_str(), cause);

        let _permit = self
            .pool
            .acquire()
            .map_err(|waited| fail(TransportCause::PoolExhausted { waited }))?;

        debug!(method = %method, url = %url, "sending request");
        let response = request.send().map_err(|e| fail(e.into()))?;
        let status = response.status();
        let body = response.text().map_err(|e| fail(e.into()))?;
        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            "received response"
        );

        Ok(body)
    }
}

impl HttpTransport for ViSearchHttpClient {
    fn get(&self, path: &str, params: &RequestParams) -> Result<String, TransportError> {
        let mut url = self.resolve(&Method::GET, path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        let request = self.authenticated(Method::GET, url.clone());
        self.execute(Method::GET, url, request)
    }

    fn post(&self, path: &str, params: &RequestParams) -> Result<String, TransportError> {
        let url = self.resolve(&Method::POST, path)?;
        let request = self
            .authenticated(Method::POST, url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode_form(params));
        self.execute(Method::POST, url, request)
    }

    fn post_image(
        &self,
        path: &str,
        params: &RequestParams,
        image: &ImageSource,
    ) -> Result<String, TransportError> {
        let url = self.resolve(&Method::POST, path)?;
        let form = Self::multipart_form(params, image)
            .map_err(|e| TransportError::new("POST", url.as_str(), e.into()))?;
        let request = self.authenticated(Method::POST, url.clone()).multipart(form);
        self.execute(Method::POST, url, request)
    }
}

/// URL-encode `params` as a form body, one `key=value` per entry.
pub fn encode_form(params: &RequestParams) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(endpoint: &str) -> ViSearchHttpClient {
        ViSearchHttpClient::new(endpoint, Credentials::new("K", "S"), &ClientConfig::default())
            .expect("client creation failed")
    }

    #[test]
    fn test_client_creation() {
        let client = test_client("http://example.test");
        assert_eq!(client.endpoint(), "http://example.test");
        assert_eq!(client.pool().capacity(), 50);
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result =
            ViSearchHttpClient::new("", Credentials::new("K", "S"), &ClientConfig::default());
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));
    }

    #[test]
    fn test_malformed_endpoint_rejected() {
        let result = ViSearchHttpClient::new(
            "not a url",
            Credentials::new("K", "S"),
            &ClientConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_empty_keys_rejected() {
        let result = ViSearchHttpClient::new(
            "http://example.test",
            Credentials::new("", "S"),
            &ClientConfig::default(),
        );
        assert!(
            matches!(result, Err(ConfigError::MissingField { field }) if field == "access_key")
        );

        let result = ViSearchHttpClient::new(
            "http://example.test",
            Credentials::new("K", ""),
            &ClientConfig::default(),
        );
        assert!(
            matches!(result, Err(ConfigError::MissingField { field }) if field == "secret_key")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let client = test_client("http://example.test/");
        assert_eq!(client.endpoint(), "http://example.test");
    }

    #[test]
    fn test_build_request_attaches_basic_auth() {
        let client = test_client("http://example.test");
        let request = client
            .build_request(Method::GET, "/search")
            .expect("Failed to resolve URL")
            .build()
            .expect("Failed to build request");

        assert_eq!(request.url().as_str(), "http://example.test/search");
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
            Some("Basic SzpT")
        );
    }

    #[test]
    fn test_encode_form_repeats_keys() {
        let mut params = RequestParams::new();
        params
            .insert("im_name[0]", "red shoe")
            .insert("fl", "brand")
            .insert("fl", "price&tax");

        let body = encode_form(&params);
        assert_eq!(body, "im_name%5B0%5D=red+shoe&fl=brand&fl=price%26tax");

        let decoded: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded.as_slice(), params.as_pairs());
    }

    #[test]
    fn test_encode_form_empty() {
        assert_eq!(encode_form(&RequestParams::new()), "");
    }

    #[test]
    fn test_missing_image_file_is_transport_error() {
        let client = test_client("http://example.test");
        let result = client.post_image_file(
            "/uploadsearch",
            &RequestParams::new(),
            Path::new("/nonexistent/visearch/image.jpg"),
        );

        let err = result.expect_err("missing file should fail");
        assert_eq!(err.method, "POST");
        assert_eq!(err.url, "http://example.test/uploadsearch");
        assert!(matches!(err.cause, TransportCause::Image(_)));
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .get("/search", &RequestParams::new())
            .expect_err("unreachable host should fail");

        assert_eq!(err.method, "GET");
        assert!(err.url.starts_with("http://127.0.0.1:9/search"));
        assert!(matches!(err.cause, TransportCause::Http(_)));
        assert_eq!(client.pool().in_use(), 0);
    }
}
