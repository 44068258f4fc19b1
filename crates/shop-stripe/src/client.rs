//! # Stripe REST Client
//!
//! Authenticated requests against the Stripe API with response
//! normalization:
//!
//! - an empty body is treated as `{}`
//! - a non-empty body that is not JSON is a [`PaymentError::RemoteProtocol`]
//! - a non-success status is a [`PaymentError::RemoteApi`] carrying the
//!   provider's `error.message` when present, else the body
//!
//! Every call makes exactly one network attempt.

use crate::config::StripeConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode, Url};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shop_core::{PaymentError, PaymentResult};
use tracing::{debug, error, instrument};

/// Provider name used in logs and error messages
pub const PROVIDER_NAME: &str = "Stripe";

/// A request relative to the versioned API root (`{base}/v1`)
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    /// Extra path segments, percent-encoded when the URL is built
    segments: Vec<String>,
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    headers: HeaderMap,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            form: None,
            headers: HeaderMap::new(),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request with a form-encoded body
    pub fn post_form(path: impl Into<String>, form: Vec<(String, String)>) -> Self {
        let mut request = Self::new(Method::POST, path);
        request.form = Some(form);
        request
    }

    /// Append a path segment (e.g. an object ID)
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header; caller headers override the defaults
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Stripe API client
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    api_root: Url,
    http: Client,
}

impl StripeClient {
    /// Create a new client
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let api_root = Url::parse(&format!(
            "{}/v1",
            config.api_base_url.trim_end_matches('/')
        ))
        .map_err(|e| {
            PaymentError::Configuration(format!(
                "Invalid Stripe API base URL {}: {}",
                config.api_base_url, e
            ))
        })?;

        let http = Client::builder()
            .user_agent(concat!("storefront-cart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            api_root,
            http,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env())
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Send a request and return the parsed JSON body.
    #[instrument(skip(self, key, request), fields(method = %request.method, path = %request.path))]
    pub async fn request(&self, key: &SecretString, request: ApiRequest) -> PaymentResult<Value> {
        let url = self.url_for(&request)?;
        let headers = self.headers_for(key, &request)?;

        let mut builder = self.http.request(request.method, url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::Network(e.to_string()))?;

        debug!("Stripe responded: status={}, {} bytes", status, text.len());
        parse_response(status, &text)
    }

    /// Send a request and decode the body into `T`.
    ///
    /// A JSON body of the wrong shape is a [`PaymentError::Serialization`].
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        key: &SecretString,
        request: ApiRequest,
    ) -> PaymentResult<T> {
        let body = self.request(key, request).await?;
        serde_json::from_value(body).map_err(|e| {
            error!("Unexpected Stripe response shape: {}", e);
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }

    fn url_for(&self, request: &ApiRequest) -> PaymentResult<Url> {
        let mut url = self.api_root.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                PaymentError::Configuration(format!(
                    "Stripe API base URL cannot carry a path: {}",
                    self.api_root
                ))
            })?;
            segments.pop_if_empty();
            segments.extend(request.path.split('/').filter(|s| !s.is_empty()));
            segments.extend(request.segments.iter());
        }
        Ok(url)
    }

    fn headers_for(&self, key: &SecretString, request: &ApiRequest) -> PaymentResult<HeaderMap> {
        let mut auth = HeaderValue::from_str(&self.config.auth_header(key)).map_err(|_| {
            PaymentError::Configuration("Stripe key contains invalid header characters".into())
        })?;
        auth.set_sensitive(true);

        let version = HeaderValue::from_str(&self.config.api_version).map_err(|_| {
            PaymentError::Configuration(format!(
                "Invalid Stripe API version: {}",
                self.config.api_version
            ))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(HeaderName::from_static("stripe-version"), version);
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }
}

/// Normalize a raw response into a JSON value or a typed error.
fn parse_response(status: StatusCode, text: &str) -> PaymentResult<Value> {
    let body: Value = if text.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(text).map_err(|_| {
            error!("Stripe returned non-JSON response: status={}", status);
            PaymentError::RemoteProtocol {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                body: text.to_string(),
            }
        })?
    };

    if !status.is_success() {
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        error!("Stripe API error: status={}, body={}", status, text);
        return Err(PaymentError::RemoteApi {
            provider: PROVIDER_NAME.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}
