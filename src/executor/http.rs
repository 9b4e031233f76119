//! HTTP client collaborator.
//!
//! The executor performs its calls through the [`HttpClient`] trait;
//! [`ReqwestClient`] is the production implementation over reqwest's
//! blocking client. Calls are synchronous by contract: one pipeline run
//! completes before the next begins, and nothing in the engine suspends.

use super::config::ExecutionConfig;
use super::error::RequestError;
use crate::models::HttpResponse;
use std::time::Instant;

/// Blocking HTTP collaborator: one GET or POST at a time.
///
/// Headers are passed as ordered pairs so substituted header templates
/// keep their configured order on the wire.
pub trait HttpClient {
    /// Executes a GET with the given headers.
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse, RequestError>;

    /// Executes a POST with the given headers and body.
    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<HttpResponse, RequestError>;
}

/// Validates that a URL is well-formed and uses http or https.
pub fn validate_url(url: &str) -> Result<(), RequestError> {
    let parsed = url::Url::parse(url).map_err(|e| RequestError::InvalidUrl(e.to_string()))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(RequestError::UnsupportedProtocol(scheme.to_string()));
    }
    Ok(())
}

/// Production HTTP client over reqwest's blocking API.
#[derive(Debug)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Builds a client from the execution configuration: finite timeout,
    /// optional proxy, and the TLS verification toggle.
    pub fn from_config(config: &ExecutionConfig) -> Result<Self, RequestError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout_duration())
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| RequestError::BuildError(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| RequestError::BuildError(e.to_string()))?;
        Ok(Self { client })
    }

    fn execute(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<HttpResponse, RequestError> {
        let start = Instant::now();
        let response = request.send().map_err(RequestError::from)?;

        let status_code = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = std::collections::HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_string(), value_str.to_string());
            }
        }

        let body = response.text().map_err(RequestError::from)?;

        Ok(HttpResponse {
            status_code,
            status_text,
            headers,
            body,
            duration: start.elapsed(),
        })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse, RequestError> {
        validate_url(url)?;
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        self.execute(request)
    }

    fn post(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &str,
    ) -> Result<HttpResponse, RequestError> {
        validate_url(url)?;
        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(name, value);
        }
        self.execute(request.body(body.to_string()))
    }
}
