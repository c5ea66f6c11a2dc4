// reqwest-backed DeviceService

use crate::config::ServiceConfig;
use async_trait::async_trait;
use devsweep_core::error::{AppError, Result};
use devsweep_core::port::{
    DeviceService, InventoryPage, InventoryQuery, RemovalRequest, ServiceError,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

/// Longest error body kept in a `ServiceError::HttpStatus`
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Device-management REST client
///
/// Every request carries basic credentials plus the `ApiKey` header and is
/// bounded by the configured per-request timeout.
pub struct HttpDeviceService {
    client: Client,
    device_url: String,
    delete_url: String,
    username: String,
    password: String,
}

impl HttpDeviceService {
    /// Build a client from validated service settings
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| AppError::Config(format!("invalid api_key header value: {}", e)))?;
        headers.insert("ApiKey", api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            device_url: config.device_url.clone(),
            delete_url: config.delete_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, ServiceError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::HttpStatus {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DeviceService for HttpDeviceService {
    async fn fetch_page(
        &self,
        query: &InventoryQuery,
    ) -> std::result::Result<InventoryPage, ServiceError> {
        debug!(url = %self.device_url, offset = query.offset, limit = query.limit, "POST inventory page");
        let response = self
            .send(self.client.post(&self.device_url).json(query))
            .await?;

        let body = response.bytes().await.map_err(classify)?;
        serde_json::from_slice(&body).map_err(|e| ServiceError::MalformedBody(e.to_string()))
    }

    async fn submit_removal(
        &self,
        request: &RemovalRequest,
    ) -> std::result::Result<(), ServiceError> {
        debug!(url = %self.delete_url, action = %request.action, "PUT removal");
        self.send(self.client.put(&self.delete_url).json(request))
            .await?;
        Ok(())
    }
}

/// Sort a transport failure into the retry taxonomy
fn classify(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() {
        ServiceError::Connection(err.to_string())
    } else if err.is_body() || err.is_decode() {
        ServiceError::MalformedBody(err.to_string())
    } else {
        ServiceError::Request(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
