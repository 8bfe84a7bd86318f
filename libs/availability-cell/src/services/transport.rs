use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::SchedulingError;

use crate::models::ErrorBody;

/// JSON-over-HTTP transport to the scheduling service.
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Result<Self, SchedulingError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SchedulingError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.scheduling_api_url.trim_end_matches('/').to_string(),
            api_key: config.scheduling_api_key.clone(),
            auth_token: config.scheduling_auth_token.clone(),
        })
    }

    fn get_headers(&self) -> Result<HeaderMap, SchedulingError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| SchedulingError::Transport("API key is not a valid header value".to_string()))?;
        headers.insert("apikey", api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SchedulingError::Transport("Auth token is not a valid header value".to_string()))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<T, SchedulingError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url)
            .headers(self.get_headers()?);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            SchedulingError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await
            .map_err(|e| SchedulingError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(SchedulingError::from_status(
                status.as_u16(),
                ErrorBody::extract_message(&text),
            ));
        }

        // Empty 2xx bodies decode like JSON null.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str::<T>(payload).map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            SchedulingError::Decode(e.to_string())
        })
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
