use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RECORD_BASE_URL: &str = "https://clinic.local";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scheduling_api_url: String,
    pub scheduling_api_key: String,
    pub scheduling_auth_token: Option<String>,
    pub request_timeout_secs: u64,
    pub record_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            scheduling_api_url: env::var("SCHEDULING_API_URL")
                .unwrap_or_else(|_| {
                    warn!("SCHEDULING_API_URL not set, using empty value");
                    String::new()
                }),
            scheduling_api_key: env::var("SCHEDULING_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("SCHEDULING_API_KEY not set, using empty value");
                    String::new()
                }),
            scheduling_auth_token: env::var("SCHEDULING_AUTH_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            request_timeout_secs: match env::var("SCHEDULING_TIMEOUT_SECS") {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("SCHEDULING_TIMEOUT_SECS is not a number ({}), using default", raw);
                    DEFAULT_TIMEOUT_SECS
                }),
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
            record_base_url: env::var("CLINIC_RECORD_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_RECORD_BASE_URL not set, using default");
                    DEFAULT_RECORD_BASE_URL.to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Scheduling client not fully configured - missing environment variables");
        }

        config
    }

    /// Config pointing at an explicit service URL, everything else defaulted.
    pub fn for_service(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            scheduling_api_url: url.into(),
            scheduling_api_key: api_key.into(),
            scheduling_auth_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            record_base_url: DEFAULT_RECORD_BASE_URL.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.scheduling_api_url.is_empty()
            && !self.scheduling_api_key.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_service_is_configured_with_defaults() {
        let config = AppConfig::for_service("http://localhost:4010", "key");
        assert!(config.is_configured());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.record_base_url, DEFAULT_RECORD_BASE_URL);
        assert!(config.scheduling_auth_token.is_none());
    }

    #[test]
    fn missing_key_is_not_configured() {
        let config = AppConfig::for_service("http://localhost:4010", "");
        assert!(!config.is_configured());
    }
}
