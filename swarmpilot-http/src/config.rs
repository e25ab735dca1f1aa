//! HTTP configuration

use std::time::Duration;
use swarmpilot_config::ControlApiConfig;

/// Control API client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Base URL of the load generator's web API
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ControlApiConfig::default().into()
    }
}

impl From<ControlApiConfig> for HttpConfig {
    fn from(config: ControlApiConfig) -> Self {
        Self {
            base_url: config.base_url,
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            user_agent: config.user_agent,
        }
    }
}
