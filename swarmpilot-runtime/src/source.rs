//! Scenario sources
//!
//! A scenario comes from a local JSON file or is fetched over HTTP(S), the
//! way a mounted or served ConfigMap would be read.

use crate::error::SourceError;
use std::path::Path;
use std::time::Duration;
use swarmpilot_core::Scenario;
use tracing::info;

/// Load and validate the scenario at `source`, a path or an http(s) URL
pub async fn load_scenario(source: &str, timeout: Duration) -> Result<Scenario, SourceError> {
    let text = if is_url(source) {
        fetch(source, timeout).await?
    } else {
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| SourceError::Read {
                path: Path::new(source).to_path_buf(),
                source: e,
            })?
    };

    let scenario = Scenario::parse(&text)?;
    info!(source, phases = scenario.len(), "Loaded scenario");
    Ok(scenario)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch(url: &str, timeout: Duration) -> Result<String, SourceError> {
    let fetch_error = |message: String| SourceError::Fetch {
        url: url.to_string(),
        message,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| fetch_error(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status)));
    }

    response.text().await.map_err(|e| fetch_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_detection() {
        assert!(is_url("http://config/scenario.json"));
        assert!(is_url("https://config/scenario.json"));
        assert!(!is_url("/etc/scenario/scenario.json"));
        assert!(!is_url("httpdocs/scenario.json"));
    }
}
