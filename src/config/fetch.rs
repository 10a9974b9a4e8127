//! One-shot configuration fetch from the remote service.

use reqwest::Client;

use crate::config::schema::{AppConfig, ConfigError};

/// Fetch and validate the application configuration.
///
/// Issues a single GET to `{base_url}/{app_id}`. Any failure is fatal to
/// initialization; the caller may retry by re-running initialization.
pub async fn fetch_config(
    http: &Client,
    base_url: &str,
    app_id: &str,
) -> Result<AppConfig, ConfigError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), app_id);

    let response = http.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ConfigError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    let config: AppConfig = serde_json::from_str(&body)?;
    config.validate()?;

    tracing::info!(
        servers = config.servers.len(),
        timeout_ms = config.timeout,
        retries = config.retries,
        stats = config.stats,
        "Configuration loaded"
    );

    Ok(config)
}
