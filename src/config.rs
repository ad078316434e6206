use std::time::Duration;

/// Public ARCEP open-data API.
pub const DEFAULT_BASE_URL: &str = "https://dataviz.arcep.fr/api";

/// How the tool is exposed to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout.
    Stdio,
    /// JSON over HTTP.
    Http,
}

impl std::str::FromStr for Transport {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => anyhow::bail!("MCP_TRANSPORT must be 'stdio' or 'http', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Checked lazily by the directory client, not at load time.
    pub arcep_api_key: Option<String>,
    pub arcep_base_url: String,
    /// No client-side deadline unless set.
    pub request_timeout: Option<Duration>,
    pub transport: Transport,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            arcep_api_key: std::env::var("ARCEP_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            arcep_base_url: validate_base_url(
                std::env::var("ARCEP_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            )?,
            request_timeout: match std::env::var("ARCEP_TIMEOUT_SECS") {
                Ok(raw) if !raw.trim().is_empty() => {
                    let secs: u64 = raw.trim().parse().map_err(|_| {
                        anyhow::anyhow!("ARCEP_TIMEOUT_SECS must be a positive number of seconds")
                    })?;
                    if secs == 0 {
                        anyhow::bail!("ARCEP_TIMEOUT_SECS must be greater than zero");
                    }
                    Some(Duration::from_secs(secs))
                }
                _ => None,
            },
            transport: std::env::var("MCP_TRANSPORT")
                .unwrap_or_else(|_| "stdio".to_string())
                .parse()?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("ARCEP Base URL: {}", config.arcep_base_url);
        if config.arcep_api_key.is_none() {
            tracing::warn!("ARCEP_API_KEY is not set; every lookup will fail until it is");
        }
        if let Some(timeout) = config.request_timeout {
            tracing::info!("ARCEP request timeout: {}s", timeout.as_secs());
        }
        tracing::debug!("Transport: {:?}", config.transport);

        Ok(config)
    }
}

/// Rejects non-HTTP(S) URLs and strips trailing slashes so paths can be appended.
pub fn validate_base_url(url: String) -> anyhow::Result<String> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("ARCEP_BASE_URL must start with http:// or https://");
    }
    url::Url::parse(&url)
        .map_err(|e| anyhow::anyhow!("ARCEP_BASE_URL is not a valid URL: {}", e))?;
    Ok(url.trim_end_matches('/').to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arcep_api_key: None,
            arcep_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            transport: Transport::Stdio,
            port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_parsing() {
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!(" HTTP ".parse::<Transport>().unwrap(), Transport::Http);
        assert!("websocket".parse::<Transport>().is_err());
    }

    #[test]
    fn test_base_url_validation() {
        assert_eq!(
            validate_base_url("http://127.0.0.1:8080/api/".to_string()).unwrap(),
            "http://127.0.0.1:8080/api"
        );
        assert!(validate_base_url("ftp://dataviz.arcep.fr".to_string()).is_err());
        assert!(validate_base_url("https://".to_string()).is_err());
    }

    #[test]
    fn test_default_points_at_public_api() {
        let config = Config::default();
        assert_eq!(config.arcep_base_url, "https://dataviz.arcep.fr/api");
        assert!(config.arcep_api_key.is_none());
        assert!(config.request_timeout.is_none());
    }
}
