use crate::config::Config;
use crate::errors::AppError;
use serde_json::Value;
use std::future::Future;

/// Header carrying the ARCEP credential.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Read-only access to the remote address directory.
///
/// The pipeline stages are generic over this trait so they can run against
/// an in-memory directory in tests.
pub trait DirectoryApi: Send + Sync {
    /// Issues one GET against `path` with `params` as query string, in order,
    /// and returns the decoded JSON body.
    fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Value, AppError>> + Send;
}

/// Client for the ARCEP open-data API.
#[derive(Clone)]
pub struct ArcepClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ArcepClient {
    /// Creates a new `ArcepClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the ARCEP API, without trailing slash.
    /// * `api_key` - The access token. `None` is accepted here and reported
    ///   as a configuration error on the first call.
    /// * `timeout` - Optional per-request deadline. `None` keeps reqwest's default (no deadline).
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            AppError::Configuration(format!("Failed to create ARCEP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            config.arcep_base_url.clone(),
            config.arcep_api_key.clone(),
            config.request_timeout,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration("ARCEP_API_KEY environment variable is not set".to_string())
        })
    }

    /// Builds `{base_url}{path}?k=v&...` with standard query encoding.
    pub fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url, AppError> {
        reqwest::Url::parse_with_params(&format!("{}{}", self.base_url, path), params)
            .map_err(|e| AppError::Configuration(format!("Failed to build ARCEP URL: {}", e)))
    }
}

impl DirectoryApi for ArcepClient {
    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, AppError> {
        // Checked before anything touches the network.
        let token = self.api_key()?;
        let url = self.build_url(path, params)?;
        tracing::debug!("ARCEP GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| AppError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("ARCEP {} returned {}", path, status);
            return Err(AppError::ApiError {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let data = response.json::<Value>().await?;
        Ok(data)
    }
}
