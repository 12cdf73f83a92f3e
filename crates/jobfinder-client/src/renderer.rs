use std::time::Duration;

use jobfinder_core::error::AppError;
use jobfinder_core::traits::Renderer;
use reqwest::Client;
use url::Url;

pub const DEFAULT_RENDERER_URL: &str = "https://renderer-production-925.up.railway.app/render";
pub const DEFAULT_URL_PARAM: &str = "url";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and how to reach the rendering service.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Fixed renderer endpoint; the target URL is appended as a query parameter.
    pub endpoint: Url,
    /// Name of the query parameter carrying the target URL.
    pub url_param: String,
    /// Transport-level timeout for one render.
    pub timeout: Duration,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_RENDERER_URL).expect("default renderer URL is valid"),
            url_param: DEFAULT_URL_PARAM.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RendererConfig {
    /// Read configuration from environment variables, falling back to defaults.
    ///
    /// - `JOBFINDER_RENDERER_URL`
    /// - `JOBFINDER_RENDERER_PARAM`
    /// - `JOBFINDER_RENDER_TIMEOUT_SECS` (must be at least 1)
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("JOBFINDER_RENDERER_URL") {
            config.endpoint = Url::parse(&raw).map_err(|e| {
                AppError::Config(format!("Invalid JOBFINDER_RENDERER_URL '{raw}': {e}"))
            })?;
        }
        if let Ok(param) = std::env::var("JOBFINDER_RENDERER_PARAM") {
            config.url_param = param;
        }
        if let Ok(raw) = std::env::var("JOBFINDER_RENDER_TIMEOUT_SECS") {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    /// Point at a different renderer endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|_| {
        AppError::Config(format!(
            "Invalid JOBFINDER_RENDER_TIMEOUT_SECS '{raw}': must be a positive integer"
        ))
    })?;
    if secs == 0 {
        return Err(AppError::Config(
            "JOBFINDER_RENDER_TIMEOUT_SECS must be at least 1".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// HTTP client for the headless rendering service.
///
/// Issues one GET per render and never retries; retry policy belongs to
/// the caller.
#[derive(Clone)]
pub struct RendererClient {
    client: Client,
    endpoint: Url,
    url_param: String,
}

impl RendererClient {
    pub fn new(config: &RendererConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("jobfinder/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            url_param: config.url_param.clone(),
        })
    }

    /// The renderer request URL for `target_url`, fully encoded.
    pub fn request_url(&self, target_url: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.url_param, target_url);
        url
    }
}

impl Renderer for RendererClient {
    async fn render(&self, target_url: &str) -> Result<String, AppError> {
        let request_url = self.request_url(target_url);

        let response = self.client.get(request_url).send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::RenderUnavailable(format!("Timed out rendering {target_url}"))
            } else if e.is_connect() {
                AppError::RenderUnavailable(format!("Connection failed: {e}"))
            } else {
                AppError::RenderUnavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RenderUnavailable(format!(
                "HTTP {} rendering {}",
                status.as_u16(),
                target_url
            )));
        }

        response.text().await.map_err(|e| {
            AppError::RenderUnavailable(format!("Failed to read renderer response: {e}"))
        })
    }
}
