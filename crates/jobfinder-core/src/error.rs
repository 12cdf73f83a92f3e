use thiserror::Error;

/// Application-wide error types for the job finder.
#[derive(Error, Debug)]
pub enum AppError {
    /// The rendering service could not be reached, timed out, or answered
    /// with a non-success status.
    #[error("Renderer unavailable: {0}")]
    RenderUnavailable(String),

    /// The cache backing store failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller cancelled the query before it completed.
    #[error("Query cancelled")]
    Cancelled,
}

impl AppError {
    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RenderUnavailable(_) => "render_unavailable",
            AppError::Cache(_) => "cache_error",
            AppError::Serialization(_) => "serialization_error",
            AppError::Config(_) => "config_error",
            AppError::Cancelled => "cancelled",
        }
    }

    /// Returns true if the failure came from the rendering service.
    pub fn is_render_unavailable(&self) -> bool {
        matches!(self, AppError::RenderUnavailable(_))
    }
}
