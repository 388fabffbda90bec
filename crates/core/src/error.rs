use mediquery_types::TextError;

/// Errors raised while producing an analysis.
///
/// Content that fails to parse is not an error: it is replaced by the fallback record. Only
/// invalid input and failures to talk to the upstream service end up here.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to reach completion service: {0}")]
    UpstreamTransport(#[source] reqwest::Error),
    #[error("completion service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("failed to decode completion response: {0}")]
    UpstreamDecode(String),
}

impl ServiceError {
    /// Whether the failure was caused by the caller rather than the upstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_))
    }
}

impl From<TextError> for ServiceError {
    fn from(err: TextError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid temperature '{0}': must be a number between 0 and 2")]
    InvalidTemperature(String),
    #[error("invalid upstream timeout '{0}': must be a positive number of seconds")]
    InvalidTimeout(String),
    #[error("model name cannot be empty")]
    EmptyModel,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
