use super::{ChatCompletionRequest, ChatCompletionResponse, CompletionClient};
use crate::constants::UPSTREAM_CONNECT_TIMEOUT;
use crate::{ConfigError, ConfigResult, CoreConfig, ServiceError, ServiceResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use tracing::{debug, error};

/// Upper bound on the number of error-body bytes kept in a `ServiceError`.
const MAX_ERROR_BODY: usize = 512;

/// reqwest client for an OpenAI-compatible chat-completion endpoint (Groq by default).
///
/// One call per request, no retries.
#[derive(Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
}

impl GroqClient {
    /// Build a client from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the underlying HTTP client cannot be built.
    pub fn new(config: &CoreConfig) -> ConfigResult<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(UPSTREAM_CONNECT_TIMEOUT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            url: config.upstream_url().clone(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            } else {
                error!("API key contains characters not allowed in a header; sending without it");
            }
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait::async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> ServiceResult<String> {
        debug!("Requesting completion from {} with model {}", self.url, request.model);

        let response = self
            .client
            .post(self.url.clone())
            .headers(self.headers())
            .json(request)
            .send()
            .await
            .map_err(ServiceError::UpstreamTransport)?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(ServiceError::UpstreamTransport)?;

        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&body).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| text.is_char_boundary(*i))
                    .unwrap_or(0);
                text.truncate(cut);
            }
            return Err(ServiceError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let envelope: ChatCompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| ServiceError::UpstreamDecode(e.to_string()))?;
        Ok(envelope.first_content())
    }
}
