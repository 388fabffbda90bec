//! Analyzer backed by a running MediQuery REST server.

use api_shared::{AnalyzeSymptomsReq, ErrorRes, TestEnvRes, ANALYZE_SYMPTOMS_PATH, TEST_ENV_PATH};
use mediquery_core::{AnalysisResponse, Analyzer, ServiceError, ServiceResult};
use reqwest::{StatusCode, Url};

#[derive(Debug, Clone)]
pub struct RemoteAnalyzer {
    client: reqwest::Client,
    base: Url,
}

impl RemoteAnalyzer {
    /// `server` may carry a path prefix (`http://host/mediquery`); endpoints are resolved below it.
    ///
    /// # Errors
    ///
    /// Returns an error if `server` is not an absolute http(s) URL.
    pub fn new(server: &str) -> anyhow::Result<Self> {
        let mut base = Url::parse(server)?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("server URL must use http or https: {server}");
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> ServiceResult<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::InvalidInput(format!("bad server URL: {e}")))
    }

    /// Ask the server whether its completion credential is configured.
    pub async fn credential_configured(&self) -> ServiceResult<bool> {
        let response = self
            .client
            .get(self.endpoint(TEST_ENV_PATH)?)
            .send()
            .await
            .map_err(ServiceError::UpstreamTransport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamStatus {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        let body: TestEnvRes = response
            .json()
            .await
            .map_err(|e| ServiceError::UpstreamDecode(e.to_string()))?;
        Ok(body.groq_api_key_configured)
    }
}

#[async_trait::async_trait]
impl Analyzer for RemoteAnalyzer {
    async fn analyze(&self, symptoms: &str) -> ServiceResult<AnalysisResponse> {
        let response = self
            .client
            .post(self.endpoint(ANALYZE_SYMPTOMS_PATH)?)
            .json(&AnalyzeSymptomsReq::new(symptoms))
            .send()
            .await
            .map_err(ServiceError::UpstreamTransport)?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<AnalysisResponse>()
                .await
                .map_err(|e| ServiceError::UpstreamDecode(e.to_string()));
        }

        let message = response
            .json::<ErrorRes>()
            .await
            .map(|e| e.error)
            .unwrap_or_default();
        if status == StatusCode::BAD_REQUEST {
            Err(ServiceError::InvalidInput(message))
        } else {
            Err(ServiceError::UpstreamStatus {
                status: status.as_u16(),
                body: message,
            })
        }
    }
}
