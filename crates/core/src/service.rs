//! The request normaliser as a service.

use crate::normalize::{normalize, AnalysisSource};
use crate::prompt::build_request;
use crate::render::human_readable;
use crate::upstream::{CompletionClient, GroqClient};
use crate::{ConfigResult, CoreConfig, ServiceError, ServiceResult};
use mediquery_types::{AnalysisResponse, NonEmptyText};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Produces a [`AnalysisResponse`] for a symptom description.
///
/// Cheap to clone; configuration and client are shared.
#[derive(Clone)]
pub struct SymptomService {
    config: Arc<CoreConfig>,
    client: Arc<dyn CompletionClient>,
}

impl SymptomService {
    pub fn new(config: Arc<CoreConfig>, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    /// Build a service that talks to the configured upstream endpoint.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the HTTP client cannot be built.
    pub fn from_config(config: Arc<CoreConfig>) -> ConfigResult<Self> {
        let client = GroqClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Analyse a symptom description.
    ///
    /// Empty or whitespace-only input is rejected before any network call. An upstream response
    /// that cannot be parsed yields the fallback record rather than an error.
    ///
    /// # Errors
    ///
    /// - `ServiceError::InvalidInput` for empty input
    /// - `ServiceError::Upstream*` if the completion service cannot be reached or answers with an
    ///   error status or an undecodable envelope
    pub async fn analyze(&self, symptoms: &str) -> ServiceResult<AnalysisResponse> {
        let symptoms = NonEmptyText::new(symptoms)?;
        debug!("Analysing symptoms ({} chars)", symptoms.as_str().len());

        let request = build_request(&self.config, &symptoms);
        let raw = self.client.complete(&request).await.map_err(|e| {
            error!("Completion request failed: {}", e);
            e
        })?;

        let (analysis, source) = normalize(&raw, &symptoms);
        if source == AnalysisSource::Fallback {
            info!("Returning fallback analysis");
        }

        let human_readable = human_readable(&analysis);
        Ok(AnalysisResponse {
            analysis,
            human_readable,
        })
    }
}

impl std::fmt::Debug for SymptomService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::normalize::fallback_analysis;
    use crate::render::{
        CAUSES_HEADING, DOCTOR_HEADING, SELF_CARE_HEADING, UNDERSTANDING_HEADING, URGENT_HEADING,
    };

    #[tokio::test]
    async fn empty_input_makes_no_network_call() {
        let client = ScriptedClient::text(VALID_JSON);
        let service = service_with(client.clone());

        for input in ["", "   ", "\n\t"] {
            let err = service.analyze(input).await.unwrap_err();
            assert!(err.is_client_error());
        }
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn valid_response_is_parsed_and_rendered_in_order() {
        let client = ScriptedClient::text(format!("```json\n{}\n```", VALID_JSON));
        let service = service_with(client.clone());

        let response = service
            .analyze("sore throat and mild fever for two days")
            .await
            .unwrap();

        assert_eq!(client.calls(), 1);
        assert_eq!(response.analysis.possible_causes, vec!["Common cold", "Pharyngitis"]);

        let text = &response.human_readable;
        let order: Vec<usize> = [
            UNDERSTANDING_HEADING,
            CAUSES_HEADING,
            SELF_CARE_HEADING,
            DOCTOR_HEADING,
            URGENT_HEADING,
        ]
        .iter()
        .map(|h| text.find(h).expect("heading present"))
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("- Pharyngitis"));
        assert!(text.contains("- Unable to swallow fluids"));
    }

    #[tokio::test]
    async fn sends_trimmed_symptoms_to_upstream() {
        let client = ScriptedClient::text(VALID_JSON);
        let service = service_with(client.clone());

        service.analyze("  itchy eyes  ").await.unwrap();
        let request = client.last_request().unwrap();
        assert_eq!(request.messages[1].content, "Patient reports: itchy eyes");
    }

    #[tokio::test]
    async fn malformed_response_returns_fallback() {
        let client = ScriptedClient::text("{\"explanation\": \"cut off");
        let service = service_with(client);

        let response = service.analyze("dizzy").await.unwrap();
        let expected = fallback_analysis(&NonEmptyText::new("dizzy").unwrap());
        assert_eq!(response.analysis, expected);
        assert_eq!(response.human_readable, human_readable(&expected));
    }

    #[tokio::test]
    async fn upstream_failure_is_service_error() {
        let client = ScriptedClient::new(Reply::Status(503));
        let service = service_with(client.clone());

        let err = service.analyze("cough").await.unwrap_err();
        assert!(matches!(err, ServiceError::UpstreamStatus { status: 503, .. }));
        assert!(!err.is_client_error());
        assert_eq!(client.calls(), 1);
    }
}
