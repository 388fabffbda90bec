//! Wire types for the HTTP API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use mediquery_types::{AnalysisResponse, SymptomAnalysis};

/// Body of `POST /api/analyze-symptoms`.
///
/// `symptoms` is optional on the wire so that a missing field is reported as a client error by
/// the handler rather than as a deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeSymptomsReq {
    #[serde(default)]
    pub symptoms: Option<String>,
}

impl AnalyzeSymptomsReq {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: Some(symptoms.into()),
        }
    }
}

/// Error body for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Body of `GET /api/test-env`. Reports presence only, never the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestEnvRes {
    pub groq_api_key_configured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
