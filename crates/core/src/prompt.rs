//! Prompt construction for the symptom-analysis completion.

use crate::upstream::{ChatCompletionRequest, ChatMessage};
use crate::CoreConfig;
use mediquery_types::NonEmptyText;

/// System instruction sent with every query.
///
/// Forbids a diagnosis and pins the output to the five-field JSON shape that
/// [`crate::normalize::parse_analysis`] accepts.
pub const SYSTEM_PROMPT: &str = r#"
You are a medical assistant. Respond clearly and simply to patients.
Do NOT give a diagnosis.

Output JSON only in this format (no extra text):
{
  "explanation": "Explain the symptoms in 2-3 simple sentences.",
  "possibleCauses": ["Short list of possible causes"],
  "homeRemedies": ["Simple self-care suggestions"],
  "whenToSeeDoctor": ["Clear guidance on when to consult a doctor"],
  "urgentWarnings": ["Immediate medical attention warning signs"]
}
"#;

/// User turn for the given symptoms.
pub fn user_message(symptoms: &NonEmptyText) -> String {
    format!("Patient reports: {}", symptoms)
}

/// Build the single upstream request for one query.
pub fn build_request(config: &CoreConfig, symptoms: &NonEmptyText) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model().to_string(),
        messages: vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(user_message(symptoms)),
        ],
        temperature: config.temperature(),
    }
}
