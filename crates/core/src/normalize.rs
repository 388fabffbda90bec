//! Turning raw completion text into a [`SymptomAnalysis`].
//!
//! The model is asked for bare JSON but frequently wraps it in a Markdown code fence, so fences
//! are stripped before parsing. Anything that still fails to parse is replaced by
//! [`fallback_analysis`]: callers always receive a complete record, never a parse error.

use mediquery_types::{NonEmptyText, SymptomAnalysis};
use tracing::warn;

const FENCE_WITH_LANG: &str = "```json";
const FENCE: &str = "```";

/// Where a normalised analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    /// Parsed from the model's response.
    Model,
    /// The model's response could not be parsed; the fallback record was used.
    Fallback,
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker, then trim.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace(FENCE_WITH_LANG, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

/// Strictly parse already-unfenced text into a [`SymptomAnalysis`].
///
/// All five fields must be present with the right types. Extra fields are ignored.
pub fn parse_analysis(text: &str) -> Result<SymptomAnalysis, serde_json::Error> {
    serde_json::from_str(text)
}

/// The fixed record used when the model's response is unusable.
pub fn fallback_analysis(symptoms: &NonEmptyText) -> SymptomAnalysis {
    SymptomAnalysis {
        explanation: format!(
            "Based on your symptoms: \"{}\", here\u{2019}s some guidance.",
            symptoms
        ),
        possible_causes: to_owned(&[
            "Common viral infection",
            "Allergies",
            "Mild bacterial infection",
        ]),
        home_remedies: to_owned(&[
            "Rest and stay hydrated",
            "Use mild pain relievers if needed",
            "Apply warm/cold compress",
            "Maintain good hygiene",
        ]),
        when_to_see_doctor: to_owned(&[
            "If symptoms last more than 7 days",
            "If symptoms get worse",
            "If new symptoms appear",
        ]),
        urgent_warnings: to_owned(&[
            "Difficulty breathing",
            "Severe chest pain",
            "High fever (>39\u{b0}C / 103\u{b0}F)",
            "Severe headache with neck stiffness",
        ]),
    }
}

/// Normalise raw completion text for the given symptoms.
pub fn normalize(raw: &str, symptoms: &NonEmptyText) -> (SymptomAnalysis, AnalysisSource) {
    let text = strip_code_fences(raw);
    match parse_analysis(&text) {
        Ok(analysis) => (analysis, AnalysisSource::Model),
        Err(e) => {
            warn!(
                "Failed to parse completion as analysis ({}), falling back to defaults: {}",
                e, text
            );
            (fallback_analysis(symptoms), AnalysisSource::Fallback)
        }
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "explanation": "A sore throat with a mild fever is often caused by a virus.",
        "possibleCauses": ["Common cold", "Strep throat"],
        "homeRemedies": ["Warm salt water gargles", "Rest"],
        "whenToSeeDoctor": ["Fever above 39C", "Symptoms beyond a week"],
        "urgentWarnings": ["Difficulty swallowing or breathing"]
    }"#;

    fn symptoms() -> NonEmptyText {
        NonEmptyText::new("sore throat and mild fever for two days").unwrap()
    }

    #[test]
    fn parses_plain_json() {
        let (analysis, source) = normalize(VALID, &symptoms());
        assert_eq!(source, AnalysisSource::Model);
        assert_eq!(analysis.possible_causes, vec!["Common cold", "Strep throat"]);
        assert_eq!(analysis.urgent_warnings.len(), 1);
    }

    #[test]
    fn fenced_json_matches_unfenced() {
        let fenced = format!("```json\n{}\n```", VALID);
        let bare_fence = format!("Here you go:\n```\n{}\n```  ", VALID);

        let (plain, _) = normalize(VALID, &symptoms());
        let (from_fenced, source) = normalize(&fenced, &symptoms());
        assert_eq!(source, AnalysisSource::Model);
        assert_eq!(from_fenced, plain);

        // Prose outside the fence is not stripped, so this one falls back.
        let (_, source) = normalize(&bare_fence, &symptoms());
        assert_eq!(source, AnalysisSource::Fallback);

        let (from_bare, source) = normalize(&format!("```\n{}\n```", VALID), &symptoms());
        assert_eq!(source, AnalysisSource::Model);
        assert_eq!(from_bare, plain);
    }

    #[test]
    fn truncated_json_yields_exact_fallback() {
        let truncated = &VALID[..VALID.len() / 2];
        let (analysis, source) = normalize(truncated, &symptoms());
        assert_eq!(source, AnalysisSource::Fallback);
        assert_eq!(analysis, fallback_analysis(&symptoms()));
    }

    #[test]
    fn empty_text_falls_back() {
        let (analysis, source) = normalize("", &symptoms());
        assert_eq!(source, AnalysisSource::Fallback);
        assert_eq!(analysis, fallback_analysis(&symptoms()));
    }

    #[test]
    fn missing_field_falls_back() {
        let partial = r#"{"explanation":"x","possibleCauses":[],"homeRemedies":[],"whenToSeeDoctor":[]}"#;
        let (_, source) = normalize(partial, &symptoms());
        assert_eq!(source, AnalysisSource::Fallback);
    }

    #[test]
    fn wrong_field_type_falls_back() {
        let wrong = r#"{"explanation":"x","possibleCauses":"a cold","homeRemedies":[],"whenToSeeDoctor":[],"urgentWarnings":[]}"#;
        let (_, source) = normalize(wrong, &symptoms());
        assert_eq!(source, AnalysisSource::Fallback);
    }

    #[test]
    fn empty_lists_are_accepted() {
        let empty = r#"{"explanation":"x","possibleCauses":[],"homeRemedies":[],"whenToSeeDoctor":[],"urgentWarnings":[],"confidence":"low"}"#;
        let (analysis, source) = normalize(empty, &symptoms());
        assert_eq!(source, AnalysisSource::Model);
        assert!(analysis.urgent_warnings.is_empty());
    }

    #[test]
    fn fallback_quotes_symptoms() {
        let fallback = fallback_analysis(&symptoms());
        assert_eq!(
            fallback.explanation,
            "Based on your symptoms: \"sore throat and mild fever for two days\", here\u{2019}s some guidance."
        );
        assert_eq!(fallback.possible_causes.len(), 3);
        assert_eq!(fallback.home_remedies.len(), 4);
        assert_eq!(fallback.when_to_see_doctor.len(), 3);
        assert_eq!(fallback.urgent_warnings[2], "High fever (>39°C / 103°F)");
    }

    #[test]
    fn strip_code_fences_removes_all_markers() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  ```{}```  "), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }
}
