//! Plain-text rendering of an analysis for direct display.

use mediquery_types::SymptomAnalysis;

pub const UNDERSTANDING_HEADING: &str = "Understanding Your Symptoms:";
pub const CAUSES_HEADING: &str = "Possible Causes:";
pub const SELF_CARE_HEADING: &str = "Self-Care Suggestions:";
pub const DOCTOR_HEADING: &str = "When to See a Doctor:";
pub const URGENT_HEADING: &str = "\u{1f6a8} Urgent Warning Signs:";

/// Render the analysis as headed, bulleted sections.
///
/// Section order is fixed: understanding, possible causes, self-care, when to see a doctor,
/// urgent warnings. Sections are emitted even when their list is empty.
pub fn human_readable(analysis: &SymptomAnalysis) -> String {
    let sections = [
        section(UNDERSTANDING_HEADING, std::slice::from_ref(&analysis.explanation)),
        section(CAUSES_HEADING, &analysis.possible_causes),
        section(SELF_CARE_HEADING, &analysis.home_remedies),
        section(DOCTOR_HEADING, &analysis.when_to_see_doctor),
        section(URGENT_HEADING, &analysis.urgent_warnings),
    ];
    sections.join("\n\n").trim().to_string()
}

fn section(heading: &str, items: &[String]) -> String {
    let bullets: Vec<String> = items.iter().map(|item| format!("- {}", item)).collect();
    format!("{}\n{}", heading, bullets.join("\n"))
}
