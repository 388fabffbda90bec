//! Report structure, independent of any drawing backend.

use crate::wrap_text;
use mediquery_types::SymptomAnalysis;

pub const REPORT_TITLE: &str = "MEDICAL SYMPTOM ANALYSIS REPORT";
pub const DISCLAIMER_HEADING: &str = "IMPORTANT DISCLAIMER:";
pub const DISCLAIMER_TEXT: &str = "This report is for educational purposes only and does not constitute medical advice, diagnosis, or treatment. Always consult qualified healthcare professionals for medical concerns.";
pub const SUBJECTIVE_HEADING: &str = "SUBJECTIVE (Patient-Reported Symptoms):";
pub const ASSESSMENT_HEADING: &str = "ASSESSMENT (AI Analysis):";
pub const CAUSES_HEADING: &str = "Possible Causes to Discuss:";
pub const PLAN_HEADING: &str = "PLAN (Recommendations):";
pub const SELF_CARE_HEADING: &str = "Self-Care Suggestions:";
pub const PROVIDER_HEADING: &str = "When to Consult Healthcare Provider:";
pub const URGENT_HEADING: &str = "URGENT WARNING SIGNS - SEEK IMMEDIATE CARE:";

/// Characters per line for body text at 11pt across the printable width.
pub const BODY_WRAP: usize = 90;
/// Characters per line inside the shaded banners, which are indented.
pub const BANNER_WRAP: usize = 100;

/// One vertical element of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Shaded banner with a bold heading and wrapped body text.
    Disclaimer { heading: String, lines: Vec<String> },
    /// Top-level SOAP section heading.
    Section(String),
    /// Heading inside a section.
    Subsection(String),
    /// Wrapped paragraph.
    Paragraph(Vec<String>),
    /// One list entry, already prefixed with its number or bullet and wrapped.
    ListItem(Vec<String>),
    /// Vertical space after a group.
    Gap,
    /// Highlighted urgent-warnings block; each entry is one wrapped bullet.
    Urgent {
        heading: String,
        items: Vec<Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub generated_on: String,
    pub blocks: Vec<Block>,
}

impl ReportLayout {
    /// Every line of text in reading order, for inspection.
    pub fn lines(&self) -> Vec<&str> {
        let mut out = vec![self.title.as_str(), self.generated_on.as_str()];
        for block in &self.blocks {
            match block {
                Block::Disclaimer { heading, lines } => {
                    out.push(heading);
                    out.extend(lines.iter().map(String::as_str));
                }
                Block::Section(text) | Block::Subsection(text) => out.push(text),
                Block::Paragraph(lines) | Block::ListItem(lines) => {
                    out.extend(lines.iter().map(String::as_str))
                }
                Block::Gap => {}
                Block::Urgent { heading, items } => {
                    out.push(heading);
                    out.extend(items.iter().flatten().map(String::as_str));
                }
            }
        }
        out
    }

    pub fn urgent_block(&self) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| matches!(b, Block::Urgent { .. }))
    }
}

/// Lay out the report for one analysis and the symptoms it answered.
///
/// Order: disclaimer, subjective, assessment, possible causes, plan (self-care, provider
/// guidance), urgent warnings. List sections with no entries are left out.
pub fn build_layout(analysis: &SymptomAnalysis, symptoms: &str, generated_on: &str) -> ReportLayout {
    let mut blocks = vec![
        Block::Disclaimer {
            heading: DISCLAIMER_HEADING.to_string(),
            lines: wrap_text(DISCLAIMER_TEXT, BANNER_WRAP),
        },
        Block::Section(SUBJECTIVE_HEADING.to_string()),
        Block::Paragraph(wrap_text(symptoms, BODY_WRAP)),
        Block::Gap,
        Block::Section(ASSESSMENT_HEADING.to_string()),
        Block::Paragraph(wrap_text(&analysis.explanation, BODY_WRAP)),
        Block::Gap,
    ];

    if !analysis.possible_causes.is_empty() {
        blocks.push(Block::Subsection(CAUSES_HEADING.to_string()));
        blocks.extend(
            analysis
                .possible_causes
                .iter()
                .enumerate()
                .map(|(i, cause)| Block::ListItem(wrap_text(&format!("{}. {}", i + 1, cause), BODY_WRAP))),
        );
        blocks.push(Block::Gap);
    }

    blocks.push(Block::Section(PLAN_HEADING.to_string()));
    push_bullets(&mut blocks, SELF_CARE_HEADING, &analysis.home_remedies);
    push_bullets(&mut blocks, PROVIDER_HEADING, &analysis.when_to_see_doctor);

    if !analysis.urgent_warnings.is_empty() {
        blocks.push(Block::Urgent {
            heading: URGENT_HEADING.to_string(),
            items: analysis
                .urgent_warnings
                .iter()
                .map(|w| wrap_text(&bullet(w), BANNER_WRAP))
                .collect(),
        });
    }

    ReportLayout {
        title: REPORT_TITLE.to_string(),
        generated_on: format!("Generated on: {}", generated_on),
        blocks,
    }
}

fn push_bullets(blocks: &mut Vec<Block>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    blocks.push(Block::Subsection(heading.to_string()));
    blocks.extend(
        items
            .iter()
            .map(|item| Block::ListItem(wrap_text(&bullet(item), BODY_WRAP))),
    );
    blocks.push(Block::Gap);
}

fn bullet(text: &str) -> String {
    format!("\u{2022} {}", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> SymptomAnalysis {
        SymptomAnalysis {
            explanation: "Sore throat with a mild fever is usually viral.".into(),
            possible_causes: vec!["Common cold".into(), "Pharyngitis".into()],
            home_remedies: vec!["Warm fluids".into(), "Rest".into()],
            when_to_see_doctor: vec!["Fever above 39C".into()],
            urgent_warnings: vec!["Difficulty breathing".into(), "Drooling".into()],
        }
    }

    fn position(layout: &ReportLayout, needle: &str) -> usize {
        layout
            .lines()
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("{needle} not in layout"))
    }

    #[test]
    fn sections_follow_fixed_order() {
        let layout = build_layout(&analysis(), "sore throat", "2026-10-18 09:00:00");
        let order = [
            DISCLAIMER_HEADING,
            SUBJECTIVE_HEADING,
            ASSESSMENT_HEADING,
            CAUSES_HEADING,
            PLAN_HEADING,
            SELF_CARE_HEADING,
            PROVIDER_HEADING,
            URGENT_HEADING,
        ]
        .map(|h| position(&layout, h));
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(layout.generated_on, "Generated on: 2026-10-18 09:00:00");
    }

    #[test]
    fn symptoms_appear_verbatim() {
        let layout = build_layout(&analysis(), "sore throat and mild fever for two days", "now");
        assert!(layout
            .lines()
            .contains(&"sore throat and mild fever for two days"));
    }

    #[test]
    fn causes_are_numbered() {
        let layout = build_layout(&analysis(), "x", "now");
        let lines = layout.lines();
        assert!(lines.contains(&"1. Common cold"));
        assert!(lines.contains(&"2. Pharyngitis"));
    }

    #[test]
    fn urgent_block_contains_every_warning() {
        let layout = build_layout(&analysis(), "x", "now");
        match layout.urgent_block() {
            Some(Block::Urgent { heading, items }) => {
                assert_eq!(heading, URGENT_HEADING);
                let flat: Vec<&String> = items.iter().flatten().collect();
                assert!(flat.iter().any(|l| l.contains("Difficulty breathing")));
                assert!(flat.iter().any(|l| l.contains("Drooling")));
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected urgent block, got {other:?}"),
        }
    }

    #[test]
    fn empty_warnings_omit_urgent_block() {
        let mut a = analysis();
        a.urgent_warnings.clear();
        let layout = build_layout(&a, "x", "now");
        assert!(layout.urgent_block().is_none());
        assert!(!layout.lines().iter().any(|l| l.contains(URGENT_HEADING)));
    }

    #[test]
    fn empty_lists_omit_their_sections_but_keep_plan() {
        let a = SymptomAnalysis {
            explanation: "Only an explanation.".into(),
            possible_causes: vec![],
            home_remedies: vec![],
            when_to_see_doctor: vec![],
            urgent_warnings: vec![],
        };
        let layout = build_layout(&a, "x", "now");
        let lines = layout.lines();
        assert!(!lines.contains(&CAUSES_HEADING));
        assert!(!lines.contains(&SELF_CARE_HEADING));
        assert!(!lines.contains(&PROVIDER_HEADING));
        assert!(lines.contains(&PLAN_HEADING));
        assert!(lines.contains(&"Only an explanation."));
    }

    #[test]
    fn long_explanation_wraps() {
        let mut a = analysis();
        a.explanation = "word ".repeat(100);
        let layout = build_layout(&a, "x", "now");
        let paragraph = layout
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(lines) => Some(lines),
                _ => None,
            })
            .nth(1)
            .unwrap();
        assert!(paragraph.len() > 1);
        assert!(paragraph.iter().all(|l| l.chars().count() <= BODY_WRAP));
    }
}
