//! # MediQuery Report
//!
//! Builds the downloadable "doctor report" for one analysis.
//!
//! Report generation is split in two:
//! - [`layout`] decides *what* goes on the page: section order, numbering, wrapping, and which
//!   sections are omitted
//! - [`pdf`] draws a layout onto A4 pages with `printpdf`, starting a new page when the cursor
//!   reaches the bottom margin

pub mod layout;
pub mod pdf;

pub use layout::{build_layout, Block, ReportLayout};
pub use pdf::render_pdf;

use mediquery_types::SymptomAnalysis;
use std::path::{Path, PathBuf};

/// File name used when the caller does not choose one.
pub const REPORT_FILE_NAME: &str = "mediquery-symptom-report.pdf";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to build PDF: {0}")]
    Pdf(String),
    #[error("failed to write report to {path}: {source}", path = path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Lay out and render a report, returning the PDF bytes.
pub fn generate_report(analysis: &SymptomAnalysis, symptoms: &str) -> ReportResult<Vec<u8>> {
    let generated_on = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    render_pdf(&build_layout(analysis, symptoms, &generated_on))
}

/// Generate a report and write it to `path`.
///
/// If `path` is a directory, the report is written inside it as [`REPORT_FILE_NAME`].
pub fn export_report(
    analysis: &SymptomAnalysis,
    symptoms: &str,
    path: &Path,
) -> ReportResult<PathBuf> {
    let target = if path.is_dir() {
        path.join(REPORT_FILE_NAME)
    } else {
        path.to_path_buf()
    };

    let bytes = generate_report(analysis, symptoms)?;
    std::fs::write(&target, bytes).map_err(|source| ReportError::Write {
        path: target.clone(),
        source,
    })?;

    tracing::info!("Wrote symptom report to {}", target.display());
    Ok(target)
}

/// Greedy word wrap on character count.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let current_len = current.chars().count();
            if current_len > 0 && current_len + word.chars().count() + 1 > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
