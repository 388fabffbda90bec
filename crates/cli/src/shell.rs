//! Interactive chat shell.
//!
//! Each input line is either a slash command or a symptom description submitted to the session.

use mediquery_core::{Analyzer, ChatSession, ChatTurn, Role, SessionError, SymptomAnalysis};
use mediquery_report::{export_report, REPORT_FILE_NAME};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const GREETING: &str = "Describe your symptoms and press Enter. Commands: /report [path], /history, /help, /quit.\nThis tool provides general information only and is not a medical diagnosis.";

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Submit(&'a str),
    Report(Option<PathBuf>),
    History,
    Help,
    Quit,
    Unknown(&'a str),
    Empty,
}

pub fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Submit(line);
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "report" if arg.is_empty() => Command::Report(None),
        "report" => Command::Report(Some(PathBuf::from(arg))),
        "history" => Command::History,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Full terminal rendering of an analysis: numbered causes, bulleted lists, empty lists omitted.
pub fn format_analysis(analysis: &SymptomAnalysis) -> String {
    let mut out = format!("Understanding Your Symptoms:\n{}\n", analysis.explanation);

    if !analysis.possible_causes.is_empty() {
        out.push_str("\nPossible Causes:\n");
        for (i, cause) in analysis.possible_causes.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, cause));
        }
    }
    push_bullets(&mut out, "Self-Care Suggestions:", &analysis.home_remedies);
    push_bullets(&mut out, "When to See a Doctor:", &analysis.when_to_see_doctor);
    push_bullets(
        &mut out,
        "\u{1f6a8} Urgent Warning Signs:",
        &analysis.urgent_warnings,
    );
    out
}

fn push_bullets(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(heading);
    out.push('\n');
    for item in items {
        out.push_str(&format!("  - {item}\n"));
    }
}

/// Assistant turns with an analysis print in full; anything else prints its text.
pub fn format_turn(turn: &ChatTurn) -> String {
    match &turn.analysis {
        Some(analysis) => format_analysis(analysis),
        None => format!("{}\n", turn.text),
    }
}

pub struct Shell<A, W> {
    session: ChatSession<A>,
    out: W,
}

impl<A: Analyzer, W: Write> Shell<A, W> {
    pub fn new(analyzer: A, out: W) -> Self {
        Self {
            session: ChatSession::new(analyzer),
            out,
        }
    }

    /// Handle one input line.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing to the output fails. Analysis and export failures are
    /// reported to the user and the shell continues.
    pub async fn handle(&mut self, line: &str) -> anyhow::Result<Flow> {
        match parse_command(line) {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(self.out, "{GREETING}")?,
            Command::Unknown(name) => {
                writeln!(self.out, "Unknown command /{name}. Type /help for commands.")?
            }
            Command::History => self.history()?,
            Command::Report(path) => self.report(path)?,
            Command::Submit(symptoms) => {
                writeln!(self.out, "Analyzing your symptoms...")?;
                match self.session.submit(symptoms).await {
                    Ok(turn) => write!(self.out, "\n{}\n", format_turn(&turn))?,
                    Err(SessionError::Busy) => {
                        writeln!(self.out, "Please wait for the current analysis to finish.")?
                    }
                    Err(SessionError::EmptyInput) => {}
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn history(&mut self) -> anyhow::Result<()> {
        let turns = self.session.transcript().snapshot();
        if turns.is_empty() {
            writeln!(self.out, "No messages yet.")?;
        }
        for turn in turns {
            let who = match turn.role {
                Role::User => "You",
                Role::Assistant => "MediQuery",
            };
            let first_line = turn.text.lines().next().unwrap_or_default();
            writeln!(
                self.out,
                "[{}] {}: {}",
                turn.timestamp.format("%H:%M:%S"),
                who,
                first_line
            )?;
        }
        Ok(())
    }

    fn report(&mut self, path: Option<PathBuf>) -> anyhow::Result<()> {
        let Some(source) = self.session.transcript().latest_report_source() else {
            writeln!(self.out, "No analysis to export yet.")?;
            return Ok(());
        };
        let path = path.unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));
        match export_report(&source.analysis, &source.symptoms, &path) {
            Ok(written) => writeln!(self.out, "Report saved to {}", written.display())?,
            Err(e) => {
                tracing::error!("Report export failed: {:?}", e);
                writeln!(self.out, "Could not save the report: {e}")?
            }
        }
        Ok(())
    }
}

/// Run the shell on stdin/stdout until `/quit` or end of input.
pub async fn run<A: Analyzer>(analyzer: A) -> anyhow::Result<()> {
    let mut shell = Shell::new(analyzer, std::io::stdout());
    writeln!(shell.out, "{GREETING}")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(shell.out, "> ")?;
        shell.out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if shell.handle(&line).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
