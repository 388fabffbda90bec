//! # MediQuery Core
//!
//! Core logic for the MediQuery symptom checker.
//!
//! This crate contains:
//! - The request normaliser: prompt construction, the upstream chat-completion call, code-fence
//!   stripping, strict parsing, and the fallback record
//! - The human-readable rendering of a [`SymptomAnalysis`]
//! - The chat transcript and session used by interactive shells
//!
//! **No API concerns**: HTTP servers, OpenAPI documents and terminal I/O belong in `api-rest`
//! and `mediquery-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod render;
pub mod service;
pub mod session;
pub mod upstream;

pub use config::CoreConfig;
pub use error::{ConfigError, ConfigResult, ServiceError, ServiceResult};
pub use service::SymptomService;
pub use session::{Analyzer, ChatSession, ChatTurn, ReportSource, Role, SessionError, Transcript};
pub use upstream::{CompletionClient, GroqClient};

pub use mediquery_types::{AnalysisResponse, NonEmptyText, SymptomAnalysis};
