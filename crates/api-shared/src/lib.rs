//! # API Shared
//!
//! Shared definitions for the MediQuery HTTP API.
//!
//! Contains:
//! - Request/response bodies (`dto` module), used by the server and by remote clients
//! - Fixed user-facing error messages
//! - The `HealthService`
//!
//! Used by `api-rest`, and by `mediquery-cli` for its remote analyzer.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;

/// Path of the analysis endpoint.
pub const ANALYZE_SYMPTOMS_PATH: &str = "/api/analyze-symptoms";

/// Path of the credential diagnostic endpoint.
pub const TEST_ENV_PATH: &str = "/api/test-env";

/// Returned with 400 when the request carries no symptom text.
pub const NO_SYMPTOMS_MESSAGE: &str = "No symptoms provided";

/// Returned with 500 for any upstream failure. Details are logged, never returned.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze symptoms. Please try again or consult a healthcare professional.";
