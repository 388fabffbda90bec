//! Constants used throughout the MediQuery core crate.

use std::time::Duration;

/// Default OpenAI-compatible chat-completion endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Highest temperature accepted by OpenAI-compatible providers.
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Connect timeout for the upstream HTTP client. The request itself has no timeout unless one is
/// configured.
pub const UPSTREAM_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shown as the assistant turn when an analysis could not be obtained.
pub const APOLOGY_TEXT: &str = "I apologize, but I encountered an error analyzing your symptoms. Please try again or consult a healthcare professional.";
