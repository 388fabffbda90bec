//! # MediQuery Types
//!
//! Shared data types for MediQuery.
//!
//! Contains:
//! - [`NonEmptyText`], the validated form of user-supplied symptom text
//! - [`SymptomAnalysis`], the five-field structured record produced for every query
//! - [`AnalysisResponse`], the analysis together with its human-readable rendering
//!
//! These types carry no behaviour beyond validation. Parsing, fallback and rendering live in
//! `mediquery-core`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so the stored
/// value never starts or ends with whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Structured guidance for one symptom query.
///
/// Every field is required when deserialising, so a record that parses is always complete. The
/// lists may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysis {
    /// Two or three plain sentences about the symptoms.
    pub explanation: String,
    pub possible_causes: Vec<String>,
    pub home_remedies: Vec<String>,
    pub when_to_see_doctor: Vec<String>,
    pub urgent_warnings: Vec<String>,
}

/// A [`SymptomAnalysis`] plus its human-readable rendering.
///
/// Serialises flat, so the wire shape is the five analysis fields followed by `humanReadable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: SymptomAnalysis,
    pub human_readable: String,
}
