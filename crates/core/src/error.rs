//! Error types for recipe scraping operations.
//!
//! [`RecipeError`] covers every failure that can happen while fetching a
//! recipe page, turning its bold text into a [`SimulationProfile`](crate::SimulationProfile),
//! rendering the FP1 document and writing it to disk.
//!
//! Failures are grouped into an [`ErrorCategory`]. The batch driver logs it
//! and records it on every failed recipe in the batch report.
//!
//! # Example
//!
//! ```rust
//! use simrecipe_core::{ErrorCategory, RecipeError};
//!
//! let err = RecipeError::MissingField("film_simulation");
//! assert_eq!(err.category(), ErrorCategory::ProfileConstruction);
//! ```

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Main error type for recipe scraping.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A value did not name any member of a closed enumeration.
    ///
    /// `kind` is the enumeration (e.g. "film simulation"), `value` the
    /// cleaned token that failed to match.
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// A single field could not be normalized.
    #[error("Could not parse {field}: {reason}")]
    FieldError { field: String, reason: String },

    /// The collected fields cannot satisfy a required profile field.
    #[error("Profile is missing required field '{0}'")]
    MissingField(&'static str),

    /// The page contained no bold text to build a profile from.
    #[error("No recipe settings found at {0}")]
    NoProfile(String),

    /// Template substitution failed.
    #[error("Render failed: {0}")]
    RenderError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Coarse classification of a [`RecipeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// One field failed; it is defaulted or dropped and parsing continues.
    Field,
    /// Required profile fields are missing, or the page had no settings.
    ProfileConstruction,
    /// Network failure, timeout or unusable URL.
    Fetch,
    /// Template substitution failed.
    Render,
    /// Reading or writing local files failed.
    Persistence,
}

impl RecipeError {
    /// Returns the failure category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            #[cfg(feature = "fetch")]
            RecipeError::HttpError(_) => ErrorCategory::Fetch,
            RecipeError::Timeout { .. } | RecipeError::InvalidUrl(_) => ErrorCategory::Fetch,
            RecipeError::UnknownVariant { .. } | RecipeError::FieldError { .. } => ErrorCategory::Field,
            RecipeError::HtmlParseError(_) | RecipeError::MissingField(_) | RecipeError::NoProfile(_) => {
                ErrorCategory::ProfileConstruction
            }
            RecipeError::RenderError(_) => ErrorCategory::Render,
            RecipeError::FileNotFound(_) | RecipeError::WriteError(_) => ErrorCategory::Persistence,
        }
    }

    pub(crate) fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        RecipeError::UnknownVariant { kind, value: value.into() }
    }

    pub(crate) fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RecipeError::FieldError { field: field.into(), reason: reason.into() }
    }
}

/// Result type alias for RecipeError.
pub type Result<T> = std::result::Result<T, RecipeError>;
