//! Provider Error Classification
//!
//! Collapses raw provider failures into the two messages a user ever sees.

/// Shown whenever the provider reports rate limiting or an exhausted quota.
pub const QUOTA_MESSAGE: &str =
    "The AI service is receiving too many requests or its quota has been exceeded. Please wait a moment and try again.";

const QUOTA_MARKERS: [&str; 4] = ["429", "quota", "rate limit", "resource exhausted"];

/// User-facing category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Quota,
    Generic,
}

impl ErrorClass {
    /// Renders the user-facing message for a failed `action`
    /// (for example "generate a travel plan").
    pub fn user_message(self, action: &str) -> String {
        match self {
            ErrorClass::Quota => QUOTA_MESSAGE.to_string(),
            ErrorClass::Generic => format!(
                "Failed to {}. Please check your connection and try again.",
                action
            ),
        }
    }
}

/// Classifies a raw provider error message.
pub fn classify_error(message: &str) -> ErrorClass {
    let lowered = message.to_lowercase().replace('_', " ");
    if QUOTA_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        ErrorClass::Quota
    } else {
        ErrorClass::Generic
    }
}
