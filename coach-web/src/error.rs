//! Error types for the coaching core
//!
//! Nothing in the per-frame counting path is fatal. These errors cover the
//! fallible edges: configuration, exercise selection, landmark buffers coming
//! from JavaScript, and the analysis/browser calls.

use wasm_bindgen::JsValue;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, CoachError>;

#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// Configuration JSON could not be parsed
    #[error("invalid coach config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration parsed but a value is out of range
    #[error("invalid coach config: {field} {message}")]
    ConfigValue {
        field: &'static str,
        message: String,
    },

    #[error("unknown exercise '{0}' (expected squat, shoulder_press or plank)")]
    UnknownExercise(String),

    /// Flat landmark buffer had an unexpected length
    #[error("invalid landmark data length: {0} (expected 132, 99 or 0)")]
    LandmarkBuffer(usize),

    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis response had no feedback")]
    MissingFeedback,

    #[error("analysis timed out after {0} ms")]
    AnalysisTimeout(u32),

    /// Session summary could not be encoded for JavaScript
    #[error("could not encode session summary: {0}")]
    Summary(serde_json::Error),

    #[error("coach not initialized (call init_coach first)")]
    NotInitialized,

    /// A browser API (canvas, speech, window) was unavailable or failed
    #[error("browser error: {0}")]
    Browser(String),
}

impl From<CoachError> for JsValue {
    fn from(err: CoachError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_encoding_not_reported_as_config() {
        let cause = serde_json::from_str::<u32>("x").unwrap_err();
        let message = CoachError::Summary(cause).to_string();
        assert!(message.starts_with("could not encode session summary"));
        assert!(!message.contains("config"));
    }
}
