//! Coach configuration
//!
//! Passed from JavaScript as a JSON object. Every field is optional and falls
//! back to the defaults below.

use serde::Deserialize;

use crate::error::{CoachError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct CoachConfig {
    /// EMA weight of the newest landmark sample (0, 1]
    #[serde(default = "default_smoothing_factor")]
    pub smoothing_factor: f32,
    /// Minimum landmark visibility for the body check
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f32,
    /// Image analysis endpoint. `None` uses the local rule analyzer.
    #[serde(default)]
    pub analysis_endpoint: Option<String>,
    /// Longest wait for an analysis result before falling back
    #[serde(default = "default_analysis_timeout_ms")]
    pub analysis_timeout_ms: u32,
    /// Feedback shown when analysis fails
    #[serde(default = "default_fallback_feedback")]
    pub fallback_feedback: String,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    /// Minimum gap between two spoken feedback lines
    #[serde(default = "default_speech_cooldown_ms")]
    pub speech_cooldown_ms: f64,
    #[serde(default = "default_speech_lang")]
    pub speech_lang: String,
    /// Hidden canvas holding the current video frame for capture
    #[serde(default = "default_capture_canvas_id")]
    pub capture_canvas_id: String,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: f64,
    /// Seconds of plank hold between analysis checkpoints
    #[serde(default = "default_plank_checkpoint_secs")]
    pub plank_checkpoint_secs: u32,
}

fn default_smoothing_factor() -> f32 { 0.7 }
fn default_visibility_threshold() -> f32 { 0.7 }
fn default_analysis_timeout_ms() -> u32 { 15_000 }
fn default_fallback_feedback() -> String { "Analysis failed. Keep going!".to_string() }
fn default_speech_enabled() -> bool { true }
fn default_speech_cooldown_ms() -> f64 { 4000.0 }
fn default_speech_lang() -> String { "en-US".to_string() }
fn default_capture_canvas_id() -> String { "capture-canvas".to_string() }
fn default_jpeg_quality() -> f64 { 0.8 }
fn default_plank_checkpoint_secs() -> u32 { 10 }

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: default_smoothing_factor(),
            visibility_threshold: default_visibility_threshold(),
            analysis_endpoint: None,
            analysis_timeout_ms: default_analysis_timeout_ms(),
            fallback_feedback: default_fallback_feedback(),
            speech_enabled: default_speech_enabled(),
            speech_cooldown_ms: default_speech_cooldown_ms(),
            speech_lang: default_speech_lang(),
            capture_canvas_id: default_capture_canvas_id(),
            jpeg_quality: default_jpeg_quality(),
            plank_checkpoint_secs: default_plank_checkpoint_secs(),
        }
    }
}

impl CoachConfig {
    /// Parse and validate a JSON config. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: CoachConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(CoachError::ConfigValue {
                field: "smoothing_factor",
                message: format!("must be in (0, 1], got {}", self.smoothing_factor),
            });
        }
        if !(0.0..=1.0).contains(&self.visibility_threshold) {
            return Err(CoachError::ConfigValue {
                field: "visibility_threshold",
                message: format!("must be in [0, 1], got {}", self.visibility_threshold),
            });
        }
        if !(0.0..=1.0).contains(&self.jpeg_quality) {
            return Err(CoachError::ConfigValue {
                field: "jpeg_quality",
                message: format!("must be in [0, 1], got {}", self.jpeg_quality),
            });
        }
        if self.speech_cooldown_ms < 0.0 {
            return Err(CoachError::ConfigValue {
                field: "speech_cooldown_ms",
                message: "must not be negative".to_string(),
            });
        }
        if self.analysis_timeout_ms == 0 {
            return Err(CoachError::ConfigValue {
                field: "analysis_timeout_ms",
                message: "must be at least 1".to_string(),
            });
        }
        if self.plank_checkpoint_secs == 0 {
            return Err(CoachError::ConfigValue {
                field: "plank_checkpoint_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(endpoint) = &self.analysis_endpoint {
            if endpoint.trim().is_empty() {
                return Err(CoachError::ConfigValue {
                    field: "analysis_endpoint",
                    message: "must not be blank (omit it to use local rules)".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CoachConfig::from_json("").unwrap();
        assert_eq!(config.smoothing_factor, 0.7);
        assert_eq!(config.visibility_threshold, 0.7);
        assert_eq!(config.speech_cooldown_ms, 4000.0);
        assert!(config.analysis_endpoint.is_none());
        assert_eq!(config.analysis_timeout_ms, 15_000);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = CoachConfig::from_json(r#"{"analysis_timeout_ms": 0}"#).unwrap_err();
        assert!(matches!(err, CoachError::ConfigValue { field: "analysis_timeout_ms", .. }));
    }

    #[test]
    fn test_partial_json() {
        let config = CoachConfig::from_json(
            r#"{"analysis_endpoint": "http://localhost:8003/analyze-image", "speech_enabled": false}"#,
        )
        .unwrap();
        assert_eq!(
            config.analysis_endpoint.as_deref(),
            Some("http://localhost:8003/analyze-image")
        );
        assert!(!config.speech_enabled);
        assert_eq!(config.plank_checkpoint_secs, 10);
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let err = CoachConfig::from_json(r#"{"smoothing_factor": 0.0}"#).unwrap_err();
        assert!(matches!(err, CoachError::ConfigValue { field: "smoothing_factor", .. }));
    }

    #[test]
    fn test_rejects_blank_endpoint() {
        let err = CoachConfig::from_json(r#"{"analysis_endpoint": "  "}"#).unwrap_err();
        assert!(matches!(err, CoachError::ConfigValue { field: "analysis_endpoint", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = CoachConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CoachError::ConfigParse(_)));
    }
}
