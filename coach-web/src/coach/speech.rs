//! Speech gate - decides whether a feedback line gets spoken
//!
//! The synthesizer itself lives on the JS side. This only rate-limits it:
//! one utterance per cooldown window, never over an utterance in progress,
//! and never the same line twice in a row.

/// Default minimum gap between utterances
pub const DEFAULT_SPEECH_COOLDOWN_MS: f64 = 4000.0;

pub struct SpeechGate {
    enabled: bool,
    cooldown_ms: f64,
    last_text: Option<String>,
    last_spoken_ms: Option<f64>,
}

impl SpeechGate {
    pub fn new(enabled: bool, cooldown_ms: f64) -> Self {
        Self {
            enabled,
            cooldown_ms,
            last_text: None,
            last_spoken_ms: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns true (and records the utterance) if `text` may be spoken now.
    ///
    /// `speaking` is whether the synthesizer is still busy.
    pub fn admit(&mut self, text: &str, now_ms: f64, speaking: bool) -> bool {
        let say = text.trim();
        if !self.enabled || say.is_empty() || speaking {
            return false;
        }
        if self.last_text.as_deref() == Some(say) {
            return false;
        }
        if let Some(last) = self.last_spoken_ms {
            if now_ms - last < self.cooldown_ms {
                return false;
            }
        }
        self.last_text = Some(say.to_string());
        self.last_spoken_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_text = None;
        self.last_spoken_ms = None;
    }
}

impl Default for SpeechGate {
    fn default() -> Self {
        Self::new(true, DEFAULT_SPEECH_COOLDOWN_MS)
    }
}
