//! Speech synthesis via the Web Speech API

use web_sys::{SpeechSynthesis, SpeechSynthesisUtterance};

use crate::error::{CoachError, Result};

fn synthesizer() -> Result<SpeechSynthesis> {
    let window = web_sys::window().ok_or_else(|| CoachError::Browser("no window".into()))?;
    window
        .speech_synthesis()
        .map_err(|_| CoachError::Browser("speech synthesis unavailable".into()))
}

/// Whether an utterance is currently playing. False when speech is unavailable.
pub fn is_speaking() -> bool {
    synthesizer().map(|synth| synth.speaking()).unwrap_or(false)
}

pub fn speak(text: &str, lang: &str) -> Result<()> {
    let synth = synthesizer()?;
    let utterance = SpeechSynthesisUtterance::new_with_text(text)
        .map_err(|_| CoachError::Browser("could not create utterance".into()))?;
    utterance.set_lang(lang);
    synth.speak(&utterance);
    Ok(())
}
