//! Coach module - rep completion, analysis, speech and the session driving them
//!
//! Re-exports only. All logic in submodules.

mod capture;
mod status;
mod speech;
mod completion;
mod analysis;
mod session;

pub use capture::{CapturedFrame, FrameSource, NoCapture};
pub use status::CoachStatus;
pub use speech::{SpeechGate, DEFAULT_SPEECH_COOLDOWN_MS};
pub use completion::{
    RepCompletionHandler, Admission, AnalysisJob, AnalysisTicket, Feedback,
};
pub use analysis::{
    Analyzer, HttpAnalyzer, RuleAnalyzer, AnalysisRequest, AnalysisResponse,
    analyzer_for, analyze_within,
};
pub use session::{CoachSession, FrameOutcome, FeedbackDelivery, SessionSummary};
