//! Coach session - per-frame pipeline and session lifecycle
//!
//! Frame flow:
//!   pose → smoother → visibility gate → joint angle → cycle / hold
//!        → capture → completion handler → `AnalysisJob` for the caller
//!
//! The session never awaits. The caller runs the job and hands the result
//! back through `finish_analysis`.

use serde::Serialize;

use crate::config::CoachConfig;
use crate::error::Result;
use crate::exercise::{
    CycleMetrics, CycleOutcome, CyclePhase, CycleSample, CycleTrace, ExerciseKind, HoldTimer,
    Motion, RepCycle,
};
use crate::pose::{
    mean_side_angle, Landmark, LandmarkSmoother, VisibilityGate, LEFT_HIP, LEFT_KNEE,
    LEFT_SHOULDER, MIN_POSE_LANDMARKS, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};
use super::capture::{CapturedFrame, FrameSource};
use super::completion::{Admission, AnalysisJob, AnalysisTicket, RepCompletionHandler};
use super::speech::SpeechGate;
use super::status::CoachStatus;

/// Shoulder-hip-knee triples for the torso angle
const TORSO_LEFT: [usize; 3] = [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE];
const TORSO_RIGHT: [usize; 3] = [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE];

/// Motion tracker for the selected exercise
enum Tracker {
    Cycle(RepCycle),
    Hold(HoldTimer),
}

impl Tracker {
    fn for_exercise(kind: ExerciseKind, plank_checkpoint_secs: u32) -> Self {
        match kind.profile().motion {
            Motion::Cycle(thresholds) => Tracker::Cycle(RepCycle::new(thresholds)),
            Motion::Hold(thresholds) => {
                Tracker::Hold(HoldTimer::new(thresholds, plank_checkpoint_secs))
            }
        }
    }

    fn phase(&self) -> CyclePhase {
        match self {
            Tracker::Cycle(cycle) => cycle.phase(),
            Tracker::Hold(hold) if hold.is_holding() => CyclePhase::Working,
            Tracker::Hold(_) => CyclePhase::Rest,
        }
    }
}

/// What one frame produced
#[derive(Debug)]
pub struct FrameOutcome {
    pub status: CoachStatus,
    pub angle: Option<f32>,
    pub phase: CyclePhase,
    /// Analysis to run, when this frame completed a rep or plank checkpoint
    pub job: Option<AnalysisJob>,
}

/// Settled feedback for the UI
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackDelivery {
    pub rep: u32,
    pub text: String,
    /// Passed the speech gate; the caller should speak it
    pub speak: bool,
}

/// End-of-session record for the caller to persist
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub exercise: ExerciseKind,
    pub reps: u32,
    pub duration_secs: f64,
    pub hold_secs: u32,
    pub feedbacks: Vec<String>,
}

pub struct CoachSession {
    config: CoachConfig,
    smoother: LandmarkSmoother,
    gate: VisibilityGate,
    exercise: ExerciseKind,
    tracker: Tracker,
    trace: CycleTrace,
    /// Frame captured at the bottom / lockout of the cycle in progress
    pending_capture: Option<CapturedFrame>,
    completion: RepCompletionHandler,
    speech: SpeechGate,
    status: CoachStatus,
    feedback: Option<String>,
    feedback_history: Vec<String>,
    active: bool,
    started_ms: f64,
    last_angle: Option<f32>,
    /// Longest plank hold of the session
    best_hold_secs: u32,
}

impl CoachSession {
    pub fn new(config: CoachConfig) -> Self {
        let exercise = ExerciseKind::Squat;
        Self {
            smoother: LandmarkSmoother::new(config.smoothing_factor),
            gate: VisibilityGate::new(config.visibility_threshold),
            exercise,
            tracker: Tracker::for_exercise(exercise, config.plank_checkpoint_secs),
            trace: CycleTrace::new(),
            pending_capture: None,
            completion: RepCompletionHandler::new(config.fallback_feedback.clone()),
            speech: SpeechGate::new(config.speech_enabled, config.speech_cooldown_ms),
            status: CoachStatus::Idle,
            feedback: None,
            feedback_history: Vec::new(),
            active: false,
            started_ms: 0.0,
            last_angle: None,
            best_hold_secs: 0,
            config,
        }
    }

    /// Parse a JSON config and build a session from it
    pub fn from_json(config_json: &str) -> Result<Self> {
        Ok(Self::new(CoachConfig::from_json(config_json)?))
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    pub fn start(&mut self, now_ms: f64) {
        self.completion.restart();
        self.reset_motion();
        self.smoother.reset();
        self.speech.reset();
        self.feedback = None;
        self.feedback_history.clear();
        self.best_hold_secs = 0;
        self.last_angle = None;
        self.started_ms = now_ms;
        self.active = true;
        self.status = CoachStatus::Ready;
        log::info!("session started ({})", self.exercise);
    }

    /// Stop and summarize. Outstanding analysis results become stale.
    pub fn stop(&mut self, now_ms: f64) -> SessionSummary {
        let summary = SessionSummary {
            exercise: self.exercise,
            reps: self.completion.rep_count(),
            duration_secs: if self.active {
                ((now_ms - self.started_ms) / 1000.0).max(0.0)
            } else {
                0.0
            },
            hold_secs: self.best_hold_secs.max(self.current_hold_secs()),
            feedbacks: self.feedback_history.clone(),
        };

        self.completion.restart();
        self.reset_motion();
        self.smoother.reset();
        self.active = false;
        self.status = CoachStatus::Idle;
        log::info!(
            "session stopped: {} {} reps in {:.1}s",
            summary.exercise,
            summary.reps,
            summary.duration_secs
        );
        summary
    }

    /// Switch exercise. Resets the in-progress cycle but not the rep count.
    pub fn set_exercise(&mut self, kind: ExerciseKind) {
        if kind == self.exercise {
            return;
        }
        log::info!("exercise changed: {} -> {}", self.exercise, kind);
        self.best_hold_secs = self.best_hold_secs.max(self.current_hold_secs());
        self.exercise = kind;
        self.tracker = Tracker::for_exercise(kind, self.config.plank_checkpoint_secs);
        self.trace.clear();
        self.pending_capture = None;
        self.last_angle = None;
        if self.active {
            self.show(CoachStatus::Ready);
        }
    }

    pub fn set_speech_enabled(&mut self, enabled: bool) {
        self.speech.set_enabled(enabled);
    }

    // ========================================================================
    // PER-FRAME PIPELINE
    // ========================================================================

    /// Process one detector result. `pose` is `None` when no person was found.
    pub fn process_frame(
        &mut self,
        now_ms: f64,
        pose: Option<&[Landmark]>,
        frames: &mut dyn FrameSource,
    ) -> FrameOutcome {
        if !self.active {
            return self.outcome(None);
        }

        let Some(raw) = pose.filter(|lm| lm.len() >= MIN_POSE_LANDMARKS) else {
            self.status = CoachStatus::Reposition;
            return self.outcome(None);
        };

        let profile = self.exercise.profile();
        let smoothed = self.smoother.smooth(raw);
        if !self.gate.is_body_visible(smoothed, profile.required) {
            self.status = CoachStatus::Reposition;
            return self.outcome(None);
        }
        let Some(angle) = profile.measure.measure(smoothed) else {
            self.status = CoachStatus::Reposition;
            return self.outcome(None);
        };
        let torso = mean_side_angle(smoothed, TORSO_LEFT, TORSO_RIGHT);
        self.last_angle = Some(angle);

        if self.status == CoachStatus::Reposition || self.status == CoachStatus::Idle {
            self.show(CoachStatus::for_phase(self.exercise, self.tracker.phase()));
        }

        let sample = CycleSample { t_ms: now_ms, angle, torso };
        let job = if matches!(self.tracker, Tracker::Cycle(_)) {
            self.advance_cycle(sample, frames)
        } else {
            self.advance_hold(sample, frames)
        };
        self.outcome(job)
    }

    fn advance_cycle(&mut self, sample: CycleSample, frames: &mut dyn FrameSource) -> Option<AnalysisJob> {
        let Tracker::Cycle(cycle) = &mut self.tracker else {
            return None;
        };
        let step = cycle.step(sample.angle);
        let phase = cycle.phase();

        if let Some((CyclePhase::Rest, CyclePhase::Working)) = step.transition {
            self.trace.clear();
            self.pending_capture = None;
        }
        if phase != CyclePhase::Rest || step.outcome.is_some() {
            self.trace.push(sample);
        }

        if step.capture {
            self.pending_capture = frames.capture();
            if self.pending_capture.is_none() {
                log::warn!("capture requested but no frame was available");
            }
        }

        if let Some((from, to)) = step.transition {
            log::debug!("{}: {:?} -> {:?} at {:.1}°", self.exercise, from, to, sample.angle);
            self.show(CoachStatus::for_phase(self.exercise, to));
        } else if step.capture {
            self.show(CoachStatus::Captured);
        }

        match step.outcome {
            Some(CycleOutcome::Aborted) => {
                log::debug!("{}: returned without reaching depth", self.exercise);
                self.trace.clear();
                self.pending_capture = None;
                self.show(CoachStatus::GoDeeper);
                None
            }
            Some(CycleOutcome::Completed) => {
                let metrics = self.trace.metrics();
                self.trace.clear();
                let frame = self.pending_capture.take();
                self.submit(frame, 0, metrics)
            }
            None => None,
        }
    }

    fn advance_hold(&mut self, sample: CycleSample, frames: &mut dyn FrameSource) -> Option<AnalysisJob> {
        let Tracker::Hold(hold) = &mut self.tracker else {
            return None;
        };
        let step = hold.update(sample.t_ms, sample.angle);
        let holding = hold.is_holding();
        let held_secs = hold.held_secs();

        if step.started {
            log::debug!("{}: hold started at {:.1}°", self.exercise, sample.angle);
            self.trace.clear();
        }
        if let Some(lasted) = step.broken {
            log::debug!("{}: hold broken after {}s", self.exercise, lasted);
            self.best_hold_secs = self.best_hold_secs.max(lasted);
            self.trace.clear();
        }
        if holding {
            self.trace.push(sample);
        }

        self.show(if holding {
            CoachStatus::Holding { secs: held_secs }
        } else {
            CoachStatus::HoldLine
        });

        let secs = step.checkpoint?;
        self.best_hold_secs = self.best_hold_secs.max(secs);
        let metrics = self.trace.metrics();
        self.trace.clear();
        if self.completion.is_processing() {
            log::warn!("plank checkpoint at {}s while analysis in flight, dropping it", secs);
            return None;
        }
        let frame = frames.capture();
        self.submit(frame, secs, metrics)
    }

    fn submit(
        &mut self,
        frame: Option<CapturedFrame>,
        hold_secs: u32,
        metrics: Option<CycleMetrics>,
    ) -> Option<AnalysisJob> {
        match self.completion.begin(frame, self.exercise, hold_secs, metrics) {
            Admission::Accepted(job) => {
                self.status = CoachStatus::Analyzing { rep: job.rep() };
                Some(job)
            }
            Admission::NoCapture | Admission::Busy => None,
        }
    }

    // ========================================================================
    // ANALYSIS RESULTS
    // ========================================================================

    /// Hand back the result of a job returned by `process_frame`.
    ///
    /// `speaking` is whether the synthesizer is busy. `None` when the result
    /// belongs to a stopped session.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        result: Result<String>,
        now_ms: f64,
        speaking: bool,
    ) -> Option<FeedbackDelivery> {
        let feedback = self.completion.settle(ticket, result)?;

        if self.status == (CoachStatus::Analyzing { rep: feedback.rep }) {
            self.status = CoachStatus::RepComplete { rep: feedback.rep };
        }
        self.feedback = Some(feedback.text.clone());
        self.feedback_history.push(feedback.text.clone());

        let speak = if feedback.exercise != self.exercise {
            log::debug!("exercise changed since rep {}, not speaking", feedback.rep);
            false
        } else {
            self.speech.admit(&feedback.text, now_ms, speaking)
        };

        Some(FeedbackDelivery {
            rep: feedback.rep,
            text: feedback.text,
            speak,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &CoachConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }

    pub fn status(&self) -> CoachStatus {
        self.status
    }

    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    pub fn rep_count(&self) -> u32 {
        self.completion.rep_count()
    }

    pub fn is_analyzing(&self) -> bool {
        self.completion.is_processing()
    }

    pub fn phase(&self) -> CyclePhase {
        self.tracker.phase()
    }

    /// Exercise-specific name of the current phase
    pub fn phase_label(&self) -> &'static str {
        self.exercise.profile().labels.label(self.phase())
    }

    pub fn last_angle(&self) -> Option<f32> {
        self.last_angle
    }

    /// Motion-driven status. An analysis still in flight keeps showing.
    fn show(&mut self, status: CoachStatus) {
        self.status = if self.completion.is_processing() {
            CoachStatus::Analyzing { rep: self.completion.rep_count() }
        } else {
            status
        };
    }

    fn current_hold_secs(&self) -> u32 {
        match &self.tracker {
            Tracker::Hold(hold) => hold.held_secs(),
            Tracker::Cycle(_) => 0,
        }
    }

    fn reset_motion(&mut self) {
        match &mut self.tracker {
            Tracker::Cycle(cycle) => cycle.reset(),
            Tracker::Hold(hold) => hold.reset(),
        }
        self.trace.clear();
        self.pending_capture = None;
    }

    fn outcome(&self, job: Option<AnalysisJob>) -> FrameOutcome {
        FrameOutcome {
            status: self.status,
            angle: self.last_angle,
            phase: self.tracker.phase(),
            job,
        }
    }
}
