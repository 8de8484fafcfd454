//! Rep completion handler - counting, single-flight analysis and feedback
//!
//! A completed cycle becomes an `AnalysisJob` the caller runs asynchronously.
//! While one job is in flight further completions are dropped; the lock is
//! released when the result is settled, success or failure. Every job
//! carries the session generation it was issued under, so a result that
//! arrives after the session restarted is discarded.

use crate::error::Result;
use crate::exercise::{CycleMetrics, ExerciseKind};
use super::analysis::AnalysisRequest;
use super::capture::CapturedFrame;

/// Identifies one in-flight analysis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
    rep: u32,
    exercise: ExerciseKind,
}

impl AnalysisTicket {
    pub fn rep(&self) -> u32 {
        self.rep
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.exercise
    }
}

/// Everything the analyzer needs for one rep
#[derive(Clone, Debug)]
pub struct AnalysisJob {
    pub ticket: AnalysisTicket,
    pub frame: CapturedFrame,
    /// Seconds held (plank), 0 for rep exercises
    pub hold_secs: u32,
    pub metrics: Option<CycleMetrics>,
}

impl AnalysisJob {
    pub fn rep(&self) -> u32 {
        self.ticket.rep
    }

    pub fn exercise(&self) -> ExerciseKind {
        self.ticket.exercise
    }

    /// Body of the image analysis request
    pub fn request(&self) -> AnalysisRequest<'_> {
        AnalysisRequest {
            image: self.frame.as_data_uri(),
            rep_count: self.ticket.rep,
            exercise_type: self.ticket.exercise.slug(),
            hold_time: self.hold_secs,
        }
    }
}

/// Result of offering a completed cycle to the handler
#[derive(Debug)]
pub enum Admission {
    Accepted(AnalysisJob),
    /// Cycle finished without a qualifying capture; not counted
    NoCapture,
    /// Previous analysis still in flight; dropped, not counted
    Busy,
}

/// Feedback ready to surface
#[derive(Clone, Debug, PartialEq)]
pub struct Feedback {
    pub rep: u32,
    pub exercise: ExerciseKind,
    pub text: String,
}

pub struct RepCompletionHandler {
    reps: u32,
    in_flight: bool,
    generation: u64,
    fallback: String,
}

impl RepCompletionHandler {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            reps: 0,
            in_flight: false,
            generation: 0,
            fallback: fallback.into(),
        }
    }

    pub fn rep_count(&self) -> u32 {
        self.reps
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight
    }

    /// Offer a completed cycle
    pub fn begin(
        &mut self,
        frame: Option<CapturedFrame>,
        exercise: ExerciseKind,
        hold_secs: u32,
        metrics: Option<CycleMetrics>,
    ) -> Admission {
        if self.in_flight {
            log::warn!("rep completed while analysis in flight, dropping it");
            return Admission::Busy;
        }
        let Some(frame) = frame else {
            log::debug!("cycle completed without a capture, not counted");
            return Admission::NoCapture;
        };

        self.in_flight = true;
        self.reps += 1;
        log::info!("{} rep {} complete, analyzing", exercise, self.reps);

        Admission::Accepted(AnalysisJob {
            ticket: AnalysisTicket {
                generation: self.generation,
                rep: self.reps,
                exercise,
            },
            frame,
            hold_secs,
            metrics,
        })
    }

    /// Settle an analysis result. `None` when the ticket is stale.
    pub fn settle(&mut self, ticket: AnalysisTicket, result: Result<String>) -> Option<Feedback> {
        if ticket.generation != self.generation {
            log::debug!("discarding analysis for rep {} from a stopped session", ticket.rep);
            return None;
        }
        self.in_flight = false;

        let text = match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => self.fallback.clone(),
            Err(err) => {
                log::warn!("analysis for rep {} failed: {}", ticket.rep, err);
                self.fallback.clone()
            }
        };

        Some(Feedback {
            rep: ticket.rep,
            exercise: ticket.exercise,
            text,
        })
    }

    /// New session: counter to zero, lock released, outstanding tickets stale
    pub fn restart(&mut self) {
        self.generation += 1;
        self.reps = 0;
        self.in_flight = false;
    }
}
