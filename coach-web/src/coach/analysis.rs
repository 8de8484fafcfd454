//! Analyzers - turn a completed rep into a feedback line
//!
//! `HttpAnalyzer` posts the captured frame to the image analysis service.
//! `RuleAnalyzer` works offline from the cycle metrics. Futures are
//! `LocalBoxFuture` because browser futures are not `Send`.
//! `analyze_within` races any analyzer against a deadline so a request that
//! never answers still settles.

use std::future::Future;

use futures::future::{self, Either, FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};

use crate::config::CoachConfig;
use crate::error::{CoachError, Result};
use crate::exercise::rule_feedback;
use super::completion::AnalysisJob;

/// POST body of the image analysis endpoint
#[derive(Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    /// JPEG data URI
    pub image: &'a str,
    pub rep_count: u32,
    pub exercise_type: &'static str,
    pub hold_time: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub feedback: Option<String>,
}

impl AnalysisResponse {
    pub fn into_feedback(self) -> Result<String> {
        self.feedback
            .filter(|text| !text.trim().is_empty())
            .ok_or(CoachError::MissingFeedback)
    }
}

pub trait Analyzer {
    /// One best-effort attempt, no retries
    fn analyze<'a>(&'a self, job: &'a AnalysisJob) -> LocalBoxFuture<'a, Result<String>>;
}

/// Remote image analysis
pub struct HttpAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Analyzer for HttpAnalyzer {
    fn analyze<'a>(&'a self, job: &'a AnalysisJob) -> LocalBoxFuture<'a, Result<String>> {
        async move {
            let response = self
                .client
                .post(&self.endpoint)
                .json(&job.request())
                .send()
                .await?
                .error_for_status()?;
            let body: AnalysisResponse = response.json().await?;
            body.into_feedback()
        }
        .boxed_local()
    }
}

/// Offline feedback from the rep's angle trace
pub struct RuleAnalyzer;

impl Analyzer for RuleAnalyzer {
    fn analyze<'a>(&'a self, job: &'a AnalysisJob) -> LocalBoxFuture<'a, Result<String>> {
        let text = rule_feedback(job.exercise(), job.metrics.as_ref()).to_string();
        async move { Ok(text) }.boxed_local()
    }
}

/// Run `analyzer` until it answers or `deadline` fires, whichever is first.
/// An expired deadline is an `AnalysisTimeout` error.
pub async fn analyze_within<D>(
    analyzer: &dyn Analyzer,
    job: &AnalysisJob,
    deadline: D,
    timeout_ms: u32,
) -> Result<String>
where
    D: Future<Output = ()>,
{
    let analysis = analyzer.analyze(job);
    futures::pin_mut!(deadline);
    match future::select(analysis, deadline).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            log::warn!("analysis for rep {} timed out after {} ms", job.rep(), timeout_ms);
            Err(CoachError::AnalysisTimeout(timeout_ms))
        }
    }
}

/// Remote analyzer when an endpoint is configured, local rules otherwise
pub fn analyzer_for(config: &CoachConfig) -> Box<dyn Analyzer> {
    match &config.analysis_endpoint {
        Some(endpoint) => Box::new(HttpAnalyzer::new(endpoint.clone())),
        None => Box::new(RuleAnalyzer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::capture::CapturedFrame;
    use crate::coach::completion::{Admission, RepCompletionHandler};
    use crate::exercise::{CycleMetrics, ExerciseKind};
    use futures::executor::block_on;

    /// Server that accepts the request and never answers
    struct Unanswered;

    impl Analyzer for Unanswered {
        fn analyze<'a>(&'a self, _job: &'a AnalysisJob) -> LocalBoxFuture<'a, Result<String>> {
            future::pending().boxed_local()
        }
    }

    fn job(exercise: ExerciseKind, metrics: Option<CycleMetrics>) -> AnalysisJob {
        let mut handler = RepCompletionHandler::new("fallback");
        let frame = CapturedFrame::from_data_uri("data:image/jpeg;base64,AA");
        match handler.begin(frame, exercise, 0, metrics) {
            Admission::Accepted(job) => job,
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_response_parsing() {
        let ok: AnalysisResponse = serde_json::from_str(r#"{"feedback": "Good squat!"}"#).unwrap();
        assert_eq!(ok.into_feedback().unwrap(), "Good squat!");

        let missing: AnalysisResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(matches!(missing.into_feedback(), Err(CoachError::MissingFeedback)));

        let blank: AnalysisResponse = serde_json::from_str(r#"{"feedback": ""}"#).unwrap();
        assert!(blank.into_feedback().is_err());
    }

    #[test]
    fn test_rule_analyzer() {
        let metrics = CycleMetrics {
            frame_count: 12,
            duration_secs: 1.2,
            angle_min: 125.0,
            angle_max: 165.0,
            torso_avg: Some(85.0),
            torso_range: Some(10.0),
            descent_frames: 6,
            ascent_frames: 7,
        };
        let job = job(ExerciseKind::Squat, Some(metrics));
        let text = block_on(RuleAnalyzer.analyze(&job)).unwrap();
        assert_eq!(text, "Sit deeper");
    }

    #[test]
    fn test_analyzer_selection() {
        let config = CoachConfig::default();
        let job = job(ExerciseKind::Squat, None);
        let text = block_on(analyzer_for(&config).analyze(&job)).unwrap();
        assert_eq!(text, "Not enough data");
    }

    #[test]
    fn test_deadline_settles_unanswered_analysis() {
        let job = job(ExerciseKind::Squat, None);
        let result = block_on(analyze_within(&Unanswered, &job, future::ready(()), 15_000));
        assert!(matches!(result, Err(CoachError::AnalysisTimeout(15_000))));
    }

    #[test]
    fn test_answer_before_deadline() {
        let job = job(ExerciseKind::Squat, None);
        let result = block_on(analyze_within(&RuleAnalyzer, &job, future::pending(), 15_000));
        assert_eq!(result.unwrap(), "Not enough data");
    }
}
