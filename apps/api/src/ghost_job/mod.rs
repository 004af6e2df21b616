//! Ghost-job detection: scores how likely a posting is to be fake or stale.
//!
//! Flow: AnalysisInput → detectors (concurrently) → aggregate → reasoning.
//! Same input always yields the same `ScoreResult`.

pub mod aggregator;
pub mod detectors;
pub mod handlers;
pub mod reasoning;
pub mod reposting;
pub mod signals;

use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;
use tracing::{debug, info};

use crate::ghost_job::aggregator::aggregate;
use crate::ghost_job::detectors::{default_detectors, SignalDetector};
use crate::ghost_job::reposting::RepostingHistory;
use crate::ghost_job::signals::ScoreResult;
use crate::models::job::AnalysisInput;

/// Runs a registry of detectors over one posting and aggregates the evidence.
#[derive(Clone)]
pub struct GhostJobDetector {
    detectors: Vec<Arc<dyn SignalDetector>>,
}

impl GhostJobDetector {
    /// Standard detector set backed by the given reposting history.
    pub fn new(history: Arc<dyn RepostingHistory>, lookback: Duration) -> Self {
        Self::with_detectors(default_detectors(history, lookback))
    }

    pub fn with_detectors(detectors: Vec<Arc<dyn SignalDetector>>) -> Self {
        Self { detectors }
    }

    /// Appends a detector; its signals are reported after the existing ones.
    #[allow(dead_code)]
    pub fn register(&mut self, detector: Arc<dyn SignalDetector>) {
        self.detectors.push(detector);
    }

    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    pub async fn detect_ghost_job(&self, input: &AnalysisInput) -> ScoreResult {
        let outputs = join_all(self.detectors.iter().map(|d| d.detect(input))).await;

        let mut signals = Vec::new();
        for (detector, found) in self.detectors.iter().zip(outputs) {
            if !found.is_empty() {
                debug!(detector = detector.name(), count = found.len(), "signals detected");
            }
            signals.extend(found);
        }

        let result = aggregate(signals);
        info!(
            score = result.normalized_score,
            risk = ?result.risk_level,
            recommendation = ?result.recommendation,
            signals = result.signals.len(),
            "Ghost-job evaluation complete"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost_job::reposting::InMemoryRepostingHistory;
    use crate::ghost_job::signals::{Recommendation, RiskLevel, Severity, Signal, SignalType};
    use crate::models::job::{JobAnalysis, JobKeywords};
    use async_trait::async_trait;
    use chrono::Utc;

    fn detector_with(history: InMemoryRepostingHistory) -> GhostJobDetector {
        GhostJobDetector::new(Arc::new(history), Duration::days(30))
    }

    fn suspicious_input() -> AnalysisInput {
        AnalysisInput {
            job: JobAnalysis {
                title: Some("Junior Developer".to_string()),
                keywords: JobKeywords {
                    technical: vec!["JavaScript".to_string()],
                    ..JobKeywords::default()
                },
                seniority_level: Some("junior".to_string()),
                required_years_experience: Some(10),
                salary_range: None,
                problems_to_solve: vec![
                    "Build and operate the partner onboarding portal end to end".to_string(),
                ],
                ..JobAnalysis::default()
            },
            company: None,
            source_url: None,
        }
    }

    #[tokio::test]
    async fn test_ghost_job_scenario() {
        let detector = detector_with(InMemoryRepostingHistory::new());
        let result = detector.detect_ghost_job(&suspicious_input()).await;

        assert!(result.has_signal(SignalType::VagueDescription));
        assert!(result.has_signal(SignalType::NoSalary));
        assert!(result.has_signal(SignalType::SeniorityMismatch));
        assert!(result.normalized_score >= 55, "score {}", result.normalized_score);
        assert!(matches!(
            result.risk_level,
            RiskLevel::High | RiskLevel::VeryHigh
        ));
        assert!(matches!(
            result.recommendation,
            Recommendation::Skip | Recommendation::ApplyWithCaution
        ));
    }

    #[tokio::test]
    async fn test_detection_is_deterministic() {
        let detector = detector_with(InMemoryRepostingHistory::new());
        let input = suspicious_input();
        let first = detector.detect_ghost_job(&input).await;
        let second = detector.detect_ghost_job(&input).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_reposting_adds_thirty_points() {
        let url = "https://jobs.example.com/ghost";
        let history = InMemoryRepostingHistory::new();
        for day in 0..3 {
            history
                .record_observation(url, Utc::now() - Duration::days(day))
                .await
                .unwrap();
        }
        let detector = detector_with(history);

        let mut input = suspicious_input();
        let without = detector.detect_ghost_job(&input).await;
        input.source_url = Some(url.to_string());
        let with = detector.detect_ghost_job(&input).await;

        assert!(with.has_signal(SignalType::FrequentReposting));
        assert!(!without.has_signal(SignalType::FrequentReposting));
        assert_eq!(with.raw_score, without.raw_score + 30);
        assert_eq!(with.signals.last().unwrap().signal_type, SignalType::FrequentReposting);
    }

    struct FixedDetector;

    #[async_trait]
    impl SignalDetector for FixedDetector {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn detect(&self, _input: &AnalysisInput) -> Vec<Signal> {
            vec![Signal::new(
                SignalType::NoProducts,
                Severity::Low,
                7,
                "custom signal",
            )]
        }
    }

    #[tokio::test]
    async fn test_registered_detector_contributes_without_aggregator_changes() {
        let mut detector = GhostJobDetector::with_detectors(vec![]);
        assert_eq!(detector.detect_ghost_job(&suspicious_input()).await.raw_score, 0);

        detector.register(Arc::new(FixedDetector));
        assert_eq!(detector.detector_names(), vec!["fixed"]);
        let result = detector.detect_ghost_job(&suspicious_input()).await;
        assert_eq!(result.raw_score, 7);
        assert_eq!(result.signals[0].description, "custom signal");
    }
}
