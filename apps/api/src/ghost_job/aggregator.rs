//! Score aggregation: folds detector signals into a bounded score, risk
//! level, recommendation and confidence.

use std::collections::HashSet;

use crate::ghost_job::reasoning::explain;
use crate::ghost_job::signals::{Recommendation, RiskLevel, ScoreResult, Signal};

/// Thresholds and confidence weights. Empirically tuned; keep in sync with
/// the pinned values in the tests below.
pub mod thresholds {
    pub const MAX_SCORE: u32 = 100;

    pub const RISK_MEDIUM_FROM: u32 = 20;
    pub const RISK_HIGH_FROM: u32 = 40;
    pub const RISK_VERY_HIGH_FROM: u32 = 60;

    pub const CAUTION_FROM: u32 = 30;
    pub const SKIP_FROM: u32 = 60;

    pub const BASE_CONFIDENCE: f64 = 0.5;
    pub const PER_SIGNAL_TYPE: f64 = 0.1;
    pub const SIGNAL_TYPE_CAP: f64 = 0.3;
    pub const PER_HIGH_SEVERITY: f64 = 0.05;
    pub const HIGH_SEVERITY_CAP: f64 = 0.2;
}

pub fn risk_level_for(score: u32) -> RiskLevel {
    if score < thresholds::RISK_MEDIUM_FROM {
        RiskLevel::Low
    } else if score < thresholds::RISK_HIGH_FROM {
        RiskLevel::Medium
    } else if score < thresholds::RISK_VERY_HIGH_FROM {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

pub fn recommendation_for(score: u32) -> Recommendation {
    if score < thresholds::CAUTION_FROM {
        Recommendation::Apply
    } else if score < thresholds::SKIP_FROM {
        Recommendation::ApplyWithCaution
    } else {
        Recommendation::Skip
    }
}

/// Grows with evidence diversity and strong signals, saturating so that one
/// detector repeating itself cannot produce certainty on its own.
pub fn confidence_for(signals: &[Signal]) -> f64 {
    let distinct_types = signals
        .iter()
        .map(|s| s.signal_type)
        .collect::<HashSet<_>>()
        .len();
    let high = signals.iter().filter(|s| s.is_high()).count();

    let confidence = thresholds::BASE_CONFIDENCE
        + (thresholds::PER_SIGNAL_TYPE * distinct_types as f64).min(thresholds::SIGNAL_TYPE_CAP)
        + (thresholds::PER_HIGH_SEVERITY * high as f64).min(thresholds::HIGH_SEVERITY_CAP);
    confidence.clamp(0.0, 1.0)
}

/// Builds the final `ScoreResult`. Signals keep their detection order.
pub fn aggregate(signals: Vec<Signal>) -> ScoreResult {
    let raw_score: u32 = signals.iter().map(|s| s.points).sum();
    let normalized_score = raw_score.min(thresholds::MAX_SCORE);
    let risk_level = risk_level_for(normalized_score);
    let reasoning = explain(normalized_score, &signals, risk_level);

    ScoreResult {
        raw_score,
        normalized_score,
        risk_level,
        confidence_level: confidence_for(&signals),
        recommendation: recommendation_for(normalized_score),
        reasoning,
        signals,
    }
}
