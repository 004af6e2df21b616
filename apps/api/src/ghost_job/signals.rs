//! Signal vocabulary shared by the ghost-job detectors and aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of evidence a detector found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    VagueDescription,
    LowKeywordImportance,
    VagueProblems,
    NoSalary,
    SeniorityMismatch,
    TechOverload,
    NoProblemsDefined,
    NoWebsite,
    NoRecentNews,
    NoProducts,
    FrequentReposting,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::VagueDescription => "vague_description",
            SignalType::LowKeywordImportance => "low_keyword_importance",
            SignalType::VagueProblems => "vague_problems",
            SignalType::NoSalary => "no_salary",
            SignalType::SeniorityMismatch => "seniority_mismatch",
            SignalType::TechOverload => "tech_overload",
            SignalType::NoProblemsDefined => "no_problems_defined",
            SignalType::NoWebsite => "no_website",
            SignalType::NoRecentNews => "no_recent_news",
            SignalType::NoProducts => "no_products",
            SignalType::FrequentReposting => "frequent_reposting",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One unit of heuristic evidence. `points` and `severity` are chosen
/// independently by each detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub severity: Severity,
    pub points: u32,
    pub description: String,
}

impl Signal {
    pub fn new(
        signal_type: SignalType,
        severity: Severity,
        points: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            signal_type,
            severity,
            points,
            description: description.into(),
        }
    }

    /// Builds a signal from one of the `weights` constants.
    pub fn weighted(
        signal_type: SignalType,
        (severity, points): (Severity, u32),
        description: impl Into<String>,
    ) -> Self {
        Self::new(signal_type, severity, points, description)
    }

    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

/// Four-level job risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::VeryHigh => "VERY_HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Apply,
    ApplyWithCaution,
    Skip,
}

/// Final, explainable outcome of one ghost-job evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub raw_score: u32,
    /// 0 – 100
    pub normalized_score: u32,
    pub risk_level: RiskLevel,
    /// In detector order.
    pub signals: Vec<Signal>,
    /// 0.0 – 1.0
    pub confidence_level: f64,
    pub recommendation: Recommendation,
    pub reasoning: String,
}

#[cfg(test)]
impl ScoreResult {
    pub fn has_signal(&self, signal_type: SignalType) -> bool {
        self.signals.iter().any(|s| s.signal_type == signal_type)
    }
}

/// Points and severities per signal. Product-tuned; changing any of these
/// changes user-facing verdicts.
pub mod weights {
    use super::Severity;

    pub const VAGUE_DESCRIPTION: (Severity, u32) = (Severity::High, 20);
    pub const LOW_KEYWORD_IMPORTANCE: (Severity, u32) = (Severity::Medium, 15);
    pub const VAGUE_PROBLEMS: (Severity, u32) = (Severity::Medium, 10);
    pub const NO_SALARY: (Severity, u32) = (Severity::Medium, 15);
    pub const SENIORITY_MISMATCH: (Severity, u32) = (Severity::High, 25);
    pub const TECH_OVERLOAD_EXTREME: (Severity, u32) = (Severity::High, 20);
    pub const TECH_OVERLOAD_FOR_LEVEL: (Severity, u32) = (Severity::Medium, 15);
    pub const NO_PROBLEMS_DEFINED: (Severity, u32) = (Severity::Medium, 10);
    pub const NO_WEBSITE: (Severity, u32) = (Severity::Medium, 10);
    pub const NO_RECENT_NEWS: (Severity, u32) = (Severity::Low, 5);
    pub const NO_PRODUCTS: (Severity, u32) = (Severity::Low, 5);
    pub const FREQUENT_REPOSTING: (Severity, u32) = (Severity::High, 30);
}
