//! Signal detectors: independent heuristics, each inspecting one facet of a
//! posting and emitting zero or more `Signal`s.
//!
//! Detectors never fail and never see each other's output. Missing or
//! malformed optional fields simply mean "no signal". New heuristics are
//! added by implementing `SignalDetector` and registering the detector with
//! `GhostJobDetector`; the aggregator needs no changes.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::warn;

use crate::ghost_job::reposting::RepostingHistory;
use crate::ghost_job::signals::{weights, Signal, SignalType};
use crate::models::job::{AnalysisInput, CompanyEnrichment, JobAnalysis};

/// Fewer technical keywords than this reads as a vague posting.
pub const MIN_TECHNICAL_KEYWORDS: usize = 3;
/// Keyword-context entries below this importance count as filler.
pub const LOW_IMPORTANCE_THRESHOLD: f64 = 0.3;
/// Problem statements shorter than this (in characters) are checked for generic verbs.
pub const SHORT_PROBLEM_CHARS: usize = 50;
/// Distinct technologies + tools above which any posting is overloaded.
pub const TECH_OVERLOAD_ANY_LEVEL: usize = 15;
/// Distinct technologies + tools above which a junior or mid posting is overloaded.
pub const TECH_OVERLOAD_JUNIOR_MID: usize = 10;
/// Distinct observation dates at which a posting counts as frequently reposted.
pub const REPOST_DISTINCT_DATES: u32 = 3;

const GENERIC_VERB_STEMS: &[&str] = &[
    "improv",
    "optimi",
    "develop",
    "manag",
    "participat",
    "contribut",
    "help",
];

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SignalDetector: Send + Sync {
    /// Stable identifier, used in logs.
    fn name(&self) -> &'static str;

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal>;
}

/// The standard detector set, in the order signals are reported.
pub fn default_detectors(
    history: Arc<dyn RepostingHistory>,
    lookback: Duration,
) -> Vec<Arc<dyn SignalDetector>> {
    vec![
        Arc::new(VaguenessDetector),
        Arc::new(SalaryDetector),
        Arc::new(SeniorityDetector),
        Arc::new(TechOverloadDetector),
        Arc::new(ProblemsDefinedDetector),
        Arc::new(CompanyProfileDetector),
        Arc::new(RepostingDetector::new(history, lookback)),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Seniority bands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeniorityBand {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl SeniorityBand {
    /// Parses a free-text level. Unknown levels yield `None`.
    pub fn parse(level: &str) -> Option<Self> {
        let level = level.trim().trim_end_matches('.').to_lowercase();
        match level.as_str() {
            "junior" | "jr" | "entry" | "entry-level" | "entry level" => Some(Self::Junior),
            "mid" | "middle" | "mid-level" | "mid level" | "intermediate" => Some(Self::Mid),
            "senior" | "sr" => Some(Self::Senior),
            "lead" | "principal" | "staff" => Some(Self::Lead),
            _ => None,
        }
    }

    /// Inclusive expected range of required years; `None` upper bound is open.
    pub fn expected_years(&self) -> (u32, Option<u32>) {
        match self {
            Self::Junior => (0, Some(2)),
            Self::Mid => (2, Some(5)),
            Self::Senior => (5, Some(8)),
            Self::Lead => (8, None),
        }
    }

    pub fn accepts(&self, years: u32) -> bool {
        let (min, max) = self.expected_years();
        years >= min && max.map_or(true, |max| years <= max)
    }

    fn describe_range(&self) -> String {
        match self.expected_years() {
            (0, Some(max)) => format!("up to {max}"),
            (min, Some(max)) => format!("{min}–{max}"),
            (min, None) => format!("{min}+"),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure heuristics
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(items: &[String]) -> impl Iterator<Item = &String> {
    items.iter().filter(|s| !s.trim().is_empty())
}

/// Vagueness: too few technical keywords, mostly unimportant keywords, or
/// short generic problem statements.
pub fn detect_vagueness(job: &JobAnalysis) -> Vec<Signal> {
    let mut signals = Vec::new();

    let technical = non_blank(&job.keywords.technical).count();
    if technical < MIN_TECHNICAL_KEYWORDS {
        signals.push(Signal::weighted(
            SignalType::VagueDescription,
            weights::VAGUE_DESCRIPTION,
            format!("Vague description: only {technical} technical keyword(s) listed"),
        ));
    }

    // Entries without a usable importance are left out of both counts.
    let importances: Vec<f64> = job
        .keyword_context
        .iter()
        .filter_map(|k| k.importance)
        .filter(|i| i.is_finite())
        .collect();
    let total = importances.len();
    let low = importances
        .iter()
        .filter(|&&i| i < LOW_IMPORTANCE_THRESHOLD)
        .count();
    if total > 0 && low * 2 > total {
        signals.push(Signal::weighted(
            SignalType::LowKeywordImportance,
            weights::LOW_KEYWORD_IMPORTANCE,
            format!("{low} of {total} extracted keywords are barely relevant to the role"),
        ));
    }

    if let Some(problem) = job
        .problems_to_solve
        .iter()
        .find(|p| is_generic_problem(p))
    {
        signals.push(Signal::weighted(
            SignalType::VagueProblems,
            weights::VAGUE_PROBLEMS,
            format!("Problems to solve are generic: \"{}\"", problem.trim()),
        ));
    }

    signals
}

/// Short statement built around a generic verb ("help the team", "optimize processes").
fn is_generic_problem(statement: &str) -> bool {
    let statement = statement.trim();
    if statement.is_empty() || statement.chars().count() >= SHORT_PROBLEM_CHARS {
        return false;
    }
    statement
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .any(|word| GENERIC_VERB_STEMS.iter().any(|stem| word.starts_with(stem)))
}

pub fn detect_missing_salary(job: &JobAnalysis) -> Vec<Signal> {
    let stated = job.salary_range.as_ref().is_some_and(|r| r.is_stated());
    if stated {
        return vec![];
    }
    vec![Signal::weighted(
        SignalType::NoSalary,
        weights::NO_SALARY,
        "No salary range is stated",
    )]
}

pub fn detect_seniority_mismatch(job: &JobAnalysis) -> Vec<Signal> {
    let (Some(level), Some(years)) = (job.seniority_level.as_deref(), job.required_years_experience)
    else {
        return vec![];
    };
    let Some(band) = SeniorityBand::parse(level) else {
        return vec![];
    };
    if band.accepts(years) {
        return vec![];
    }
    vec![Signal::weighted(
        SignalType::SeniorityMismatch,
        weights::SENIORITY_MISMATCH,
        format!(
            "{years} years of experience required for a {} role (expected {} years)",
            level.trim().to_lowercase(),
            band.describe_range()
        ),
    )]
}

pub fn detect_tech_overload(job: &JobAnalysis) -> Vec<Signal> {
    let distinct: HashSet<String> = non_blank(&job.keywords.technical)
        .chain(non_blank(&job.keywords.tools))
        .map(|k| k.trim().to_lowercase())
        .collect();
    let count = distinct.len();

    if count > TECH_OVERLOAD_ANY_LEVEL {
        return vec![Signal::weighted(
            SignalType::TechOverload,
            weights::TECH_OVERLOAD_EXTREME,
            format!("Unrealistic requirements: {count} technologies and tools listed"),
        )];
    }

    let band = job.seniority_level.as_deref().and_then(SeniorityBand::parse);
    if count > TECH_OVERLOAD_JUNIOR_MID && matches!(band, Some(SeniorityBand::Junior | SeniorityBand::Mid))
    {
        return vec![Signal::weighted(
            SignalType::TechOverload,
            weights::TECH_OVERLOAD_FOR_LEVEL,
            format!("{count} technologies and tools listed for a junior/mid role"),
        )];
    }

    vec![]
}

pub fn detect_missing_problems(job: &JobAnalysis) -> Vec<Signal> {
    if non_blank(&job.problems_to_solve).next().is_some() {
        return vec![];
    }
    vec![Signal::weighted(
        SignalType::NoProblemsDefined,
        weights::NO_PROBLEMS_DEFINED,
        "Posting does not say what problems the role will solve",
    )]
}

pub fn detect_company_gaps(company: &CompanyEnrichment) -> Vec<Signal> {
    let mut signals = Vec::new();

    if company.website.as_deref().map_or(true, |w| w.trim().is_empty()) {
        signals.push(Signal::weighted(
            SignalType::NoWebsite,
            weights::NO_WEBSITE,
            "Company has no website",
        ));
    }
    if company.recent_news.is_empty() {
        signals.push(Signal::weighted(
            SignalType::NoRecentNews,
            weights::NO_RECENT_NEWS,
            "No recent news about the company",
        ));
    }
    if company.notable_products.is_empty() {
        signals.push(Signal::weighted(
            SignalType::NoProducts,
            weights::NO_PRODUCTS,
            "No known products for the company",
        ));
    }

    signals
}

// ────────────────────────────────────────────────────────────────────────────
// Detector implementations
// ────────────────────────────────────────────────────────────────────────────

pub struct VaguenessDetector;

#[async_trait]
impl SignalDetector for VaguenessDetector {
    fn name(&self) -> &'static str {
        "vagueness"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        detect_vagueness(&input.job)
    }
}

pub struct SalaryDetector;

#[async_trait]
impl SignalDetector for SalaryDetector {
    fn name(&self) -> &'static str {
        "salary"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        detect_missing_salary(&input.job)
    }
}

pub struct SeniorityDetector;

#[async_trait]
impl SignalDetector for SeniorityDetector {
    fn name(&self) -> &'static str {
        "seniority"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        detect_seniority_mismatch(&input.job)
    }
}

pub struct TechOverloadDetector;

#[async_trait]
impl SignalDetector for TechOverloadDetector {
    fn name(&self) -> &'static str {
        "tech_overload"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        detect_tech_overload(&input.job)
    }
}

pub struct ProblemsDefinedDetector;

#[async_trait]
impl SignalDetector for ProblemsDefinedDetector {
    fn name(&self) -> &'static str {
        "problems_defined"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        detect_missing_problems(&input.job)
    }
}

/// Only runs when company data was supplied.
pub struct CompanyProfileDetector;

#[async_trait]
impl SignalDetector for CompanyProfileDetector {
    fn name(&self) -> &'static str {
        "company_profile"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        input
            .company
            .as_ref()
            .map(detect_company_gaps)
            .unwrap_or_default()
    }
}

/// Only runs when a source URL was supplied. History failures suppress the signal.
pub struct RepostingDetector {
    history: Arc<dyn RepostingHistory>,
    lookback: Duration,
}

impl RepostingDetector {
    pub fn new(history: Arc<dyn RepostingHistory>, lookback: Duration) -> Self {
        Self { history, lookback }
    }
}

#[async_trait]
impl SignalDetector for RepostingDetector {
    fn name(&self) -> &'static str {
        "reposting"
    }

    async fn detect(&self, input: &AnalysisInput) -> Vec<Signal> {
        let Some(url) = input
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        else {
            return vec![];
        };

        let dates = match self.history.count_distinct_dates(url, self.lookback).await {
            Ok(dates) => dates,
            Err(e) => {
                warn!("Reposting history unavailable for {url}: {e}");
                return vec![];
            }
        };

        if dates < REPOST_DISTINCT_DATES {
            return vec![];
        }
        vec![Signal::weighted(
            SignalType::FrequentReposting,
            weights::FREQUENT_REPOSTING,
            format!(
                "Posting was re-published on {dates} different days within the last {} days",
                self.lookback.num_days()
            ),
        )]
    }
}
