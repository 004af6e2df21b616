//! Bullet risk flagger: flags generated résumé statements a recruiter is
//! likely to challenge.
//!
//! Rules:
//! - a job title rewritten away from the user's original title
//! - a strong-outcome claim ("increased", "optimized", …) with no number
//!
//! Overall risk is an ordinal fold over the flags, not a numeric score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::fingerprint::normalize;
use crate::models::cv::{ContentRiskLevel, GeneratedContent, OriginalProfile, ProfileExperience};

/// More MEDIUM flags than this raise the overall risk to MEDIUM.
pub const MEDIUM_FLAGS_FOR_MEDIUM_RISK: usize = 2;

pub const TITLE_NORMALIZATION_REASON: &str = "title normalization";
pub const UNQUANTIFIED_CLAIM_REASON: &str = "strong claim without quantification";

/// Word stems of strong-outcome verbs, English and Russian.
const STRONG_OUTCOME_STEMS: &[&str] = &[
    "increas",
    "optimi",
    "improv",
    "reduc",
    "accelerat",
    "увелич",
    "оптимиз",
    "улучш",
    "сократ",
    "сниз",
    "ускор",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub statement: String,
    pub risk_level: ContentRiskLevel,
    pub reason: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: ContentRiskLevel,
    pub flags: Vec<RiskFlag>,
}

/// One independent check over generated content.
pub trait BulletRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, generated: &GeneratedContent, original: &OriginalProfile) -> Vec<RiskFlag>;
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Flags entries whose title differs from the matching original entry. The
/// flag carries the original entry's own risk level.
pub struct TitleNormalizationRule;

fn find_original<'a>(original: &'a OriginalProfile, company: &str) -> Option<&'a ProfileExperience> {
    let company = normalize(company);
    original
        .experience
        .iter()
        .find(|entry| normalize(&entry.company) == company)
}

impl BulletRule for TitleNormalizationRule {
    fn name(&self) -> &'static str {
        "title_normalization"
    }

    fn evaluate(&self, generated: &GeneratedContent, original: &OriginalProfile) -> Vec<RiskFlag> {
        generated
            .experience
            .iter()
            .filter_map(|entry| {
                let source = find_original(original, &entry.company)?;
                if normalize(&entry.title) == normalize(&source.title) {
                    return None;
                }
                Some(RiskFlag {
                    statement: format!(
                        "{}: \"{}\" (originally \"{}\")",
                        entry.company.trim(),
                        entry.title.trim(),
                        source.title.trim()
                    ),
                    risk_level: source.risk_level,
                    reason: TITLE_NORMALIZATION_REASON.to_string(),
                    recommendation: format!(
                        "Prepare a verbal explanation of why \"{}\" is presented as \"{}\"",
                        source.title.trim(),
                        entry.title.trim()
                    ),
                })
            })
            .collect()
    }
}

/// Flags bullets that claim a strong outcome but contain no number.
pub struct UnquantifiedClaimRule;

pub fn is_unquantified_claim(bullet: &str) -> bool {
    if bullet.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    bullet
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .any(|word| STRONG_OUTCOME_STEMS.iter().any(|stem| word.starts_with(stem)))
}

impl BulletRule for UnquantifiedClaimRule {
    fn name(&self) -> &'static str {
        "unquantified_claim"
    }

    fn evaluate(&self, generated: &GeneratedContent, _original: &OriginalProfile) -> Vec<RiskFlag> {
        generated
            .experience
            .iter()
            .flat_map(|entry| entry.bullets.iter())
            .filter(|bullet| is_unquantified_claim(bullet))
            .map(|bullet| RiskFlag {
                statement: bullet.trim().to_string(),
                risk_level: ContentRiskLevel::Medium,
                reason: UNQUANTIFIED_CLAIM_REASON.to_string(),
                recommendation: "Add a concrete metric (%, time, money, volume) or soften the claim"
                    .to_string(),
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flagger
// ────────────────────────────────────────────────────────────────────────────

/// HIGH if any flag is HIGH; MEDIUM if more than two MEDIUM flags; else LOW.
pub fn overall_risk(flags: &[RiskFlag]) -> ContentRiskLevel {
    if flags.iter().any(|f| f.risk_level == ContentRiskLevel::High) {
        return ContentRiskLevel::High;
    }
    let medium = flags
        .iter()
        .filter(|f| f.risk_level == ContentRiskLevel::Medium)
        .count();
    if medium > MEDIUM_FLAGS_FOR_MEDIUM_RISK {
        ContentRiskLevel::Medium
    } else {
        ContentRiskLevel::Low
    }
}

pub struct BulletRiskFlagger {
    rules: Vec<Box<dyn BulletRule>>,
}

impl Default for BulletRiskFlagger {
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(TitleNormalizationRule),
            Box::new(UnquantifiedClaimRule),
        ])
    }
}

impl BulletRiskFlagger {
    pub fn with_rules(rules: Vec<Box<dyn BulletRule>>) -> Self {
        Self { rules }
    }

    #[cfg(test)]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn assess(&self, generated: &GeneratedContent, original: &OriginalProfile) -> RiskAssessment {
        let mut flags = Vec::new();
        for rule in &self.rules {
            let found = rule.evaluate(generated, original);
            if !found.is_empty() {
                debug!(rule = rule.name(), count = found.len(), "bullet rule flagged content");
            }
            flags.extend(found);
        }
        RiskAssessment {
            overall_risk: overall_risk(&flags),
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::GeneratedExperience;

    fn generated(company: &str, title: &str, bullets: &[&str]) -> GeneratedContent {
        GeneratedContent {
            experience: vec![GeneratedExperience {
                company: company.to_string(),
                title: title.to_string(),
                bullets: bullets.iter().map(|b| b.to_string()).collect(),
            }],
        }
    }

    fn profile(company: &str, title: &str, risk_level: ContentRiskLevel) -> OriginalProfile {
        OriginalProfile {
            experience: vec![ProfileExperience {
                company: company.to_string(),
                title: title.to_string(),
                risk_level,
            }],
        }
    }

    fn clean_profile() -> OriginalProfile {
        profile("Acme", "Backend Engineer", ContentRiskLevel::Low)
    }

    #[test]
    fn test_unquantified_strong_claim_yields_one_medium_flag() {
        let content = generated("Acme", "Backend Engineer", &["Increased performance significantly"]);
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert_eq!(assessment.flags.len(), 1);
        assert_eq!(assessment.flags[0].risk_level, ContentRiskLevel::Medium);
        assert_eq!(assessment.flags[0].reason, UNQUANTIFIED_CLAIM_REASON);
        assert_eq!(assessment.overall_risk, ContentRiskLevel::Low);
    }

    #[test]
    fn test_quantified_claim_is_not_flagged() {
        let content = generated("Acme", "Backend Engineer", &["Increased performance by 30%"]);
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert!(assessment.flags.is_empty());
        assert_eq!(assessment.overall_risk, ContentRiskLevel::Low);
    }

    #[test]
    fn test_plain_bullet_is_not_flagged() {
        assert!(!is_unquantified_claim("Designed the billing service API"));
    }

    #[test]
    fn test_inflections_and_russian_claims() {
        assert!(is_unquantified_claim("Optimizing deployment pipelines"));
        assert!(is_unquantified_claim("Significantly reduced cloud costs"));
        assert!(is_unquantified_claim("Ускорил сборку проекта"));
        assert!(!is_unquantified_claim("Сократил время ответа на 40%"));
    }

    #[test]
    fn test_title_change_carries_original_risk() {
        let content = generated("ACME ", "Senior Backend Engineer", &[]);
        let original = profile("acme", "Backend Engineer", ContentRiskLevel::High);
        let assessment = BulletRiskFlagger::default().assess(&content, &original);
        assert_eq!(assessment.flags.len(), 1);
        let flag = &assessment.flags[0];
        assert_eq!(flag.reason, TITLE_NORMALIZATION_REASON);
        assert_eq!(flag.risk_level, ContentRiskLevel::High);
        assert!(flag.recommendation.contains("verbal explanation"));
        assert_eq!(assessment.overall_risk, ContentRiskLevel::High);
    }

    #[test]
    fn test_title_whitespace_and_case_changes_are_not_flagged() {
        let content = generated("Acme", "backend  engineer", &[]);
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert!(assessment.flags.is_empty());
    }

    #[test]
    fn test_unmatched_company_is_not_title_flagged() {
        let content = generated("Globex", "CTO", &[]);
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert!(assessment.flags.is_empty());
    }

    #[test]
    fn test_three_medium_flags_raise_overall_to_medium() {
        let content = generated(
            "Acme",
            "Backend Engineer",
            &[
                "Improved reliability",
                "Reduced costs",
                "Accelerated releases",
            ],
        );
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert_eq!(assessment.flags.len(), 3);
        assert_eq!(assessment.overall_risk, ContentRiskLevel::Medium);
    }

    #[test]
    fn test_two_medium_flags_stay_low() {
        let content = generated(
            "Acme",
            "Backend Engineer",
            &["Improved reliability", "Reduced costs"],
        );
        let assessment = BulletRiskFlagger::default().assess(&content, &clean_profile());
        assert_eq!(assessment.overall_risk, ContentRiskLevel::Low);
    }

    #[test]
    fn test_empty_content_is_low() {
        let assessment =
            BulletRiskFlagger::default().assess(&GeneratedContent::default(), &OriginalProfile::default());
        assert!(assessment.flags.is_empty());
        assert_eq!(assessment.overall_risk, ContentRiskLevel::Low);
    }

    #[test]
    fn test_default_rules() {
        assert_eq!(
            BulletRiskFlagger::default().rule_names(),
            vec!["title_normalization", "unquantified_claim"]
        );
    }
}
