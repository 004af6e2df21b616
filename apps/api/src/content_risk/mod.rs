// Content risk: flags generated résumé statements that may not survive a
// recruiter's follow-up questions. Shares the risk vocabulary with ghost-job
// scoring but has its own rules and no numeric score.

pub mod flagger;
pub mod handlers;

use crate::content_risk::flagger::{BulletRiskFlagger, RiskAssessment};
use crate::models::cv::{GeneratedContent, OriginalProfile};

/// Assesses generated content against the user's original profile using the
/// default rule set.
pub fn assess_content_risk(
    generated: &GeneratedContent,
    original: &OriginalProfile,
) -> RiskAssessment {
    BulletRiskFlagger::default().assess(generated, original)
}
