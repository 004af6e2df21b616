//! Reasoning: short human-readable explanation of a ghost-job score.

use crate::ghost_job::signals::{RiskLevel, Signal};

/// Descriptions of the first `limit` high-severity signals, in detection order.
fn top_high_severity(signals: &[Signal], limit: usize) -> Vec<&str> {
    signals
        .iter()
        .filter(|s| s.is_high())
        .take(limit)
        .map(|s| s.description.as_str())
        .collect()
}

/// Picks a template by score band and fills it from the strongest signals.
pub fn explain(normalized_score: u32, signals: &[Signal], risk_level: RiskLevel) -> String {
    match normalized_score {
        0..=19 => "This posting looks legitimate: no major warning signals were found.".to_string(),
        20..=39 => format!(
            "A few suspicious signals were found (score: {normalized_score}/100). \
             Verify the company and the role before applying."
        ),
        40..=59 => {
            let top = top_high_severity(signals, 2);
            if top.is_empty() {
                format!(
                    "Caution: several warning signals (score: {normalized_score}/100, risk {risk_level}). \
                     Research the company before applying."
                )
            } else {
                format!(
                    "Caution: {} (score: {normalized_score}/100). Research the company before applying.",
                    top.join("; ")
                )
            }
        }
        _ => {
            let top = top_high_severity(signals, 3);
            if top.is_empty() {
                format!(
                    "Likely a ghost job (score: {normalized_score}/100, risk {risk_level}). \
                     We recommend not applying."
                )
            } else {
                format!(
                    "Likely a ghost job: {} (score: {normalized_score}/100). We recommend not applying.",
                    top.join("; ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost_job::signals::{Severity, SignalType};

    fn high(description: &str) -> Signal {
        Signal::new(SignalType::SeniorityMismatch, Severity::High, 25, description)
    }

    fn medium(description: &str) -> Signal {
        Signal::new(SignalType::NoSalary, Severity::Medium, 15, description)
    }

    #[test]
    fn test_low_band_ignores_signals() {
        let text = explain(15, &[high("should not appear")], RiskLevel::Low);
        assert!(text.contains("legitimate"));
        assert!(!text.contains("should not appear"));
    }

    #[test]
    fn test_medium_band_mentions_score() {
        let text = explain(35, &[medium("No salary")], RiskLevel::Medium);
        assert!(text.contains("35/100"));
        assert!(text.contains("Verify"));
        assert!(!text.contains("No salary"));
    }

    #[test]
    fn test_high_band_lists_two_high_signals_in_order() {
        let signals = vec![
            medium("No salary"),
            high("first"),
            high("second"),
            high("third"),
        ];
        let text = explain(50, &signals, RiskLevel::High);
        assert!(text.starts_with("Caution: first; second"));
        assert!(!text.contains("third"));
        assert!(!text.contains("No salary"));
    }

    #[test]
    fn test_very_high_band_lists_three_high_signals() {
        let signals = vec![high("a"), high("b"), high("c"), high("d")];
        let text = explain(90, &signals, RiskLevel::VeryHigh);
        assert!(text.contains("a; b; c"));
        assert!(!text.contains("; d"));
        assert!(text.contains("not applying"));
    }

    #[test]
    fn test_fewer_high_signals_than_requested_renders() {
        let text = explain(70, &[high("only one"), medium("No salary")], RiskLevel::VeryHigh);
        assert!(text.contains("Likely a ghost job: only one (score: 70/100)"));
    }

    #[test]
    fn test_no_high_signals_still_renders() {
        let text = explain(45, &[medium("x"), medium("y")], RiskLevel::High);
        assert!(text.contains("45/100"));
        let text = explain(80, &[], RiskLevel::VeryHigh);
        assert!(text.contains("80/100"));
        assert!(text.contains("risk VERY_HIGH"));
        assert!(!text.contains("VeryHigh"));
    }
}
