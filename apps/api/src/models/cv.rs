use serde::{Deserialize, Serialize};

/// Three-level risk vocabulary for generated résumé content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentRiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// One experience entry as rewritten by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedExperience {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    pub experience: Vec<GeneratedExperience>,
}

/// One experience entry as the user originally stated it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileExperience {
    pub company: String,
    pub title: String,
    /// Risk already attached to this entry when the profile was built.
    #[serde(default)]
    pub risk_level: ContentRiskLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OriginalProfile {
    pub experience: Vec<ProfileExperience>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_serde() {
        let level: ContentRiskLevel = serde_json::from_str(r#""HIGH""#).unwrap();
        assert_eq!(level, ContentRiskLevel::High);
        assert_eq!(
            serde_json::to_string(&ContentRiskLevel::Medium).unwrap(),
            r#""MEDIUM""#
        );
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(ContentRiskLevel::High > ContentRiskLevel::Medium);
        assert!(ContentRiskLevel::Medium > ContentRiskLevel::Low);
    }

    #[test]
    fn test_profile_risk_defaults_to_low() {
        let entry: ProfileExperience =
            serde_json::from_str(r#"{"company": "Acme", "title": "Engineer"}"#).unwrap();
        assert_eq!(entry.risk_level, ContentRiskLevel::Low);
    }
}
