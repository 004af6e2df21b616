use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Keywords extracted from a posting, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobKeywords {
    pub technical: Vec<String>,
    pub tools: Vec<String>,
    pub soft_skills: Vec<String>,
}

/// A keyword together with the sentence it came from and how central it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordContext {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub context: String,
    /// 0.0 – 1.0. Missing or non-numeric values are `None`.
    #[serde(default, deserialize_with = "lenient_number")]
    pub importance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryRange {
    #[serde(deserialize_with = "lenient_number")]
    pub min: Option<u64>,
    #[serde(deserialize_with = "lenient_number")]
    pub max: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn is_stated(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Structured result of job-posting analysis, produced upstream.
///
/// Optional scalar fields are read leniently: a value of the wrong shape
/// ("5+" years, a salary of "competitive") becomes `None`, so only the
/// detector that needs it stays silent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAnalysis {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub keywords: JobKeywords,
    pub keyword_context: Vec<KeywordContext>,
    #[serde(deserialize_with = "lenient")]
    pub seniority_level: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub required_years_experience: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub salary_range: Option<SalaryRange>,
    pub problems_to_solve: Vec<String>,
}

impl JobAnalysis {
    /// True when the analysis carries nothing a detector could look at.
    pub fn is_blank(&self) -> bool {
        self.title.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.keywords.technical.is_empty()
            && self.keywords.tools.is_empty()
            && self.problems_to_solve.is_empty()
    }
}

/// Any value that does not deserialize as `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Like `lenient`, but also accepts numbers sent as strings ("7").
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(raw)) => raw.trim().parse().ok(),
        Some(other) => serde_json::from_value(other).ok(),
        None => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Company profile assembled by the enrichment collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyEnrichment {
    pub name: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub recent_news: Vec<NewsItem>,
    pub notable_products: Vec<String>,
}

impl CompanyEnrichment {
    /// Degraded profile used when the real lookup fails: the name and nothing else.
    pub fn minimal(name: &str) -> Self {
        Self {
            name: Some(name.trim().to_string()),
            ..Self::default()
        }
    }
}

/// Everything the ghost-job detectors look at for one posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub job: JobAnalysis,
    #[serde(default)]
    pub company: Option<CompanyEnrichment>,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_analysis_missing_fields_default_to_empty() {
        let job: JobAnalysis = serde_json::from_str(r#"{"title": "Backend Engineer"}"#).unwrap();
        assert!(job.keywords.technical.is_empty());
        assert!(job.problems_to_solve.is_empty());
        assert!(job.salary_range.is_none());
        assert!(!job.is_blank());
    }

    #[test]
    fn test_job_analysis_full_deserializes() {
        let json = r#"{
            "title": "Senior Rust Engineer",
            "keywords": {"technical": ["Rust", "Tokio"], "tools": ["Docker"]},
            "keyword_context": [{"keyword": "Rust", "context": "5+ years Rust", "importance": 0.9}],
            "seniority_level": "senior",
            "required_years_experience": 6,
            "salary_range": {"min": 150000, "max": 190000, "currency": "USD"},
            "problems_to_solve": ["Scale the ingestion pipeline to 1M events/s"]
        }"#;
        let job: JobAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(job.keywords.technical.len(), 2);
        assert_eq!(job.keywords.tools, vec!["Docker".to_string()]);
        assert!(job.keywords.soft_skills.is_empty());
        assert_eq!(job.keyword_context[0].importance, Some(0.9));
        assert_eq!(job.required_years_experience, Some(6));
        assert!(job.salary_range.unwrap().is_stated());
    }

    #[test]
    fn test_malformed_years_become_none() {
        for raw in [r#""5+""#, "2.5", "-3", r#"{"min": 3}"#, "null"] {
            let json = format!(r#"{{"title": "Dev", "required_years_experience": {raw}}}"#);
            let job: JobAnalysis = serde_json::from_str(&json).unwrap();
            assert_eq!(job.required_years_experience, None, "input {raw}");
            assert_eq!(job.title.as_deref(), Some("Dev"));
        }
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let job: JobAnalysis =
            serde_json::from_str(r#"{"required_years_experience": " 7 "}"#).unwrap();
        assert_eq!(job.required_years_experience, Some(7));
    }

    #[test]
    fn test_malformed_salary_fields() {
        let job: JobAnalysis = serde_json::from_str(
            r#"{"salary_range": {"min": "competitive", "max": 120000, "currency": 978}}"#,
        )
        .unwrap();
        let range = job.salary_range.unwrap();
        assert_eq!(range.min, None);
        assert_eq!(range.max, Some(120_000));
        assert_eq!(range.currency, None);

        let job: JobAnalysis =
            serde_json::from_str(r#"{"salary_range": "negotiable"}"#).unwrap();
        assert!(job.salary_range.is_none());
    }

    #[test]
    fn test_keyword_context_importance_is_optional() {
        let job: JobAnalysis = serde_json::from_str(
            r#"{"keyword_context": [{"keyword": "Rust"}, {"keyword": "Go", "importance": "high"}]}"#,
        )
        .unwrap();
        assert_eq!(job.keyword_context.len(), 2);
        assert!(job.keyword_context.iter().all(|k| k.importance.is_none()));
    }

    #[test]
    fn test_non_string_seniority_becomes_none() {
        let job: JobAnalysis = serde_json::from_str(r#"{"seniority_level": 3}"#).unwrap();
        assert!(job.seniority_level.is_none());
    }

    #[test]
    fn test_blank_job() {
        assert!(JobAnalysis::default().is_blank());
    }

    #[test]
    fn test_salary_range_without_bounds_is_not_stated() {
        let range = SalaryRange {
            currency: Some("EUR".to_string()),
            ..SalaryRange::default()
        };
        assert!(!range.is_stated());
    }

    #[test]
    fn test_minimal_enrichment_keeps_only_name() {
        let company = CompanyEnrichment::minimal("  Acme Corp ");
        assert_eq!(company.name.as_deref(), Some("Acme Corp"));
        assert!(company.website.is_none());
        assert!(company.recent_news.is_empty());
        assert!(company.notable_products.is_empty());
    }
}
