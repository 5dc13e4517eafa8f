use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A posting as returned by the job-search API.
///
/// `match_score` is the only field this service writes; it stays `None` until scoring.
/// Fields the service does not model are kept in `extra` for the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default, alias = "job_title")]
    pub title: String,
    #[serde(default, alias = "company_name")]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "technology_slugs", deserialize_with = "null_as_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "url")]
    pub apply_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPosting {
    pub fn new(title: &str, company: &str, required_skills: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            company: company.to_string(),
            location: None,
            description: None,
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
            apply_url: None,
            remote_type: None,
            match_score: None,
            extra: Map::new(),
        }
    }

    pub fn score(&self) -> f64 {
        self.match_score.unwrap_or(0.0)
    }

    /// Location for display; blank counts as missing.
    pub fn location_label(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    pub fn remote_type_label(&self) -> Option<&str> {
        self.remote_type
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
