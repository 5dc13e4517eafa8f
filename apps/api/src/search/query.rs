//! Query formatter: maps the internal search query onto TheirStack's filter shape.
//!
//! TheirStack rejects a search without at least one of its required filters, so
//! `posted_at_max_age_days` is always emitted. Every other key appears only when
//! its source value is present; absence means "no constraint".

use serde::{Deserialize, Serialize};

use crate::models::preferences::SearchPreferences;
use crate::models::profile::CandidateProfile;

/// Recency label → maximum posting age in days.
pub const RECENCY_BUCKETS: &[(&str, u32)] = &[
    ("Last 24 hours", 1),
    ("Last 7 days", 7),
    ("Last 30 days", 30),
    ("Last 90 days", 90),
];

/// Window used when the recency label is absent or unrecognised.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 90;

pub const ACCEPTED_SENIORITY_LEVELS: &[&str] = &["entry", "mid", "senior"];

/// The loosely-typed query assembled from the preferences step and the candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

impl SearchQuery {
    pub fn from_session(preferences: &SearchPreferences, profile: &CandidateProfile) -> Self {
        let level = profile.seniority_level.as_str();
        Self {
            title: preferences.title.clone(),
            location: preferences.location.clone(),
            company: preferences.company.clone(),
            date_posted: Some(preferences.date_posted.clone()),
            remote: preferences.wants_remote_only(),
            skills: profile.technical_skills.clone(),
            experience_level: (!level.is_empty()).then(|| level.to_string()),
        }
    }
}

/// Request body for `POST /jobs/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSearchFilter {
    pub posted_at_max_age_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name_or: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title_contains_any: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_contains_any: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_contains_any: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies_contains_any: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority_contains_any: Option<Vec<String>>,
}

impl JobSearchFilter {
    /// Smallest filter the API accepts; used by the connectivity test.
    pub fn minimal(max_age_days: u32) -> Self {
        Self {
            posted_at_max_age_days: max_age_days,
            company_name_or: None,
            job_title_contains_any: None,
            location_contains_any: None,
            remote_contains_any: None,
            technologies_contains_any: None,
            seniority_contains_any: None,
        }
    }
}

pub fn max_age_days(label: Option<&str>) -> u32 {
    label
        .and_then(|label| {
            RECENCY_BUCKETS
                .iter()
                .find(|(bucket, _)| *bucket == label.trim())
                .map(|(_, days)| *days)
        })
        .unwrap_or(DEFAULT_MAX_AGE_DAYS)
}

pub fn format_search_query(query: &SearchQuery) -> JobSearchFilter {
    let mut filter = JobSearchFilter::minimal(max_age_days(query.date_posted.as_deref()));

    filter.company_name_or = single(&query.company);
    filter.job_title_contains_any = single(&query.title);
    filter.location_contains_any = single(&query.location);

    if query.remote {
        filter.remote_contains_any = Some(vec!["true".to_string()]);
    }

    if !query.skills.is_empty() {
        filter.technologies_contains_any = Some(query.skills.clone());
    }

    filter.seniority_contains_any = query
        .experience_level
        .as_deref()
        .map(|level| level.trim().to_lowercase())
        .filter(|level| ACCEPTED_SENIORITY_LEVELS.contains(&level.as_str()))
        .map(|level| vec![level]);

    filter
}

fn single(value: &str) -> Option<Vec<String>> {
    let value = value.trim();
    (!value.is_empty()).then(|| vec![value.to_string()])
}
