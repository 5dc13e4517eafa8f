//! Response shapes for the wizard routes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::Credential;
use crate::matching::filters::{Facets, ResultsFilter};
use crate::matching::scorer::matching_skills;
use crate::models::job::JobPosting;
use crate::models::preferences::{SearchPreferences, DATE_POSTED_OPTIONS};
use crate::models::profile::CandidateProfile;
use crate::wizard::session::{ResetEffect, Session, Stage, StepKind};

const LOCATION_NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Serialize)]
pub struct CredentialStatus {
    pub anthropic: bool,
    pub theirstack: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: StepKind,
    pub step_number: u8,
    pub profile: Option<CandidateProfile>,
    /// True while step 1 holds an analysis the user has not confirmed yet.
    pub awaiting_confirmation: bool,
    pub preferences: Option<SearchPreferences>,
    pub no_results: bool,
    pub job_count: usize,
    pub date_posted_options: &'static [&'static str],
    pub credentials: CredentialStatus,
    pub updated_at: DateTime<Utc>,
}

impl SessionView {
    pub fn from_session(session: &Session) -> Self {
        let stage = &session.stage;
        Self {
            session_id: session.id,
            step: stage.kind(),
            step_number: stage.kind().number(),
            profile: stage.profile().cloned(),
            awaiting_confirmation: matches!(
                stage,
                Stage::AwaitingDocument {
                    analysis: Some(_)
                }
            ),
            preferences: stage.preferences().cloned(),
            no_results: matches!(
                stage,
                Stage::Searching {
                    no_results: true,
                    ..
                }
            ),
            job_count: stage.jobs().len(),
            date_posted_options: DATE_POSTED_OPTIONS,
            credentials: CredentialStatus::from_session(session),
            updated_at: session.updated_at,
        }
    }
}

impl CredentialStatus {
    pub fn from_session(session: &Session) -> Self {
        Self {
            anthropic: session.credentials.is_set(Credential::Anthropic),
            theirstack: session.credentials.is_set(Credential::TheirStack),
        }
    }
}

/// Result of a wizard action: the step it led to and what it discarded.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub session: SessionView,
    pub reset: Vec<ResetEffect>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_name: String,
    pub profile: CandidateProfile,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Results {
        job_count: usize,
        session: SessionView,
    },
    NoResults {
        message: String,
        next_action: String,
        session: SessionView,
    },
}

/// One entry in the results list, with everything the expandable detail shows.
#[derive(Debug, Serialize)]
pub struct JobCard {
    pub rank: usize,
    pub title: String,
    pub company: String,
    pub location: String,
    pub remote_type: Option<String>,
    pub match_score: f64,
    pub description: String,
    pub required_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub apply_url: Option<String>,
}

impl JobCard {
    pub fn new(rank: usize, job: &JobPosting, candidate_skills: &[String]) -> Self {
        Self {
            rank,
            title: non_blank(&job.title).unwrap_or("Untitled").to_string(),
            company: non_blank(&job.company).unwrap_or("Unknown").to_string(),
            location: job
                .location_label()
                .unwrap_or(LOCATION_NOT_SPECIFIED)
                .to_string(),
            remote_type: job.remote_type_label().map(String::from),
            match_score: job.score(),
            description: job
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "No description available".to_string()),
            required_skills: job.required_skills.clone(),
            matching_skills: matching_skills(job, candidate_skills),
            apply_url: job.apply_url.clone().filter(|u| !u.trim().is_empty()),
        }
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

#[derive(Debug, Serialize)]
pub struct ResultsView {
    pub total: usize,
    pub shown: usize,
    pub filter: ResultsFilter,
    pub facets: Facets,
    pub jobs: Vec<JobCard>,
}

#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub card: JobCard,
    /// Upstream fields not modelled by `JobPosting`.
    pub extra: Map<String, Value>,
}
