//! Wizard orchestration: one function per user action.
//!
//! Flow: extract text → analyze (LLM) → confirm → preferences → search → score/rank → results.
//! Every external call returns a typed result; the session is only changed through
//! `Session::apply` after the call succeeded, so a failed step leaves it where it was.

use tracing::{info, warn};

use crate::chart::{build_match_chart, MatchChart};
use crate::documents::extract_text;
use crate::errors::{AppError, Credential};
use crate::matching::filters::{apply_filters, facets, ResultsFilter};
use crate::models::job::JobPosting;
use crate::models::preferences::SearchPreferences;
use crate::models::profile::CandidateProfile;
use crate::profile::ProfileExtractor;
use crate::search::client::JobSource;
use crate::search::query::{format_search_query, SearchQuery};
use crate::wizard::session::{Action, Session, Stage};
use crate::wizard::views::{JobCard, JobDetail, ResultsView, SearchOutcome, SessionView};

const NO_RESULTS_MESSAGE: &str =
    "No jobs found matching your criteria. Try broadening your search.";

/// Step 1: extract the résumé text and analyze it. The analysis waits for confirmation.
pub async fn upload_resume(
    session: &mut Session,
    extractor: &dyn ProfileExtractor,
    file_name: &str,
    bytes: &[u8],
) -> Result<CandidateProfile, AppError> {
    if !matches!(session.stage, Stage::AwaitingDocument { .. }) {
        return Err(AppError::InvalidTransition(
            "a resume can only be uploaded in step 1; start over to upload a new one".to_string(),
        ));
    }

    let text = extract_text(file_name, bytes).await?;
    let api_key = session.credentials.require(Credential::Anthropic)?.to_string();

    info!(session_id = %session.id, "Analyzing resume {file_name} ({} chars)", text.len());
    let profile = extractor.extract(&api_key, &text).await?;

    session.apply(Action::RecordAnalysis(profile.clone()))?;
    Ok(profile)
}

pub fn confirm_profile(session: &mut Session) -> Result<SessionView, AppError> {
    session.apply(Action::ConfirmProfile)?;
    Ok(SessionView::from_session(session))
}

pub fn submit_preferences(
    session: &mut Session,
    preferences: SearchPreferences,
) -> Result<SessionView, AppError> {
    session.apply(Action::SubmitPreferences(preferences))?;
    Ok(SessionView::from_session(session))
}

/// Step 3: run the search for the submitted preferences.
/// An empty result keeps the session in step 3 and points the user at adjusting preferences.
pub async fn run_search(
    session: &mut Session,
    source: &dyn JobSource,
) -> Result<SearchOutcome, AppError> {
    let query = match &session.stage {
        Stage::Searching {
            profile,
            preferences,
            ..
        } => SearchQuery::from_session(preferences, profile),
        other => {
            return Err(AppError::InvalidTransition(format!(
                "search runs in step 3, the session is in step {}",
                other.kind().number()
            )))
        }
    };

    let api_key = session.credentials.require(Credential::TheirStack)?.to_string();
    let filter = format_search_query(&query);

    let jobs = source.search(&api_key, &filter).await?;
    session.apply(Action::SearchCompleted(jobs))?;

    let view = SessionView::from_session(session);
    Ok(match &session.stage {
        Stage::ShowingResults { jobs, .. } => {
            info!(session_id = %session.id, "Ranked {} jobs", jobs.len());
            SearchOutcome::Results {
                job_count: jobs.len(),
                session: view,
            }
        }
        _ => {
            warn!(session_id = %session.id, "Search returned no jobs");
            SearchOutcome::NoResults {
                message: NO_RESULTS_MESSAGE.to_string(),
                next_action: "adjust_preferences".to_string(),
                session: view,
            }
        }
    })
}

/// Step 4 list: ranked jobs narrowed by `filter`.
pub fn results_view(session: &Session, filter: ResultsFilter) -> Result<ResultsView, AppError> {
    filter.validate().map_err(AppError::Validation)?;
    let (jobs, skills) = ranked_jobs(session)?;

    let cards: Vec<JobCard> = apply_filters(jobs, &filter)
        .into_iter()
        .map(|(rank, job)| JobCard::new(rank, job, skills))
        .collect();

    Ok(ResultsView {
        total: jobs.len(),
        shown: cards.len(),
        facets: facets(jobs),
        filter,
        jobs: cards,
    })
}

/// Expanded view of the job at 1-based `rank` in the ranked list.
pub fn job_detail(session: &Session, rank: usize) -> Result<JobDetail, AppError> {
    let (jobs, skills) = ranked_jobs(session)?;
    let job = rank
        .checked_sub(1)
        .and_then(|i| jobs.get(i))
        .ok_or_else(|| AppError::NotFound(format!("no job at rank {rank}")))?;

    Ok(JobDetail {
        card: JobCard::new(rank, job, skills),
        extra: job.extra.clone(),
    })
}

/// Chart of the top ranked jobs; `None` when there are none.
pub fn match_chart(session: &Session) -> Result<Option<MatchChart>, AppError> {
    let (jobs, _) = ranked_jobs(session)?;
    Ok(build_match_chart(jobs))
}

fn ranked_jobs(session: &Session) -> Result<(&[JobPosting], &[String]), AppError> {
    match &session.stage {
        Stage::ShowingResults { jobs, profile, .. } => Ok((jobs, &profile.technical_skills)),
        other => Err(AppError::InvalidTransition(format!(
            "results are shown in step 4, the session is in step {}",
            other.kind().number()
        ))),
    }
}
