//! Axum route handlers for the four wizard steps.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::chart::{render_svg, MatchChart};
use crate::errors::AppError;
use crate::matching::filters::ResultsFilter;
use crate::models::preferences::SearchPreferences;
use crate::state::AppState;
use crate::wizard::service;
use crate::wizard::session::Action;
use crate::wizard::views::{
    JobDetail, ResultsView, SearchOutcome, SessionView, StepResponse, UploadResponse,
};

const UPLOAD_FIELD: &str = "file";

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from_session(&session))
}

/// POST /api/v1/session/upload
///
/// Multipart form with a single `file` part (pdf, docx or txt).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (file_name, bytes) = read_upload(&mut multipart).await?;

    let mut session = state.session.lock().await;
    let profile = service::upload_resume(
        &mut session,
        state.profile_extractor.as_ref(),
        &file_name,
        &bytes,
    )
    .await?;

    Ok(Json(UploadResponse {
        message: "CV analyzed successfully!".to_string(),
        file_name,
        profile,
        session: SessionView::from_session(&session),
    }))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
        return Ok((file_name, bytes.to_vec()));
    }
    Err(AppError::Validation(format!(
        "multipart body has no '{UPLOAD_FIELD}' part"
    )))
}

/// POST /api/v1/session/confirm-profile
pub async fn handle_confirm_profile(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    Ok(Json(service::confirm_profile(&mut session)?))
}

/// POST /api/v1/session/preferences
pub async fn handle_submit_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<SearchPreferences>,
) -> Result<Json<SessionView>, AppError> {
    let mut session = state.session.lock().await;
    Ok(Json(service::submit_preferences(&mut session, preferences)?))
}

/// POST /api/v1/session/search
pub async fn handle_search(
    State(state): State<AppState>,
) -> Result<Json<SearchOutcome>, AppError> {
    let mut session = state.session.lock().await;
    let outcome = service::run_search(&mut session, state.job_source.as_ref()).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/session/adjust-preferences
pub async fn handle_adjust_preferences(
    State(state): State<AppState>,
) -> Result<Json<StepResponse>, AppError> {
    apply_reset(&state, Action::AdjustPreferences).await
}

/// POST /api/v1/session/start-over
pub async fn handle_start_over(
    State(state): State<AppState>,
) -> Result<Json<StepResponse>, AppError> {
    apply_reset(&state, Action::StartOver).await
}

async fn apply_reset(state: &AppState, action: Action) -> Result<Json<StepResponse>, AppError> {
    let mut session = state.session.lock().await;
    let reset = session.apply(action)?;
    Ok(Json(StepResponse {
        session: SessionView::from_session(&session),
        reset,
    }))
}

/// GET /api/v1/results
pub async fn handle_get_results(
    State(state): State<AppState>,
) -> Result<Json<ResultsView>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(service::results_view(&session, ResultsFilter::default())?))
}

/// POST /api/v1/results/filter
pub async fn handle_filter_results(
    State(state): State<AppState>,
    Json(filter): Json<ResultsFilter>,
) -> Result<Json<ResultsView>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(service::results_view(&session, filter)?))
}

/// GET /api/v1/results/jobs/:rank
pub async fn handle_job_detail(
    State(state): State<AppState>,
    Path(rank): Path<usize>,
) -> Result<Json<JobDetail>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(service::job_detail(&session, rank)?))
}

/// GET /api/v1/results/chart
pub async fn handle_chart_data(
    State(state): State<AppState>,
) -> Result<Json<Option<MatchChart>>, AppError> {
    let session = state.session.lock().await;
    Ok(Json(service::match_chart(&session)?))
}

/// GET /api/v1/results/chart.svg
///
/// 204 when there is nothing to draw.
pub async fn handle_chart_svg(State(state): State<AppState>) -> Result<Response, AppError> {
    let session = state.session.lock().await;
    Ok(match service::match_chart(&session)? {
        Some(chart) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            render_svg(&chart),
        )
            .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}
