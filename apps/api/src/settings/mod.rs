//! Settings: the two API keys and the search-API connectivity test.
//!
//! Keys are never echoed back; responses only say whether each one is set.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, Credential};
use crate::search::client::ConnectionReport;
use crate::state::AppState;
use crate::wizard::session::Credentials;
use crate::wizard::views::CredentialStatus;

/// Absent fields are left as they are; an empty string clears the key.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsUpdate {
    pub anthropic_api_key: Option<String>,
    pub theirstack_api_key: Option<String>,
}

impl CredentialsUpdate {
    pub fn apply_to(self, credentials: &mut Credentials) {
        if let Some(key) = self.anthropic_api_key {
            credentials.anthropic_api_key = normalize(key);
        }
        if let Some(key) = self.theirstack_api_key {
            credentials.theirstack_api_key = normalize(key);
        }
    }
}

fn normalize(key: String) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// GET /api/v1/settings
pub async fn handle_get_settings(State(state): State<AppState>) -> Json<CredentialStatus> {
    let session = state.session.lock().await;
    Json(CredentialStatus::from_session(&session))
}

/// PUT /api/v1/settings/credentials
pub async fn handle_update_credentials(
    State(state): State<AppState>,
    Json(update): Json<CredentialsUpdate>,
) -> Json<CredentialStatus> {
    let mut session = state.session.lock().await;
    update.apply_to(&mut session.credentials);
    let status = CredentialStatus::from_session(&session);
    info!(
        anthropic = status.anthropic,
        theirstack = status.theirstack,
        "Credentials updated"
    );
    Json(status)
}

/// POST /api/v1/settings/test-search
///
/// Reports failure in the body; the wizard state is never touched.
pub async fn handle_test_search(
    State(state): State<AppState>,
) -> Result<Json<ConnectionReport>, AppError> {
    let api_key = {
        let session = state.session.lock().await;
        session
            .credentials
            .require(Credential::TheirStack)?
            .to_string()
    };
    Ok(Json(state.job_source.test_connection(&api_key).await))
}
