pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::settings;
use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard steps
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/upload", post(handlers::handle_upload))
        .route(
            "/api/v1/session/confirm-profile",
            post(handlers::handle_confirm_profile),
        )
        .route(
            "/api/v1/session/preferences",
            post(handlers::handle_submit_preferences),
        )
        .route("/api/v1/session/search", post(handlers::handle_search))
        .route(
            "/api/v1/session/adjust-preferences",
            post(handlers::handle_adjust_preferences),
        )
        .route(
            "/api/v1/session/start-over",
            post(handlers::handle_start_over),
        )
        // Results
        .route("/api/v1/results", get(handlers::handle_get_results))
        .route(
            "/api/v1/results/filter",
            post(handlers::handle_filter_results),
        )
        .route(
            "/api/v1/results/jobs/:rank",
            get(handlers::handle_job_detail),
        )
        .route("/api/v1/results/chart", get(handlers::handle_chart_data))
        .route("/api/v1/results/chart.svg", get(handlers::handle_chart_svg))
        // Settings
        .route("/api/v1/settings", get(settings::handle_get_settings))
        .route(
            "/api/v1/settings/credentials",
            put(settings::handle_update_credentials),
        )
        .route(
            "/api/v1/settings/test-search",
            post(settings::handle_test_search),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::errors::AppError;
    use crate::models::job::JobPosting;
    use crate::models::profile::{CandidateProfile, SeniorityLevel};
    use crate::profile::ProfileExtractor;
    use crate::search::client::JobSource;
    use crate::search::query::JobSearchFilter;

    const BOUNDARY: &str = "jobmatch-test-boundary";

    struct StubExtractor;

    #[async_trait]
    impl ProfileExtractor for StubExtractor {
        async fn extract(&self, _: &str, _: &str) -> Result<CandidateProfile, AppError> {
            Ok(CandidateProfile {
                technical_skills: vec!["Python".to_string(), "SQL".to_string()],
                soft_skills: vec![],
                years_experience: 5.0,
                education: vec![],
                achievements: vec![],
                seniority_level: SeniorityLevel::Senior,
            })
        }
    }

    struct StubSource(Vec<JobPosting>);

    #[async_trait]
    impl JobSource for StubSource {
        async fn search(
            &self,
            _: &str,
            _: &JobSearchFilter,
        ) -> Result<Vec<JobPosting>, AppError> {
            Ok(self.0.clone())
        }
    }

    fn app(jobs: Vec<JobPosting>) -> Router {
        let state = AppState::new(
            Config::default(),
            Arc::new(StubExtractor),
            Arc::new(StubSource(jobs)),
        );
        build_router(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let (status, bytes) = send(app, request).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn upload_request(file_name: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/session/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn set_keys(app: &Router) {
        let (status, body) = send_json(
            app,
            "PUT",
            "/api/v1/settings/credentials",
            Some(json!({"anthropic_api_key": "claude", "theirstack_api_key": "ts"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"anthropic": true, "theirstack": true}));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_json(&app(vec![]), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_full_wizard_flow() {
        let app = app(vec![
            JobPosting::new("Data Engineer", "Acme", &["Python", "SQL", "AWS"]),
            JobPosting::new("Generalist", "Initech", &[]),
        ]);
        set_keys(&app).await;

        let (status, bytes) = send(&app, upload_request("cv.txt", "Python and SQL")).await;
        assert_eq!(status, StatusCode::OK);
        let upload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(upload["profile"]["seniority_level"], "senior");
        assert_eq!(upload["session"]["awaiting_confirmation"], true);

        let (status, session) =
            send_json(&app, "POST", "/api/v1/session/confirm-profile", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["step"], "awaiting_preferences");

        let (status, session) = send_json(
            &app,
            "POST",
            "/api/v1/session/preferences",
            Some(json!({"title": "Data Engineer", "date_posted": "Last 7 days", "remote": "Remote only"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["step_number"], 3);

        let (status, outcome) = send_json(&app, "POST", "/api/v1/session/search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["outcome"], "results");
        assert_eq!(outcome["job_count"], 2);

        let (status, results) = send_json(&app, "GET", "/api/v1/results", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["total"], 2);
        assert_eq!(results["shown"], 1);
        assert_eq!(results["jobs"][0]["match_score"], 66.67);

        let (status, results) = send_json(
            &app,
            "POST",
            "/api/v1/results/filter",
            Some(json!({"min_score": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(results["shown"], 2);

        let (status, detail) = send_json(&app, "GET", "/api/v1/results/jobs/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["title"], "Generalist");
        assert_eq!(detail["location"], "Not specified");

        let (status, svg) = send(
            &app,
            Request::get("/api/v1/results/chart.svg")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(svg).unwrap().contains("66.67%"));

        let (status, reset) = send_json(&app, "POST", "/api/v1/session/start-over", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reset["session"]["step"], "awaiting_document");
        assert_eq!(
            reset["reset"],
            json!(["discard_profile", "discard_preferences", "discard_jobs"])
        );
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_415() {
        let app = app(vec![]);
        set_keys(&app).await;
        let (status, bytes) = send(&app, upload_request("cv.csv", "a,b")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");

        let (_, session) = send_json(&app, "GET", "/api/v1/session", None).await;
        assert_eq!(session["step"], "awaiting_document");
        assert_eq!(session["profile"], Value::Null);
    }

    #[tokio::test]
    async fn test_upload_without_key_prompts_for_it() {
        let app = app(vec![]);
        let (status, bytes) = send(&app, upload_request("cv.txt", "Python")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "MISSING_CREDENTIAL");
    }

    #[tokio::test]
    async fn test_empty_search_then_adjust_preferences() {
        let app = app(vec![]);
        set_keys(&app).await;
        send(&app, upload_request("cv.txt", "Python")).await;
        send_json(&app, "POST", "/api/v1/session/confirm-profile", None).await;
        send_json(
            &app,
            "POST",
            "/api/v1/session/preferences",
            Some(json!({"company": "Acme"})),
        )
        .await;

        let (status, outcome) = send_json(&app, "POST", "/api/v1/session/search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["outcome"], "no_results");
        assert_eq!(outcome["next_action"], "adjust_preferences");

        let (status, _) = send_json(&app, "GET", "/api/v1/results", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, reset) =
            send_json(&app, "POST", "/api/v1/session/adjust-preferences", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reset["session"]["step"], "awaiting_preferences");
        assert!(reset["session"]["profile"].is_object());
    }

    #[tokio::test]
    async fn test_out_of_order_step_is_conflict() {
        let app = app(vec![]);
        let (status, body) = send_json(&app, "POST", "/api/v1/session/search", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_settings_never_echo_keys() {
        let app = app(vec![]);
        set_keys(&app).await;
        let (_, body) = send_json(&app, "GET", "/api/v1/settings", None).await;
        assert!(!body.to_string().contains("claude"));
        let (_, session) = send_json(&app, "GET", "/api/v1/session", None).await;
        assert!(!session.to_string().contains("\"ts\""));
    }

    #[tokio::test]
    async fn test_connectivity_test_reports_success() {
        let app = app(vec![]);
        set_keys(&app).await;
        let (status, body) = send_json(&app, "POST", "/api/v1/settings/test-search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "API connection successful"})
        );
    }
}
