//! Résumé analysis: extracts a `CandidateProfile` from résumé text via the LLM.

pub mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{build_http_client, LlmClient, LlmError};
use crate::models::profile::CandidateProfile;
use crate::profile::prompts::{RESUME_ANALYSIS_PROMPT, RESUME_ANALYSIS_SYSTEM};

/// Produces a candidate profile from résumé text.
///
/// The API key is passed per call because it is entered at runtime and may change.
/// Carried in `AppState` as `Arc<dyn ProfileExtractor>`.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    async fn extract(&self, api_key: &str, resume_text: &str)
        -> Result<CandidateProfile, AppError>;
}

/// Claude-backed extractor. Any call or parse failure becomes `AppError::Llm`.
pub struct ClaudeProfileExtractor {
    client: Client,
    api_url: String,
}

impl ClaudeProfileExtractor {
    pub fn new(api_url: String) -> Result<Self, AppError> {
        let client = build_http_client()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build LLM HTTP client: {e}")))?;
        Ok(Self { client, api_url })
    }
}

#[async_trait]
impl ProfileExtractor for ClaudeProfileExtractor {
    async fn extract(
        &self,
        api_key: &str,
        resume_text: &str,
    ) -> Result<CandidateProfile, AppError> {
        let llm = LlmClient::new(self.client.clone(), api_key.to_string(), self.api_url.clone());
        let prompt = build_analysis_prompt(resume_text);
        let system = format!("{RESUME_ANALYSIS_SYSTEM} {JSON_ONLY_SYSTEM}");

        let profile: CandidateProfile = llm
            .call_json(&prompt, &system)
            .await
            .map_err(llm_error)?;
        let profile = profile.normalized();

        info!(
            "Resume analyzed: {} technical skills, seniority={:?}",
            profile.technical_skills.len(),
            profile.seniority_level
        );
        Ok(profile)
    }
}

pub fn build_analysis_prompt(resume_text: &str) -> String {
    RESUME_ANALYSIS_PROMPT.replace("{resume_text}", resume_text.trim())
}

fn llm_error(e: LlmError) -> AppError {
    AppError::Llm(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::SeniorityLevel;
    use crate::test_support::serve_once;

    #[test]
    fn test_prompt_embeds_resume_and_schema() {
        let prompt = build_analysis_prompt("  Ada Lovelace\nRust, SQL  ");
        assert!(prompt.contains("RESUME:\nAda Lovelace\nRust, SQL\n"));
        for field in [
            "technical_skills",
            "soft_skills",
            "years_experience",
            "education",
            "achievements",
            "seniority_level",
        ] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
    }

    #[tokio::test]
    async fn test_extracts_profile_from_claude_reply() {
        let reply = serde_json::json!({
            "content": [{
                "type": "text",
                "text": r#"{"technical_skills": ["Rust", "SQL", "Rust"], "soft_skills": [], "years_experience": "7", "education": [], "achievements": [], "seniority_level": "Senior"}"#
            }],
            "usage": {"input_tokens": 100, "output_tokens": 40}
        });
        let (base_url, request) = serve_once("200 OK", &reply.to_string()).await;
        let extractor = ClaudeProfileExtractor::new(base_url).unwrap();

        let profile = extractor.extract("key", "Ada Lovelace").await.unwrap();
        assert_eq!(profile.technical_skills, vec!["Rust", "SQL"]);
        assert_eq!(profile.years_experience, 7.0);
        assert_eq!(profile.seniority_level, SeniorityLevel::Senior);

        let request = request.await.unwrap();
        assert!(request.body.contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_claude_error_status_surfaces_as_llm_error() {
        let (base_url, _request) = serve_once(
            "529 Overloaded",
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        )
        .await;
        let extractor = ClaudeProfileExtractor::new(base_url).unwrap();

        match extractor.extract("key", "resume").await {
            Err(AppError::Llm(message)) => {
                assert!(message.contains("529"), "{message}");
                assert!(message.contains("Overloaded"), "{message}");
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure_maps_to_llm_error() {
        let err = llm_error(LlmError::EmptyContent);
        assert!(matches!(err, AppError::Llm(_)));
        assert!(err.to_string().contains("empty content"));
    }
}
