//! Wizard session: the stage machine and the single user's in-memory session.
//!
//! Each `Stage` variant owns exactly the data that exists at that step, so a results
//! list without preferences, or preferences without a profile, cannot be built.
//! `Stage::next` only computes; `Session::apply` commits, so a rejected action leaves
//! the session untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, Credential};
use crate::matching::scorer::rank_jobs;
use crate::models::job::JobPosting;
use crate::models::preferences::SearchPreferences;
use crate::models::profile::CandidateProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    AwaitingDocument,
    AwaitingPreferences,
    Searching,
    ShowingResults,
}

impl StepKind {
    /// 1-based step number shown in the guided form.
    pub fn number(&self) -> u8 {
        match self {
            StepKind::AwaitingDocument => 1,
            StepKind::AwaitingPreferences => 2,
            StepKind::Searching => 3,
            StepKind::ShowingResults => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Step 1. `analysis` holds the latest analysed upload until the user confirms it.
    AwaitingDocument { analysis: Option<CandidateProfile> },
    AwaitingPreferences {
        profile: CandidateProfile,
    },
    /// `no_results` is set after a search came back empty; the way forward is adjusting preferences.
    Searching {
        profile: CandidateProfile,
        preferences: SearchPreferences,
        no_results: bool,
    },
    /// `jobs` are scored and ranked.
    ShowingResults {
        profile: CandidateProfile,
        preferences: SearchPreferences,
        jobs: Vec<JobPosting>,
    },
}

#[derive(Debug, Clone)]
pub enum Action {
    RecordAnalysis(CandidateProfile),
    ConfirmProfile,
    SubmitPreferences(SearchPreferences),
    SearchCompleted(Vec<JobPosting>),
    AdjustPreferences,
    StartOver,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::RecordAnalysis(_) => "record analysis",
            Action::ConfirmProfile => "confirm profile",
            Action::SubmitPreferences(_) => "submit preferences",
            Action::SearchCompleted(_) => "complete search",
            Action::AdjustPreferences => "adjust preferences",
            Action::StartOver => "start over",
        }
    }
}

/// Downstream state dropped by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetEffect {
    DiscardProfile,
    DiscardPreferences,
    DiscardJobs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: Stage,
    pub effects: Vec<ResetEffect>,
}

impl Transition {
    fn to(next: Stage) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: ResetEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::AwaitingDocument { analysis: None }
    }
}

impl Stage {
    pub fn kind(&self) -> StepKind {
        match self {
            Stage::AwaitingDocument { .. } => StepKind::AwaitingDocument,
            Stage::AwaitingPreferences { .. } => StepKind::AwaitingPreferences,
            Stage::Searching { .. } => StepKind::Searching,
            Stage::ShowingResults { .. } => StepKind::ShowingResults,
        }
    }

    /// The confirmed profile, or the pending analysis in step 1.
    pub fn profile(&self) -> Option<&CandidateProfile> {
        match self {
            Stage::AwaitingDocument { analysis } => analysis.as_ref(),
            Stage::AwaitingPreferences { profile }
            | Stage::Searching { profile, .. }
            | Stage::ShowingResults { profile, .. } => Some(profile),
        }
    }

    pub fn preferences(&self) -> Option<&SearchPreferences> {
        match self {
            Stage::Searching { preferences, .. } | Stage::ShowingResults { preferences, .. } => {
                Some(preferences)
            }
            _ => None,
        }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        match self {
            Stage::ShowingResults { jobs, .. } => jobs,
            _ => &[],
        }
    }

    /// Computes the stage that `action` leads to, without changing `self`.
    pub fn next(&self, action: Action) -> Result<Transition, AppError> {
        let name = action.name();
        match (self, action) {
            (_, Action::StartOver) => {
                let mut transition = Transition::to(Stage::default());
                if self.profile().is_some() {
                    transition = transition.with(ResetEffect::DiscardProfile);
                }
                if self.preferences().is_some() {
                    transition = transition.with(ResetEffect::DiscardPreferences);
                }
                if !self.jobs().is_empty() {
                    transition = transition.with(ResetEffect::DiscardJobs);
                }
                Ok(transition)
            }

            (Stage::AwaitingDocument { analysis }, Action::RecordAnalysis(profile)) => {
                let transition = Transition::to(Stage::AwaitingDocument {
                    analysis: Some(profile),
                });
                Ok(if analysis.is_some() {
                    transition.with(ResetEffect::DiscardProfile)
                } else {
                    transition
                })
            }

            (Stage::AwaitingDocument { analysis: Some(profile) }, Action::ConfirmProfile) => {
                Ok(Transition::to(Stage::AwaitingPreferences {
                    profile: profile.clone(),
                }))
            }
            (Stage::AwaitingDocument { analysis: None }, Action::ConfirmProfile) => {
                Err(AppError::InvalidTransition(
                    "upload and analyze a resume before continuing".to_string(),
                ))
            }

            (Stage::AwaitingPreferences { profile }, Action::SubmitPreferences(preferences)) => {
                if !preferences.has_target() {
                    return Err(AppError::Validation(
                        "Please enter either a job title or company name".to_string(),
                    ));
                }
                Ok(Transition::to(Stage::Searching {
                    profile: profile.clone(),
                    preferences,
                    no_results: false,
                }))
            }

            (
                Stage::Searching {
                    profile,
                    preferences,
                    ..
                },
                Action::SearchCompleted(jobs),
            ) => {
                if jobs.is_empty() {
                    return Ok(Transition::to(Stage::Searching {
                        profile: profile.clone(),
                        preferences: preferences.clone(),
                        no_results: true,
                    }));
                }
                let ranked = rank_jobs(jobs, &profile.technical_skills);
                Ok(Transition::to(Stage::ShowingResults {
                    profile: profile.clone(),
                    preferences: preferences.clone(),
                    jobs: ranked,
                }))
            }

            (Stage::Searching { profile, .. }, Action::AdjustPreferences) => Ok(Transition::to(
                Stage::AwaitingPreferences {
                    profile: profile.clone(),
                },
            )
            .with(ResetEffect::DiscardPreferences)),

            (Stage::ShowingResults { profile, .. }, Action::AdjustPreferences) => {
                Ok(Transition::to(Stage::AwaitingPreferences {
                    profile: profile.clone(),
                })
                .with(ResetEffect::DiscardPreferences)
                .with(ResetEffect::DiscardJobs))
            }

            (stage, _) => Err(AppError::InvalidTransition(format!(
                "cannot {name} while in step {} ({:?})",
                stage.kind().number(),
                stage.kind()
            ))),
        }
    }
}

/// API keys, held in memory only.
#[derive(Clone, Default)]
pub struct Credentials {
    pub anthropic_api_key: Option<String>,
    pub theirstack_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "<set>"))
            .field("theirstack_api_key", &self.theirstack_api_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}

impl Credentials {
    pub fn require(&self, credential: Credential) -> Result<&str, AppError> {
        let key = match credential {
            Credential::Anthropic => &self.anthropic_api_key,
            Credential::TheirStack => &self.theirstack_api_key,
        };
        key.as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AppError::MissingCredential(credential))
    }

    pub fn is_set(&self, credential: Credential) -> bool {
        self.require(credential).is_ok()
    }
}

/// The single user's session context.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub stage: Stage,
    pub credentials: Credentials,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            id: Uuid::new_v4(),
            stage: Stage::default(),
            credentials,
            updated_at: Utc::now(),
        }
    }

    /// Applies `action` if it is legal here. On error the session is unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Vec<ResetEffect>, AppError> {
        let starting_over = matches!(action, Action::StartOver);
        let from = self.stage.kind();
        let Transition { next, effects } = self.stage.next(action)?;

        self.stage = next;
        self.updated_at = Utc::now();
        if starting_over {
            self.id = Uuid::new_v4();
        }

        info!(
            session_id = %self.id,
            "Step {:?} -> {:?} (reset: {:?})",
            from,
            self.stage.kind(),
            effects
        );
        Ok(effects)
    }
}
