use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::profile::ProfileExtractor;
use crate::search::client::JobSource;
use crate::wizard::session::{Credentials, Session};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// There is exactly one session. Handlers hold its lock for the whole action,
/// external calls included, so one step completes before the next begins.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub profile_extractor: Arc<dyn ProfileExtractor>,
    pub job_source: Arc<dyn JobSource>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        profile_extractor: Arc<dyn ProfileExtractor>,
        job_source: Arc<dyn JobSource>,
    ) -> Self {
        let credentials = Credentials {
            anthropic_api_key: config.anthropic_api_key.clone(),
            theirstack_api_key: config.theirstack_api_key.clone(),
        };
        Self {
            session: Arc::new(Mutex::new(Session::new(credentials))),
            profile_extractor,
            job_source,
            config,
        }
    }
}
