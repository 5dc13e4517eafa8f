use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_POSTED: &str = "Last 30 days";

/// Recency labels offered in the preferences form.
pub const DATE_POSTED_OPTIONS: &[&str] = &["Last 24 hours", "Last 7 days", "Last 30 days", "Last 90 days"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemotePreference {
    #[default]
    #[serde(rename = "Any", alias = "any")]
    Any,
    #[serde(rename = "Remote only", alias = "remote_only")]
    RemoteOnly,
    #[serde(rename = "Hybrid", alias = "hybrid")]
    Hybrid,
    #[serde(rename = "In-office", alias = "in_office")]
    InOffice,
}

/// What the user asked for in the preferences step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPreferences {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default = "default_date_posted")]
    pub date_posted: String,
    #[serde(default)]
    pub remote: RemotePreference,
}

fn default_date_posted() -> String {
    DEFAULT_DATE_POSTED.to_string()
}

impl SearchPreferences {
    /// A search needs at least a title or a company to narrow the results.
    pub fn has_target(&self) -> bool {
        !self.title.trim().is_empty() || !self.company.trim().is_empty()
    }

    pub fn wants_remote_only(&self) -> bool {
        self.remote == RemotePreference::RemoteOnly
    }
}
