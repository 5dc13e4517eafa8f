use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobPosting;

pub const DEFAULT_MIN_SCORE: f64 = 50.0;

/// Filters applied to the ranked list in the results step.
/// Empty `locations` / `remote_types` mean "no constraint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFilter {
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub remote_types: Vec<String>,
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

impl Default for ResultsFilter {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            locations: Vec::new(),
            remote_types: Vec::new(),
        }
    }
}

impl ResultsFilter {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err(format!(
                "min_score must be between 0 and 100, got {}",
                self.min_score
            ));
        }
        Ok(())
    }

    /// A job without a location (or remote type) never matches an active constraint on it.
    pub fn matches(&self, job: &JobPosting) -> bool {
        job.score() >= self.min_score
            && within(&self.locations, job.location_label())
            && within(&self.remote_types, job.remote_type_label())
    }
}

fn within(allowed: &[String], value: Option<&str>) -> bool {
    allowed.is_empty() || value.is_some_and(|v| allowed.iter().any(|a| a == v))
}

/// Jobs passing `filter`, in ranked order, each paired with its 1-based rank.
pub fn apply_filters<'a>(
    jobs: &'a [JobPosting],
    filter: &ResultsFilter,
) -> Vec<(usize, &'a JobPosting)> {
    jobs.iter()
        .enumerate()
        .filter(|(_, job)| filter.matches(job))
        .map(|(i, job)| (i + 1, job))
        .collect()
}

/// Distinct filter options offered for the current result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub locations: Vec<String>,
    pub remote_types: Vec<String>,
}

pub fn facets(jobs: &[JobPosting]) -> Facets {
    let locations: BTreeSet<&str> = jobs.iter().filter_map(JobPosting::location_label).collect();
    let remote_types: BTreeSet<&str> =
        jobs.iter().filter_map(JobPosting::remote_type_label).collect();
    Facets {
        locations: locations.into_iter().map(String::from).collect(),
        remote_types: remote_types.into_iter().map(String::from).collect(),
    }
}
