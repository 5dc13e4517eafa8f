//! Matching: skill-overlap scoring, ranking, and results filtering.

pub mod filters;
pub mod scorer;
