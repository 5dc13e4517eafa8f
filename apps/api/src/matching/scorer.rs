//! Match scorer: share of a job's required skills that the candidate has.
//!
//! Policy: a job that lists no required skills scores exactly 0.0. Ranking and the
//! results filter both depend on this, so it must not become 100 or "unknown".

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::job::JobPosting;

/// `100 * |required ∩ candidate| / |required|`, rounded to two decimals.
/// Skills compare by exact string; duplicates collapse on both sides.
pub fn calculate_match_score(job: &JobPosting, candidate_skills: &[String]) -> f64 {
    let required: HashSet<&str> = job.required_skills.iter().map(String::as_str).collect();
    if required.is_empty() {
        return 0.0;
    }

    let candidate: HashSet<&str> = candidate_skills.iter().map(String::as_str).collect();
    let matches = required.intersection(&candidate).count();

    // Score in hundredths of a percent; halves round to even, so 1 of 32 is 3.12.
    let hundredths = (matches * 10_000) as f64 / required.len() as f64;
    hundredths.round_ties_even() / 100.0
}

/// The job's required skills the candidate has, in the job's listing order.
pub fn matching_skills(job: &JobPosting, candidate_skills: &[String]) -> Vec<String> {
    let candidate: HashSet<&str> = candidate_skills.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    job.required_skills
        .iter()
        .filter(|skill| candidate.contains(skill.as_str()) && seen.insert(skill.as_str()))
        .cloned()
        .collect()
}

/// Annotates every job with its score, then orders by score descending.
/// Ties break on title, then company, so equal scores always list the same way.
pub fn rank_jobs(mut jobs: Vec<JobPosting>, candidate_skills: &[String]) -> Vec<JobPosting> {
    for job in &mut jobs {
        job.match_score = Some(calculate_match_score(job, candidate_skills));
    }
    jobs.sort_by(compare_ranked);
    jobs
}

fn compare_ranked(a: &JobPosting, b: &JobPosting) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.company.cmp(&b.company))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_of_three_is_66_67() {
        let job = JobPosting::new("Data Engineer", "Acme", &["Python", "SQL", "AWS"]);
        assert_eq!(calculate_match_score(&job, &skills(&["Python", "SQL"])), 66.67);
    }

    #[test]
    fn test_half_hundredths_round_to_even() {
        let required: Vec<String> = (0..32).map(|i| format!("skill-{i}")).collect();
        let refs: Vec<&str> = required.iter().map(String::as_str).collect();
        let job = JobPosting::new("Engineer", "Acme", &refs);

        assert_eq!(calculate_match_score(&job, &skills(&["skill-0"])), 3.12);
        assert_eq!(
            calculate_match_score(&job, &skills(&["skill-0", "skill-1", "skill-2"])),
            9.38
        );
    }

    #[test]
    fn test_no_required_skills_scores_zero() {
        let job = JobPosting::new("Engineer", "Acme", &[]);
        assert_eq!(calculate_match_score(&job, &skills(&["Python"])), 0.0);
        assert_eq!(calculate_match_score(&job, &[]), 0.0);
    }

    #[test]
    fn test_full_overlap_is_100() {
        let job = JobPosting::new("Engineer", "Acme", &["Rust", "SQL"]);
        assert_eq!(
            calculate_match_score(&job, &skills(&["SQL", "Rust", "Go"])),
            100.0
        );
    }

    #[test]
    fn test_comparison_is_exact() {
        let job = JobPosting::new("Engineer", "Acme", &["Python"]);
        assert_eq!(calculate_match_score(&job, &skills(&["python"])), 0.0);
    }

    #[test]
    fn test_duplicate_required_skills_count_once() {
        let job = JobPosting::new("Engineer", "Acme", &["Rust", "Rust", "Go"]);
        assert_eq!(calculate_match_score(&job, &skills(&["Rust"])), 50.0);
    }

    #[test]
    fn test_superset_never_lowers_score() {
        let job = JobPosting::new("Engineer", "Acme", &["Rust", "SQL", "AWS", "Kafka"]);
        let pool = ["Go", "Rust", "Java", "SQL", "AWS", "Kafka"];
        let mut previous = 0.0;
        for n in 0..=pool.len() {
            let score = calculate_match_score(&job, &skills(&pool[..n]));
            assert!(score >= previous, "{score} < {previous} after {n} skills");
            previous = score;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_matching_skills_in_job_order() {
        let job = JobPosting::new("Engineer", "Acme", &["AWS", "Python", "SQL"]);
        assert_eq!(
            matching_skills(&job, &skills(&["SQL", "AWS"])),
            vec!["AWS".to_string(), "SQL".to_string()]
        );
    }

    #[test]
    fn test_rank_sorts_desc_with_title_tiebreak() {
        let jobs = vec![
            JobPosting::new("Zeta Engineer", "Acme", &["Rust"]),
            JobPosting::new("Alpha Engineer", "Initech", &["Rust"]),
            JobPosting::new("Generalist", "Acme", &[]),
            JobPosting::new("Beta Engineer", "Acme", &["Rust", "Go"]),
            JobPosting::new("Alpha Engineer", "Acme", &["Rust"]),
        ];
        let ranked = rank_jobs(jobs, &skills(&["Rust"]));
        let order: Vec<(&str, &str, f64)> = ranked
            .iter()
            .map(|j| (j.title.as_str(), j.company.as_str(), j.score()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Alpha Engineer", "Acme", 100.0),
                ("Alpha Engineer", "Initech", 100.0),
                ("Zeta Engineer", "Acme", 100.0),
                ("Beta Engineer", "Acme", 50.0),
                ("Generalist", "Acme", 0.0),
            ]
        );
        assert!(ranked.iter().all(|j| j.match_score.is_some()));
    }
}
