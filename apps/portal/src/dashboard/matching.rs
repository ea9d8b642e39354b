//! Skill matching for the jobseeker dashboard.
//!
//! Deliberately naive: a job matches when its `skills_required` text contains
//! any of the jobseeker's skills as a case-insensitive substring. "go" matches
//! "mongodb", and that is accepted behaviour.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::job::JobRow;

/// Upper bound on the matched jobs shown on a dashboard.
pub const MAX_MATCHED_JOBS: usize = 10;

/// Splits a comma-separated skills field into lower-cased tokens.
/// Blank tokens are dropped, so `"rust,,"` yields just `["rust"]`.
pub fn parse_skills(skills: Option<&str>) -> Vec<String> {
    skills
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Jobs from `corpus` whose required skills mention any of `skills`.
///
/// Jobs in `applied` are skipped. Corpus order is kept and the result is
/// capped at [`MAX_MATCHED_JOBS`].
pub fn match_jobs<'a>(
    skills: &[String],
    corpus: &'a [JobRow],
    applied: &HashSet<Uuid>,
) -> Vec<&'a JobRow> {
    if skills.is_empty() {
        return Vec::new();
    }

    corpus
        .iter()
        .filter(|job| !applied.contains(&job.id))
        .filter(|job| {
            let required = job.skills_required.to_lowercase();
            skills.iter().any(|skill| required.contains(skill.as_str()))
        })
        .take(MAX_MATCHED_JOBS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn job(skills_required: &str) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            recruiter_id: Uuid::new_v4(),
            title: format!("Needs {skills_required}"),
            number_of_openings: 1,
            category: "tech".to_string(),
            description: String::new(),
            skills_required: skills_required.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_skills_trims_and_lowercases() {
        assert_eq!(parse_skills(Some(" Rust , GO,,")), vec!["rust", "go"]);
        assert!(parse_skills(Some("")).is_empty());
        assert!(parse_skills(Some(" , ")).is_empty());
        assert!(parse_skills(None).is_empty());
    }

    #[test]
    fn test_substring_match_is_intentional() {
        let corpus = vec![job("mongodb,python")];
        let skills = parse_skills(Some("go,rust"));
        let matched = match_jobs(&skills, &corpus, &HashSet::new());
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let corpus = vec![job("Kubernetes, RUST")];
        let skills = parse_skills(Some("rust"));
        assert_eq!(match_jobs(&skills, &corpus, &HashSet::new()).len(), 1);
    }

    #[test]
    fn test_empty_skills_match_nothing() {
        let corpus = vec![job("rust"), job("anything")];
        assert!(match_jobs(&parse_skills(Some("")), &corpus, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_applied_jobs_are_excluded() {
        let corpus = vec![job("rust"), job("rust, go")];
        let applied: HashSet<Uuid> = [corpus[0].id].into_iter().collect();
        let matched = match_jobs(&parse_skills(Some("rust")), &corpus, &applied);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, corpus[1].id);
    }

    #[test]
    fn test_results_are_capped_in_corpus_order() {
        let corpus: Vec<JobRow> = (0..15).map(|_| job("rust")).collect();
        let matched = match_jobs(&parse_skills(Some("rust")), &corpus, &HashSet::new());
        assert_eq!(matched.len(), MAX_MATCHED_JOBS);
        let expected: Vec<Uuid> = corpus.iter().take(MAX_MATCHED_JOBS).map(|j| j.id).collect();
        let got: Vec<Uuid> = matched.iter().map(|j| j.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_non_matching_jobs_are_skipped() {
        let corpus = vec![job("excel"), job("java")];
        assert!(match_jobs(&parse_skills(Some("rust")), &corpus, &HashSet::new()).is_empty());
    }
}
