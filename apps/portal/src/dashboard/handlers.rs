use axum::{extract::State, Json};
use serde::Serialize;

use crate::applications::store::{applied_job_ids, applications_by_jobseeker};
use crate::auth::Caller;
use crate::dashboard::matching::{match_jobs, parse_skills};
use crate::errors::AppError;
use crate::jobs::store::{all_jobs, jobs_for_recruiter};
use crate::models::application::SubmittedApplication;
use crate::models::job::{JobRow, JobWithCount};
use crate::models::user::{ProfileRow, UserType};
use crate::profiles::store::fetch_or_create_profile;
use crate::state::AppState;

/// The dashboard body, tagged by the caller's role.
#[derive(Debug, Serialize)]
#[serde(tag = "user_type", rename_all = "lowercase")]
pub enum DashboardResponse {
    Recruiter {
        profile: ProfileRow,
        jobs: Vec<JobWithCount>,
    },
    Jobseeker {
        profile: ProfileRow,
        applications: Vec<SubmittedApplication>,
        matched_jobs: Vec<JobRow>,
    },
}

/// GET /dashboard
///
/// The role is read from the profile, which is created on first visit when missing.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = fetch_or_create_profile(&state.db, &caller).await?;

    if profile.kind() == Some(UserType::Recruiter) {
        let jobs = jobs_for_recruiter(&state.db, caller.user_id).await?;
        return Ok(Json(DashboardResponse::Recruiter { profile, jobs }));
    }

    let applications = applications_by_jobseeker(&state.db, caller.user_id).await?;
    let skills = parse_skills(profile.skills.as_deref());
    let matched_jobs = if skills.is_empty() {
        Vec::new()
    } else {
        let corpus = all_jobs(&state.db).await?;
        let applied = applied_job_ids(&state.db, caller.user_id).await?;
        match_jobs(&skills, &corpus, &applied)
            .into_iter()
            .cloned()
            .collect()
    };

    Ok(Json(DashboardResponse::Jobseeker {
        profile,
        applications,
        matched_jobs,
    }))
}
