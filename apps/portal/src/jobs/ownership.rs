use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::jobs::store::get_job;
use crate::models::job::JobRow;

/// Passes the job through only when `caller` is its recruiter.
///
/// Anyone else gets the same `NotFound` as for a job that does not exist,
/// so other users cannot probe which job ids are taken.
pub fn ensure_owner(job: Option<JobRow>, job_id: Uuid, caller: &Caller) -> Result<JobRow, AppError> {
    match job {
        Some(job) if job.recruiter_id == caller.user_id => Ok(job),
        _ => Err(not_found(job_id)),
    }
}

/// Loads a job for one of its owner-only pages.
pub async fn load_owned_job(pool: &PgPool, job_id: Uuid, caller: &Caller) -> Result<JobRow, AppError> {
    let job = get_job(pool, job_id).await?;
    ensure_owner(job, job_id, caller)
}

pub fn not_found(job_id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {job_id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserType;
    use chrono::Utc;

    fn job_owned_by(recruiter_id: Uuid) -> JobRow {
        JobRow {
            id: Uuid::new_v4(),
            recruiter_id,
            title: "Data Analyst".to_string(),
            number_of_openings: 1,
            category: "finance".to_string(),
            description: "Spreadsheets".to_string(),
            skills_required: "sql, excel".to_string(),
            created_at: Utc::now(),
        }
    }

    fn recruiter(user_id: Uuid) -> Caller {
        Caller {
            user_id,
            username: "recruiter".to_string(),
            user_type: Some(UserType::Recruiter),
        }
    }

    #[test]
    fn test_owner_gets_job() {
        let owner = Uuid::new_v4();
        let job = job_owned_by(owner);
        let id = job.id;
        let loaded = ensure_owner(Some(job), id, &recruiter(owner)).unwrap();
        assert_eq!(loaded.id, id);
    }

    #[test]
    fn test_other_recruiter_sees_not_found() {
        let job = job_owned_by(Uuid::new_v4());
        let id = job.id;
        let err = ensure_owner(Some(job), id, &recruiter(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_missing_and_foreign_jobs_are_indistinguishable() {
        let job = job_owned_by(Uuid::new_v4());
        let id = job.id;
        let caller = recruiter(Uuid::new_v4());
        let foreign = ensure_owner(Some(job), id, &caller).unwrap_err();
        let missing = ensure_owner(None, id, &caller).unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
    }
}
