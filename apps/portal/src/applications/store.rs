use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{is_foreign_key_violation, is_unique_violation};
use crate::models::application::{
    ApplicationRow, ApplicationStatus, ReceivedApplication, SubmittedApplication,
};

/// Values stored with a new application. Jobseeker and job come from the
/// session and the URL, never from the submitted form.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub jobseeker_id: Uuid,
    pub job_id: Uuid,
    pub skills: Option<String>,
    pub resume_key: Option<String>,
    pub cover_letter: Option<String>,
}

#[derive(Debug)]
pub enum InsertOutcome {
    Created(ApplicationRow),
    /// The (jobseeker, job) pair already has an application; nothing was written.
    AlreadyApplied,
    /// The job was deleted before the insert; nothing was written.
    JobMissing,
}

pub async fn has_applied(pool: &PgPool, jobseeker_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE jobseeker_id = $1 AND job_id = $2)",
    )
    .bind(jobseeker_id)
    .bind(job_id)
    .fetch_one(pool)
    .await
}

pub async fn applied_job_ids(pool: &PgPool, jobseeker_id: Uuid) -> Result<HashSet<Uuid>, sqlx::Error> {
    let ids: Vec<Uuid> = sqlx::query_scalar("SELECT job_id FROM applications WHERE jobseeker_id = $1")
        .bind(jobseeker_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Inserts an application with status `pending`.
///
/// The unique (jobseeker, job) constraint settles concurrent submissions:
/// the losing insert reports `AlreadyApplied` instead of an error.
pub async fn insert_application(pool: &PgPool, new: &NewApplication) -> Result<InsertOutcome, sqlx::Error> {
    let result = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (jobseeker_id, job_id, status, skills, resume_key, cover_letter)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(new.jobseeker_id)
    .bind(new.job_id)
    .bind(ApplicationStatus::Pending.as_str())
    .bind(new.skills.as_deref())
    .bind(new.resume_key.as_deref())
    .bind(new.cover_letter.as_deref())
    .fetch_one(pool)
    .await;

    match result {
        Ok(row) => Ok(InsertOutcome::Created(row)),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyApplied),
        Err(e) if is_foreign_key_violation(&e) => Ok(InsertOutcome::JobMissing),
        Err(e) => Err(e),
    }
}

/// A jobseeker's applications with the title of each job, newest first.
pub async fn applications_by_jobseeker(
    pool: &PgPool,
    jobseeker_id: Uuid,
) -> Result<Vec<SubmittedApplication>, sqlx::Error> {
    sqlx::query_as::<_, SubmittedApplication>(
        r#"
        SELECT a.*, j.title AS job_title
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.jobseeker_id = $1
        ORDER BY a.applied_at DESC, a.id
        "#,
    )
    .bind(jobseeker_id)
    .fetch_all(pool)
    .await
}

/// All applications to one job, with who sent them, oldest first.
pub async fn applications_for_job(pool: &PgPool, job_id: Uuid) -> Result<Vec<ReceivedApplication>, sqlx::Error> {
    sqlx::query_as::<_, ReceivedApplication>(
        r#"
        SELECT a.*, u.username AS applicant_username, p.display_name AS applicant_display_name
        FROM applications a
        JOIN users u ON u.id = a.jobseeker_id
        LEFT JOIN profiles p ON p.user_id = a.jobseeker_id
        WHERE a.job_id = $1
        ORDER BY a.applied_at, a.id
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Sets the status of an application that belongs to `job_id`.
/// Returns `None` when no such application exists for that job.
pub async fn update_status(
    pool: &PgPool,
    job_id: Uuid,
    application_id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "UPDATE applications SET status = $3 WHERE id = $1 AND job_id = $2 RETURNING *",
    )
    .bind(application_id)
    .bind(job_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fixture(pool: &PgPool) -> (Uuid, Uuid) {
        let recruiter: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ('rec', 'r@x.io', 'x') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        let seeker: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ('see', 's@x.io', 'x') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        let job: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO jobs (recruiter_id, title, number_of_openings, category, description, skills_required)
            VALUES ($1, 'Dev', 1, 'tech', 'Write code', 'rust')
            RETURNING id
            "#,
        )
        .bind(recruiter)
        .fetch_one(pool)
        .await
        .unwrap();
        (seeker, job)
    }

    fn new_application(jobseeker_id: Uuid, job_id: Uuid) -> NewApplication {
        NewApplication {
            jobseeker_id,
            job_id,
            skills: Some("rust".to_string()),
            resume_key: None,
            cover_letter: None,
        }
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_second_application_is_a_no_op(pool: PgPool) {
        let (seeker, job) = fixture(&pool).await;

        let first = insert_application(&pool, &new_application(seeker, job))
            .await
            .unwrap();
        let InsertOutcome::Created(row) = first else {
            panic!("first application should be created");
        };
        assert_eq!(row.status, "pending");

        let second = insert_application(&pool, &new_application(seeker, job))
            .await
            .unwrap();
        assert!(matches!(second, InsertOutcome::AlreadyApplied));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(has_applied(&pool, seeker, job).await.unwrap());
        assert!(applied_job_ids(&pool, seeker).await.unwrap().contains(&job));
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_application_to_deleted_job_reports_job_missing(pool: PgPool) {
        let (seeker, job) = fixture(&pool).await;
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job)
            .execute(&pool)
            .await
            .unwrap();

        let outcome = insert_application(&pool, &new_application(seeker, job))
            .await
            .unwrap();
        assert!(matches!(outcome, InsertOutcome::JobMissing));
        assert!(!has_applied(&pool, seeker, job).await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_status_update_scoped_to_job(pool: PgPool) {
        let (seeker, job) = fixture(&pool).await;
        let InsertOutcome::Created(row) = insert_application(&pool, &new_application(seeker, job))
            .await
            .unwrap()
        else {
            panic!("application should be created");
        };

        let wrong_job = update_status(&pool, Uuid::new_v4(), row.id, ApplicationStatus::Selected)
            .await
            .unwrap();
        assert!(wrong_job.is_none());

        let updated = update_status(&pool, job, row.id, ApplicationStatus::Shortlisted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "shortlisted");

        let listed = applications_for_job(&pool, job).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].applicant_username, "see");
        assert_eq!(listed[0].applicant_display_name, None);
    }
}
