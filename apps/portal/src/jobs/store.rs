use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::jobs::forms::JobDraft;
use crate::jobs::search::JobSearch;
use crate::models::job::{JobRow, JobWithCount};

pub async fn insert_job(pool: &PgPool, recruiter_id: Uuid, draft: &JobDraft) -> Result<JobRow, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs
            (recruiter_id, title, number_of_openings, category, description, skills_required)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(recruiter_id)
    .bind(&draft.title)
    .bind(draft.number_of_openings)
    .bind(draft.category.as_str())
    .bind(&draft.description)
    .bind(&draft.skills_required)
    .fetch_one(pool)
    .await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Replaces the editable fields of a job. Returns `None` (and changes nothing)
/// unless the job exists and belongs to `recruiter_id`.
pub async fn update_owned_job(
    pool: &PgPool,
    job_id: Uuid,
    recruiter_id: Uuid,
    draft: &JobDraft,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $3, number_of_openings = $4, category = $5,
            description = $6, skills_required = $7
        WHERE id = $1 AND recruiter_id = $2
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(recruiter_id)
    .bind(&draft.title)
    .bind(draft.number_of_openings)
    .bind(draft.category.as_str())
    .bind(&draft.description)
    .bind(&draft.skills_required)
    .fetch_optional(pool)
    .await
}

/// Deletes a job and all of its applications in one transaction.
///
/// Returns the number of applications removed, or `None` when the job does not
/// exist or belongs to someone else; nothing is deleted in that case.
pub async fn delete_owned_job(
    pool: &PgPool,
    job_id: Uuid,
    recruiter_id: Uuid,
) -> Result<Option<u64>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let owned: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM jobs WHERE id = $1 AND recruiter_id = $2 FOR UPDATE")
            .bind(job_id)
            .bind(recruiter_id)
            .fetch_optional(&mut *tx)
            .await?;
    if owned.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    let applications = sqlx::query("DELETE FROM applications WHERE job_id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Deleted job {job_id} and {applications} application(s)");
    Ok(Some(applications))
}

/// Jobs matching a search, newest first. An empty search returns every job.
pub async fn search_jobs(pool: &PgPool, search: &JobSearch) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE ($1::text IS NULL
               OR title ILIKE $1
               OR description ILIKE $1
               OR skills_required ILIKE $1)
          AND ($2::text IS NULL OR category = $2)
        ORDER BY created_at DESC, id
        "#,
    )
    .bind(search.pattern.as_deref())
    .bind(search.category.as_deref())
    .fetch_all(pool)
    .await
}

/// Every job, in the same order as the public list.
pub async fn all_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    search_jobs(pool, &JobSearch::default()).await
}

/// A recruiter's own jobs with their application counts, newest first.
pub async fn jobs_for_recruiter(pool: &PgPool, recruiter_id: Uuid) -> Result<Vec<JobWithCount>, sqlx::Error> {
    sqlx::query_as::<_, JobWithCount>(
        r#"
        SELECT j.*, COUNT(a.id) AS application_count
        FROM jobs j
        LEFT JOIN applications a ON a.job_id = j.id
        WHERE j.recruiter_id = $1
        GROUP BY j.id
        ORDER BY j.created_at DESC, j.id
        "#,
    )
    .bind(recruiter_id)
    .fetch_all(pool)
    .await
}

pub async fn count_applications(pool: &PgPool, job_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
        .bind(job_id)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::search::SearchParams;
    use crate::models::job::JobCategory;

    async fn user(pool: &PgPool, username: &str, user_type: &str) -> Uuid {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'x') RETURNING id",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .fetch_one(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO profiles (user_id, display_name, user_type) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(username)
            .bind(user_type)
            .execute(pool)
            .await
            .unwrap();
        id
    }

    fn draft(title: &str, category: JobCategory, skills: &str) -> JobDraft {
        JobDraft {
            title: title.to_string(),
            number_of_openings: 1,
            category,
            description: "Join the team".to_string(),
            skills_required: skills.to_string(),
        }
    }

    async fn apply(pool: &PgPool, jobseeker: Uuid, job: Uuid) {
        sqlx::query("INSERT INTO applications (jobseeker_id, job_id) VALUES ($1, $2)")
            .bind(jobseeker)
            .bind(job)
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_delete_removes_applications(pool: PgPool) {
        let owner = user(&pool, "owner", "recruiter").await;
        let seeker = user(&pool, "seeker", "jobseeker").await;
        let job = insert_job(&pool, owner, &draft("Dev", JobCategory::Tech, "rust"))
            .await
            .unwrap();
        apply(&pool, seeker, job.id).await;

        let removed = delete_owned_job(&pool, job.id, owner).await.unwrap();
        assert_eq!(removed, Some(1));
        assert!(get_job(&pool, job.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_non_owner_cannot_update_or_delete(pool: PgPool) {
        let owner = user(&pool, "owner", "recruiter").await;
        let rival = user(&pool, "rival", "recruiter").await;
        let job = insert_job(&pool, owner, &draft("Dev", JobCategory::Tech, "rust"))
            .await
            .unwrap();

        let hijack = draft("Hijacked", JobCategory::Other, "none");
        assert!(update_owned_job(&pool, job.id, rival, &hijack)
            .await
            .unwrap()
            .is_none());
        assert_eq!(delete_owned_job(&pool, job.id, rival).await.unwrap(), None);

        let stored = get_job(&pool, job.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Dev");
        assert_eq!(stored.recruiter_id, owner);
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_search_combines_text_and_category(pool: PgPool) {
        let owner = user(&pool, "owner", "recruiter").await;
        insert_job(&pool, owner, &draft("Software Engineer", JobCategory::Tech, "go"))
            .await
            .unwrap();
        insert_job(&pool, owner, &draft("Finance Engineer", JobCategory::Finance, "excel"))
            .await
            .unwrap();
        insert_job(&pool, owner, &draft("Designer", JobCategory::Tech, "figma"))
            .await
            .unwrap();

        let params = SearchParams {
            query: Some("ENGINEER".to_string()),
            category: Some("tech".to_string()),
        };
        let found = search_jobs(&pool, &params.to_search()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Software Engineer");

        assert_eq!(all_jobs(&pool).await.unwrap().len(), 3);
    }

    #[sqlx::test]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_recruiter_dashboard_counts(pool: PgPool) {
        let owner = user(&pool, "owner", "recruiter").await;
        let seeker = user(&pool, "seeker", "jobseeker").await;
        let job = insert_job(&pool, owner, &draft("Dev", JobCategory::Tech, "rust"))
            .await
            .unwrap();
        apply(&pool, seeker, job.id).await;

        let jobs = jobs_for_recruiter(&pool, owner).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].application_count, 1);
        assert_eq!(count_applications(&pool, job.id).await.unwrap(), 1);
    }
}
