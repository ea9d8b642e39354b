use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::applications::store::{applied_job_ids, has_applied};
use crate::auth::{Caller, MaybeCaller};
use crate::errors::AppError;
use crate::extract::JsonForm;
use crate::jobs::forms::JobForm;
use crate::jobs::ownership::{load_owned_job, not_found};
use crate::jobs::search::SearchParams;
use crate::jobs::store::{
    count_applications, delete_owned_job, get_job, insert_job, search_jobs, update_owned_job,
};
use crate::models::job::{JobCategory, JobRow};
use crate::notice::Notice;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// A job as shown in lists and on its detail page.
///
/// `applied` is only present for a signed-in jobseeker.
#[derive(Debug, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: JobRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobListing>,
    pub query: Option<String>,
    pub category: Option<String>,
    pub categories: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub listing: JobListing,
    pub is_owner: bool,
}

#[derive(Debug, Serialize)]
pub struct JobPostedResponse {
    pub job: JobRow,
    pub redirect: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DeleteJobView {
    pub job: JobRow,
    pub application_count: i64,
}

fn category_choices() -> Vec<Value> {
    JobCategory::ALL
        .iter()
        .map(|c| json!({ "value": c.as_str(), "label": c.label() }))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Public list and detail
// ────────────────────────────────────────────────────────────────────────────

/// GET /?query=...&category=...
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    Query(params): Query<SearchParams>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = search_jobs(&state.db, &params.to_search()).await?;

    let applied = match caller.as_ref().filter(|c| c.is_jobseeker()) {
        Some(caller) => Some(applied_job_ids(&state.db, caller.user_id).await?),
        None => None,
    };

    let jobs = jobs
        .into_iter()
        .map(|job| JobListing {
            applied: applied.as_ref().map(|ids| ids.contains(&job.id)),
            job,
        })
        .collect();

    Ok(Json(JobListResponse {
        jobs,
        query: params.query,
        category: params.category,
        categories: category_choices(),
    }))
}

/// GET /job/:id
pub async fn handle_job_detail(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let job = get_job(&state.db, job_id).await?.ok_or_else(|| not_found(job_id))?;

    let applied = if caller.is_jobseeker() {
        Some(has_applied(&state.db, caller.user_id, job_id).await?)
    } else {
        None
    };
    let is_owner = job.recruiter_id == caller.user_id;

    Ok(Json(JobDetailResponse {
        listing: JobListing { job, applied },
        is_owner,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter pages
// ────────────────────────────────────────────────────────────────────────────

/// GET /post-job
pub async fn handle_post_job_form(caller: Caller) -> Json<Value> {
    Json(json!({
        "can_post": caller.is_recruiter(),
        "categories": category_choices(),
    }))
}

/// POST /post-job
///
/// The recruiter is always the caller, whatever the body says.
pub async fn handle_post_job(
    State(state): State<AppState>,
    caller: Caller,
    JsonForm(form): JsonForm<JobForm>,
) -> Result<(StatusCode, Json<JobPostedResponse>), AppError> {
    if !caller.is_recruiter() {
        return Err(AppError::Forbidden(
            "Only recruiters can post jobs".to_string(),
        ));
    }

    let draft = form.clean()?;
    let job = insert_job(&state.db, caller.user_id, &draft).await?;
    info!("'{}' posted job {} ({})", caller.username, job.id, job.title);

    Ok((
        StatusCode::CREATED,
        Json(JobPostedResponse {
            job,
            redirect: "/dashboard",
        }),
    ))
}

/// GET /edit-job/:id
pub async fn handle_edit_job_form(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = load_owned_job(&state.db, job_id, &caller).await?;
    Ok(Json(json!({
        "job": job,
        "categories": category_choices(),
    })))
}

/// POST /edit-job/:id
pub async fn handle_edit_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
    JsonForm(form): JsonForm<JobForm>,
) -> Result<Json<Notice>, AppError> {
    load_owned_job(&state.db, job_id, &caller).await?;
    let draft = form.clean()?;

    // Guarded again in SQL: ownership cannot change between the check and the write.
    update_owned_job(&state.db, job_id, caller.user_id, &draft)
        .await?
        .ok_or_else(|| not_found(job_id))?;
    info!("'{}' updated job {job_id}", caller.username);

    Ok(Json(Notice::success("Job updated successfully!", "/dashboard")))
}

/// GET /delete-job/:id
pub async fn handle_delete_job_confirm(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<DeleteJobView>, AppError> {
    let job = load_owned_job(&state.db, job_id, &caller).await?;
    let application_count = count_applications(&state.db, job_id).await?;
    Ok(Json(DeleteJobView {
        job,
        application_count,
    }))
}

/// POST /delete-job/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Notice>, AppError> {
    delete_owned_job(&state.db, job_id, caller.user_id)
        .await?
        .ok_or_else(|| not_found(job_id))?;
    info!("'{}' deleted job {job_id}", caller.username);

    Ok(Json(Notice::success("Job deleted successfully!", "/dashboard")))
}
