use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::forms::{ApplicationForm, StatusUpdateForm};
use crate::applications::store::{
    applications_for_job, has_applied, insert_application, update_status, InsertOutcome,
    NewApplication,
};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::extract::JsonForm;
use crate::jobs::ownership::{load_owned_job, not_found};
use crate::jobs::store::get_job;
use crate::models::application::{ApplicationRow, ApplicationStatus, ReceivedApplication};
use crate::models::job::JobRow;
use crate::multipart::MultipartForm;
use crate::notice::Notice;
use crate::profiles::store::fetch_or_create_profile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApplyFormView {
    pub job: JobRow,
    /// Prefill values taken from the applicant's profile.
    pub skills: Option<String>,
    pub resume_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationSubmitted {
    pub application: ApplicationRow,
    #[serde(flatten)]
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct ManageApplicationsView {
    pub job: JobRow,
    pub applications: Vec<ReceivedApplication>,
    pub statuses: [ApplicationStatus; 4],
}

fn already_applied() -> Notice {
    Notice::info("You have already applied for this job.", "/")
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /apply/:id
pub async fn handle_apply_form(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let job = get_job(&state.db, job_id).await?.ok_or_else(|| not_found(job_id))?;

    if has_applied(&state.db, caller.user_id, job_id).await? {
        return Ok(Json(already_applied()).into_response());
    }

    let profile = fetch_or_create_profile(&state.db, &caller).await?;
    Ok(Json(ApplyFormView {
        job,
        skills: profile.skills,
        resume_key: profile.resume_key,
    })
    .into_response())
}

/// POST /apply/:id (multipart/form-data)
///
/// A repeated application is not an error: the caller gets an informational
/// notice and nothing is written.
pub async fn handle_apply(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    get_job(&state.db, job_id).await?.ok_or_else(|| not_found(job_id))?;

    if has_applied(&state.db, caller.user_id, job_id).await? {
        return Ok(Json(already_applied()).into_response());
    }

    let profile = fetch_or_create_profile(&state.db, &caller).await?;
    let form = ApplicationForm::from_multipart(MultipartForm::read(multipart).await?);

    let resume_key = match (&form.resume, &profile.resume_key) {
        (Some(upload), _) => Some(
            state
                .resumes
                .put_application_resume(job_id, caller.user_id, upload)
                .await?,
        ),
        (None, Some(profile_key)) => Some(
            state
                .resumes
                .snapshot_for_application(profile_key, job_id, caller.user_id)
                .await?,
        ),
        (None, None) => None,
    };

    let new = NewApplication {
        jobseeker_id: caller.user_id,
        job_id,
        skills: form.skills_snapshot(&profile),
        resume_key: resume_key.clone(),
        cover_letter: form.cover_letter(),
    };

    let outcome = insert_application(&state.db, &new).await;
    let outcome = state
        .resumes
        .release_on_error(resume_key.as_deref(), outcome)
        .await?;

    match outcome {
        InsertOutcome::Created(application) => {
            info!(
                "'{}' applied to job {job_id} (application {})",
                caller.username, application.id
            );
            Ok((
                StatusCode::CREATED,
                Json(ApplicationSubmitted {
                    application,
                    notice: Notice::success("Application submitted successfully!", "/"),
                }),
            )
                .into_response())
        }
        InsertOutcome::AlreadyApplied => {
            warn!(
                "Concurrent duplicate application by '{}' to job {job_id}",
                caller.username
            );
            if let Some(key) = resume_key {
                state.resumes.discard(&key).await;
            }
            Ok(Json(already_applied()).into_response())
        }
        InsertOutcome::JobMissing => {
            if let Some(key) = resume_key {
                state.resumes.discard(&key).await;
            }
            Err(not_found(job_id))
        }
    }
}

/// GET /manage-applications/:id
pub async fn handle_list_applications(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ManageApplicationsView>, AppError> {
    let job = load_owned_job(&state.db, job_id, &caller).await?;
    let applications = applications_for_job(&state.db, job_id).await?;

    Ok(Json(ManageApplicationsView {
        job,
        applications,
        statuses: ApplicationStatus::ALL,
    }))
}

/// POST /manage-applications/:id
///
/// Body: `{ "application_id": "...", "status": "shortlisted" }`.
pub async fn handle_update_status(
    State(state): State<AppState>,
    caller: Caller,
    Path(job_id): Path<Uuid>,
    JsonForm(form): JsonForm<StatusUpdateForm>,
) -> Result<Json<Notice>, AppError> {
    load_owned_job(&state.db, job_id, &caller).await?;
    let update = form.clean()?;

    let application = update_status(&state.db, job_id, update.application_id, update.status)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Application {} not found", update.application_id))
        })?;

    info!(
        "Application {} for job {job_id} set to {}",
        application.id, update.status
    );

    Ok(Json(Notice::success(
        format!("Application status updated to {}.", update.status),
        format!("/manage-applications/{job_id}"),
    )))
}
