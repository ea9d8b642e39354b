use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::Caller;
use crate::errors::AppError;
use crate::models::user::ProfileRow;
use crate::multipart::MultipartForm;
use crate::profiles::forms::ProfileForm;
use crate::profiles::store::{fetch_or_create_profile, update_profile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub profile: ProfileRow,
}

#[derive(Debug, Serialize)]
pub struct ProfileSavedResponse {
    pub profile: ProfileRow,
    pub redirect: &'static str,
}

/// GET /profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = fetch_or_create_profile(&state.db, &caller).await?;
    Ok(Json(ProfileResponse {
        username: caller.username,
        profile,
    }))
}

/// POST /profile (multipart/form-data)
///
/// Partial update: only submitted fields change. A `resume` file replaces the
/// stored profile resume.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    caller: Caller,
    multipart: Multipart,
) -> Result<Json<ProfileSavedResponse>, AppError> {
    fetch_or_create_profile(&state.db, &caller).await?;

    let mut form = MultipartForm::read(multipart).await?;
    let resume = form.take_file("resume");
    let mut changes = ProfileForm::from_multipart(&mut form).clean()?;

    let mut uploaded = None;
    if let Some(upload) = resume {
        let key = state
            .resumes
            .put_profile_resume(caller.user_id, &upload)
            .await?;
        changes.resume_key = Some(Some(key.clone()));
        uploaded = Some(key);
    }

    let updated = update_profile(&state.db, caller.user_id, &changes).await;
    let profile = state
        .resumes
        .release_on_error(uploaded.as_deref(), updated)
        .await?;
    info!("Profile of '{}' updated", caller.username);

    Ok(Json(ProfileSavedResponse {
        profile,
        redirect: "/dashboard",
    }))
}
