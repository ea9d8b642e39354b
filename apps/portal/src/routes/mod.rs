pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route(
            "/register",
            get(auth::handle_register_form).post(auth::handle_register),
        )
        .route("/login", get(auth::handle_login_form).post(auth::handle_login))
        .route("/logout", get(auth::handle_logout).post(auth::handle_logout))
        .route(
            "/profile",
            get(profiles::handle_get_profile).post(profiles::handle_update_profile),
        )
        .route("/dashboard", get(dashboard::handle_dashboard))
        // Jobs
        .route("/", get(jobs::handle_list_jobs))
        .route("/job/:id", get(jobs::handle_job_detail))
        .route(
            "/post-job",
            get(jobs::handle_post_job_form).post(jobs::handle_post_job),
        )
        .route(
            "/edit-job/:id",
            get(jobs::handle_edit_job_form).post(jobs::handle_edit_job),
        )
        .route(
            "/delete-job/:id",
            get(jobs::handle_delete_job_confirm).post(jobs::handle_delete_job),
        )
        // Applications
        .route(
            "/apply/:id",
            get(applications::handle_apply_form).post(applications::handle_apply),
        )
        .route(
            "/manage-applications/:id",
            get(applications::handle_list_applications).post(applications::handle_update_status),
        )
        .layer(body_limit)
        .with_state(state)
}
