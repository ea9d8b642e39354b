use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::auth::accounts::{create_account, find_by_username, username_taken};
use crate::auth::forms::{LoginForm, RegisterForm};
use crate::auth::password::{hash_password_blocking, verify_login};
use crate::auth::session::{
    create_session, delete_session, expired_session_cookie, purge_expired, session_cookie,
    SESSION_COOKIE,
};
use crate::auth::MaybeCaller;
use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::extract::JsonForm;
use crate::forms::FieldErrors;
use crate::models::user::{User, UserType};
use crate::notice::Notice;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub redirect: &'static str,
}

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

/// GET /register
pub async fn handle_register_form(MaybeCaller(caller): MaybeCaller) -> Json<Value> {
    let user_types: Vec<Value> = UserType::ALL
        .iter()
        .map(|t| json!({ "value": t.as_str(), "label": t.label() }))
        .collect();
    Json(json!({
        "authenticated": caller.is_some(),
        "user_types": user_types,
    }))
}

/// POST /register
///
/// Creates the account and its profile, signs the new user in and points them
/// at profile completion.
pub async fn handle_register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonForm(form): JsonForm<RegisterForm>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let registration = form.clean()?;

    if username_taken(&state.db, &registration.username).await? {
        return Err(FieldErrors::single("username", DUPLICATE_USERNAME).into());
    }

    let password_hash = hash_password_blocking(registration.password.clone()).await?;

    let mut tx = state.db.begin().await?;
    let user = match create_account(&mut *tx, &registration, &password_hash).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            return Err(FieldErrors::single("username", DUPLICATE_USERNAME).into());
        }
        Err(e) => return Err(e.into()),
    };
    let token = create_session(&mut *tx, user.id, state.config.session_ttl_hours).await?;
    tx.commit().await?;

    info!(
        "Registered {} '{}' ({})",
        registration.user_type, user.username, user.id
    );

    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user,
            redirect: "/profile",
        }),
    ))
}

/// GET /login
pub async fn handle_login_form(MaybeCaller(caller): MaybeCaller) -> Json<Value> {
    Json(json!({
        "authenticated": caller.is_some(),
        "username": caller.map(|c| c.username),
    }))
}

/// POST /login
///
/// Any failure is reported as the same generic error, whichever field was wrong.
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonForm(form): JsonForm<LoginForm>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let username = form.username.trim();
    let user = find_by_username(&state.db, username).await?;

    // Unknown usernames still pay for a hash check, so timing does not tell them apart.
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_login(form.password, stored_hash).await?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!("Login failed: wrong password for '{}'", user.username);
            return Err(AppError::InvalidCredentials);
        }
        None => {
            warn!("Login failed: unknown username '{username}'");
            return Err(AppError::InvalidCredentials);
        }
    };

    purge_expired(&state.db, user.id).await?;
    let token = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("User '{}' signed in", user.username);

    let jar = jar.add(session_cookie(token, state.config.cookie_secure));
    Ok((jar, Json(AuthResponse { user, redirect: "/" })))
}

/// GET|POST /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Notice>), AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .and_then(|c| c.value().parse().ok());
    if let Some(token) = token {
        delete_session(&state.db, token).await?;
    }

    let jar = jar.remove(expired_session_cookie());
    Ok((jar, Json(Notice::info("You have been logged out.", "/login"))))
}
