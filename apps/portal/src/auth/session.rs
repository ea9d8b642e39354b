use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserType;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "portal_session";

/// The signed-in user making the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub username: String,
    /// `None` only for accounts whose profile has not been created yet.
    pub user_type: Option<UserType>,
}

impl Caller {
    pub fn is_jobseeker(&self) -> bool {
        self.user_type == Some(UserType::Jobseeker)
    }

    pub fn is_recruiter(&self) -> bool {
        self.user_type == Some(UserType::Recruiter)
    }
}

/// The caller on pages that anonymous visitors may also see.
#[derive(Debug, Clone)]
pub struct MaybeCaller(pub Option<Caller>);

#[derive(FromRow)]
struct CallerRow {
    user_id: Uuid,
    username: String,
    user_type: Option<String>,
}

impl From<CallerRow> for Caller {
    fn from(row: CallerRow) -> Self {
        Caller {
            user_id: row.user_id,
            username: row.username,
            user_type: row.user_type.and_then(|t| t.parse().ok()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        resolve_session(&state.db, token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match session_token(&parts.headers) {
            Some(token) => Ok(MaybeCaller(resolve_session(&state.db, token).await?)),
            None => Ok(MaybeCaller(None)),
        }
    }
}

/// Reads the session token from the request cookies, ignoring values that are not UUIDs.
pub fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Looks up a live (unexpired) session and the identity behind it.
pub async fn resolve_session(pool: &PgPool, token: Uuid) -> Result<Option<Caller>, sqlx::Error> {
    let row: Option<CallerRow> = sqlx::query_as(
        r#"
        SELECT u.id AS user_id, u.username, p.user_type
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        LEFT JOIN profiles p ON p.user_id = u.id
        WHERE s.token = $1 AND s.expires_at > now()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Caller::from))
}

/// Starts a session for `user_id` and returns its token.
pub async fn create_session<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<Uuid, sqlx::Error> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(executor)
        .await?;

    Ok(token)
}

pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drops a user's expired sessions.
pub async fn purge_expired(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= now()")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub fn session_cookie(token: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// A cookie that, once removed from the jar, instructs the browser to drop the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
