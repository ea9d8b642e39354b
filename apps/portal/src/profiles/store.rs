use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Caller;
use crate::models::user::{ProfileRow, UserType};
use crate::profiles::forms::ProfileChanges;

/// Returns the caller's profile, creating it with defaults when it is missing.
/// Safe to call repeatedly and concurrently.
pub async fn fetch_or_create_profile(pool: &PgPool, caller: &Caller) -> Result<ProfileRow, sqlx::Error> {
    let user_type = caller.user_type.unwrap_or(UserType::Jobseeker);

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, display_name, user_type)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(caller.user_id)
    .bind(&caller.username)
    .bind(user_type.as_str())
    .execute(pool)
    .await?;

    get_profile(pool, caller.user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Applies a partial update. Fields left as `None` in `changes` keep their value;
/// `Some(None)` clears an optional field.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    changes: &ProfileChanges,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            display_name        = COALESCE($2, display_name),
            company_name        = CASE WHEN $3 THEN $4 ELSE company_name END,
            company_description = CASE WHEN $5 THEN $6 ELSE company_description END,
            skills              = CASE WHEN $7 THEN $8 ELSE skills END,
            resume_key          = CASE WHEN $9 THEN $10 ELSE resume_key END,
            updated_at          = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(changes.display_name.as_deref())
    .bind(changes.company_name.is_some())
    .bind(changes.company_name.clone().flatten())
    .bind(changes.company_description.is_some())
    .bind(changes.company_description.clone().flatten())
    .bind(changes.skills.is_some())
    .bind(changes.skills.clone().flatten())
    .bind(changes.resume_key.is_some())
    .bind(changes.resume_key.clone().flatten())
    .fetch_one(pool)
    .await
}
