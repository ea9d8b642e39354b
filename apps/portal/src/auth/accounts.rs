use sqlx::{PgConnection, PgPool};

use crate::auth::forms::Registration;
use crate::models::user::User;

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn username_taken(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

/// Inserts the identity record and its linked profile.
/// Runs on the caller's connection so registration can wrap it in a transaction.
pub async fn create_account(
    conn: &mut PgConnection,
    registration: &Registration,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(&registration.username)
    .bind(&registration.email)
    .bind(password_hash)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("INSERT INTO profiles (user_id, display_name, user_type) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(&registration.display_name)
        .bind(registration.user_type.as_str())
        .execute(&mut *conn)
        .await?;

    Ok(user)
}
