use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

pub async fn insert(pool: &PgPool, user: User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, password_hash, created_at)
         VALUES ($1, $2, $3, $4)
         RETURNING id, username, password_hash, created_at",
    )
    .bind(user.id)
    .bind(user.username)
    .bind(user.password_hash)
    .bind(user.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at
         FROM users
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
