use sqlx::PgPool;
use tracing::info;

use crate::auth::{self, AuthConfig};
use crate::db;
use crate::errors::AppError;
use crate::models::User;

pub async fn register(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password cannot be empty".into(),
        ));
    }

    let password_hash = auth::hash_password(password)?;
    let user = db::user_queries::insert(pool, User::new(username.to_string(), password_hash))
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict(format!("Username '{}' already exists", username))
            }
            other => other,
        })?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}

pub async fn login(
    pool: &PgPool,
    auth_config: &AuthConfig,
    username: &str,
    password: &str,
) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password cannot be empty".into(),
        ));
    }

    // Same rejection for unknown user and bad password
    let user = db::user_queries::fetch_by_username(pool, username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !auth::verify_password(password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    auth::issue_token(auth_config, user.id)
}
