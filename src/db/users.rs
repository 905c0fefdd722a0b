use crate::db::models::User;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

pub async fn create_user(pool: &SqlitePool, username: &str, secret_hash: &str) -> AppResult<User> {
    let user = User::new(username.to_string(), secret_hash.to_string());

    sqlx::query(
        "INSERT INTO users (id, username, secret_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.secret_hash)
    .bind(&user.created_at)
    .bind(&user.updated_at)
    .execute(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, user_id: &str) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::NotFound(format!("User with id '{}' not found", user_id))
            }
            _ => AppError::Database(e),
        })?;

    Ok(user)
}
