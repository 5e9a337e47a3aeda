//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateProfile, UpdateUser, User, UserQuery},
};

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, bio, access_code, is_superuser";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Find user by username, if any
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get user by username or fail with NotFound
    pub async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", username)))
    }

    /// Does another user already hold this email with a different username?
    pub async fn email_bound_to_other(&self, email: &str, username: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND username != $2)",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Does another user already hold this username with a different email?
    pub async fn username_bound_to_other(&self, username: &str, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND email != $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check if username already exists
    pub async fn username_exists(&self, username: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id != $2)",
            )
            .bind(username)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id != $2)")
                .bind(email)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Fetch the user for an exact (email, username) pair, creating it with the
    /// default role when absent. Returns the user and whether it was created.
    pub async fn get_or_create(&self, email: &str, username: &str) -> AppResult<(User, bool)> {
        let query = format!(
            "SELECT {} FROM users WHERE email = $1 AND username = $2",
            USER_COLUMNS
        );
        if let Some(user) = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok((user, false));
        }

        let insert = format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&insert)
            .bind(username)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "Username or email is already taken."))?;
        Ok((user, true))
    }

    /// Store the hashed access code for a user
    pub async fn set_access_code(&self, user_id: i32, code_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET access_code = $1 WHERE id = $2")
            .bind(code_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Search users by username substring with pagination
    pub async fn search(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        let (limit, offset) = crate::models::page_bounds(query.limit, query.offset);
        let pattern = query
            .search
            .as_deref()
            .map(|s| format!("%{}%", s))
            .unwrap_or_else(|| "%".to_string());

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username ILIKE $1")
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let select = format!(
            "SELECT {} FROM users WHERE username ILIKE $1 ORDER BY username LIMIT $2 OFFSET $3",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&select)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Create a user from the admin surface
    pub async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let insert = format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, role, bio)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&insert)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.unwrap_or_default())
            .bind(&user.bio)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "Username or email is already taken."))
    }

    /// Update a user from the admin surface; role is writable here
    pub async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<User> {
        let update = format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                role = COALESCE($6, role),
                bio = COALESCE($7, bio)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&update)
            .bind(id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role)
            .bind(&user.bio)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "Username or email is already taken."))?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Update the self-service profile fields; never touches role
    pub async fn update_profile(&self, id: i32, profile: &UpdateProfile) -> AppResult<User> {
        let update = format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&update)
            .bind(id)
            .bind(&profile.username)
            .bind(&profile.email)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.bio)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::on_unique_violation(e, "Username or email is already taken."))?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Delete a user; reviews and comments cascade at the store level
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
