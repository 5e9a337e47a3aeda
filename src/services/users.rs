//! Registration, authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng as SaltRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        CreateUser, SignupRequest, TokenRequest, UpdateProfile, UpdateUser, User, UserClaims,
        UserQuery,
    },
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Register (or re-register) an (email, username) pair and mail a fresh
    /// access code. Re-registration of the exact same pair regenerates the
    /// code; a pair colliding with an existing distinct record is a conflict.
    pub async fn signup(&self, request: &SignupRequest) -> AppResult<User> {
        if self
            .repository
            .users
            .email_bound_to_other(&request.email, &request.username)
            .await?
        {
            return Err(AppError::Validation("Email is already taken.".to_string()));
        }
        if self
            .repository
            .users
            .username_bound_to_other(&request.username, &request.email)
            .await?
        {
            return Err(AppError::Validation("Username is already taken.".to_string()));
        }

        let access_code = generate_access_code(self.config.access_code_length);
        let code_hash = hash_access_code(&access_code)?;

        let (user, created) = self
            .repository
            .users
            .get_or_create(&request.email, &request.username)
            .await?;
        self.repository
            .users
            .set_access_code(user.id, &code_hash)
            .await?;

        tracing::info!(
            username = %user.username,
            created,
            "Issued access code"
        );

        // Delivery failure surfaces to the caller; the stored code stays valid
        // and a retried signup mints a new one.
        self.email
            .send_access_code(&user.email, &user.username, &access_code, created)
            .await?;

        Ok(user)
    }

    /// Exchange (username, access code) for a bearer token
    pub async fn login(&self, request: &TokenRequest) -> AppResult<String> {
        let user = self
            .repository
            .users
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_access_code(&user, &request.confirmation_code)? {
            return Err(AppError::Validation(
                "Incorrect username or access_code".to_string(),
            ));
        }

        self.create_token_for_user(&user)
    }

    /// Create a JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            is_superuser: user.is_superuser,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.repository.users.get_by_username(username).await
    }

    /// Search users
    pub async fn search_users(&self, query: &UserQuery) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.search(query).await
    }

    /// Create a new user (admin surface)
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if self
            .repository
            .users
            .username_exists(&user.username, None)
            .await?
        {
            return Err(AppError::Validation("Username is already taken.".to_string()));
        }
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Validation("Email is already taken.".to_string()));
        }

        self.repository.users.create(&user).await
    }

    /// Update an existing user (admin surface; role writable)
    pub async fn update_user(&self, username: &str, update: UpdateUser) -> AppResult<User> {
        let user = self.repository.users.get_by_username(username).await?;

        if let Some(ref new_username) = update.username {
            if self
                .repository
                .users
                .username_exists(new_username, Some(user.id))
                .await?
            {
                return Err(AppError::Validation("Username is already taken.".to_string()));
            }
        }
        if let Some(ref new_email) = update.email {
            if self
                .repository
                .users
                .email_exists(new_email, Some(user.id))
                .await?
            {
                return Err(AppError::Validation("Email is already taken.".to_string()));
            }
        }

        self.repository.users.update(user.id, &update).await
    }

    /// Delete a user by username (admin surface)
    pub async fn delete_user(&self, username: &str) -> AppResult<()> {
        let user = self.repository.users.get_by_username(username).await?;
        self.repository.users.delete(user.id).await
    }

    /// Update the caller's own profile; the role field is not reachable here
    pub async fn update_profile(&self, user_id: i32, profile: UpdateProfile) -> AppResult<User> {
        if let Some(ref new_username) = profile.username {
            if self
                .repository
                .users
                .username_exists(new_username, Some(user_id))
                .await?
            {
                return Err(AppError::Validation("Username is already taken.".to_string()));
            }
        }
        if let Some(ref new_email) = profile.email {
            if self
                .repository
                .users
                .email_exists(new_email, Some(user_id))
                .await?
            {
                return Err(AppError::Validation("Email is already taken.".to_string()));
            }
        }

        self.repository.users.update_profile(user_id, &profile).await
    }
}

/// Generate a random alphanumeric access code from the OS entropy source
pub fn generate_access_code(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Hash an access code using Argon2
pub fn hash_access_code(access_code: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut SaltRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(access_code.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash access code: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a supplied access code against the stored hash. A user that never
/// completed signup has no stored code and always fails.
pub fn verify_access_code(user: &User, access_code: &str) -> AppResult<bool> {
    let Some(ref hash) = user.access_code else {
        return Ok(false);
    };
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid access code hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(access_code.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn user_with_code(hash: Option<String>) -> User {
        User {
            id: 1,
            username: "critic".to_string(),
            email: "critic@example.com".to_string(),
            first_name: None,
            last_name: None,
            role: Role::User,
            bio: None,
            access_code: hash,
            is_superuser: false,
        }
    }

    #[test]
    fn access_code_is_alphanumeric_with_requested_length() {
        let code = generate_access_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        // Two consecutive codes colliding would be astronomically unlikely
        assert_ne!(code, generate_access_code(8));
    }

    #[test]
    fn access_code_round_trip() {
        let code = generate_access_code(8);
        let hash = hash_access_code(&code).unwrap();
        assert_ne!(hash, code);

        let user = user_with_code(Some(hash));
        assert!(verify_access_code(&user, &code).unwrap());
        assert!(!verify_access_code(&user, "wrong000").unwrap());
    }

    #[test]
    fn missing_code_never_verifies() {
        let user = user_with_code(None);
        assert!(!verify_access_code(&user, "anything").unwrap());
    }
}
