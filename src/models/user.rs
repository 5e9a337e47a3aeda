//! User model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Reserved username, used as the self-service path segment
pub const RESERVED_USERNAME: &str = "me";

/// User role slugs stored as strings in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

// SQLx conversion for Role (stored as text)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub bio: Option<String>,
    /// Hashed access code (argon2); null until first signup completes
    #[serde(skip_serializing)]
    pub access_code: Option<String>,
    #[serde(skip_serializing)]
    pub is_superuser: bool,
}

/// Rejects the reserved `me` username
pub fn username_not_reserved(username: &str) -> Result<(), ValidationError> {
    if username == RESERVED_USERNAME {
        return Err(ValidationError::new("reserved_username")
            .with_message("Not allowed to use \"me\" as username".into()));
    }
    Ok(())
}

/// Signup request: issues (or renews) an emailed access code
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = username_not_reserved)
    )]
    pub username: String,
}

/// Signup response echoes the registered pair
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub email: String,
    pub username: String,
}

/// Token request exchanging (username, access code) for a JWT
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Confirmation code is required"))]
    pub confirmation_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access: String,
}

/// Create user request (admin panel)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = username_not_reserved)
    )]
    pub username: String,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
}

/// Update user request (admin panel; role is writable here)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = username_not_reserved)
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub bio: Option<String>,
}

/// Update own profile request. Carries no role field: the self-service path
/// cannot escalate privileges.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        custom(function = username_not_reserved)
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 254, message = "Email must be at most 254 characters")
    )]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// User query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserQuery {
    /// Substring match on username
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub is_superuser: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Admin role or a superuser account
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    /// Require admin privileges (denies reads too)
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Object-level check for review/comment mutation: the author themselves,
    /// a moderator, or an admin
    pub fn can_moderate(&self, author_id: i32) -> bool {
        self.user_id == author_id || self.is_moderator() || self.is_admin()
    }

    pub fn require_author_or_moderator(&self, author_id: i32) -> Result<(), AppError> {
        if self.can_moderate(author_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the author, a moderator or an admin may modify this".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, user_id: i32) -> UserClaims {
        UserClaims {
            sub: "someone".to_string(),
            user_id,
            role,
            is_superuser: false,
            exp: 4102444800,
            iat: 0,
        }
    }

    #[test]
    fn role_parsing_round_trips() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn reserved_username_rejected() {
        assert!(username_not_reserved("me").is_err());
        assert!(username_not_reserved("meredith").is_ok());
    }

    #[test]
    fn admin_check_covers_superusers() {
        let mut c = claims(Role::User, 1);
        assert!(!c.is_admin());
        c.is_superuser = true;
        assert!(c.is_admin());
        assert!(c.require_admin().is_ok());
    }

    #[test]
    fn object_permission_matrix() {
        // Author can edit their own object
        assert!(claims(Role::User, 7).can_moderate(7));
        // A plain user cannot edit someone else's object
        assert!(!claims(Role::User, 7).can_moderate(8));
        // Moderators and admins can edit anyone's object
        assert!(claims(Role::Moderator, 7).can_moderate(8));
        assert!(claims(Role::Admin, 7).can_moderate(8));
    }

    #[test]
    fn token_round_trip() {
        let c = claims(Role::Moderator, 42);
        let token = c.create_token("test-secret").unwrap();
        let decoded = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.role, Role::Moderator);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }
}
