//! User model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your first name."))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Please enter your last name."))]
    pub lastname: String,
    #[validate(length(min = 1, message = "Please enter your password."))]
    pub password: String,
    #[validate(length(min = 1, message = "Please re-type your password."))]
    pub confirm_password: String,
}

impl SignUpRequest {
    /// Trim the fields that tolerate surrounding whitespace. Passwords are left alone.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.firstname = self.firstname.trim().to_string();
        self.lastname = self.lastname.trim().to_string();
        self
    }
}

/// Body of sign-in
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password."))]
    pub password: String,
}

impl CredentialsRequest {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

/// Body of api-key retrieval. Any stored email is looked up as-is, so
/// only presence is checked.
#[derive(Debug, Deserialize, Validate)]
pub struct ApiKeyRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid password"))]
    pub password: String,
}

impl ApiKeyRequest {
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserInfo,
}

/// Fields needed to insert a user
#[derive(Debug)]
pub struct NewUser {
    pub user_id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub password_hash: String,
    pub api_key: String,
}

impl User {
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, firstname, lastname, password_hash, api_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(data.user_id)
        .bind(&data.email)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.password_hash)
        .bind(&data.api_key)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_api_key(pool: &PgPool, api_key: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE api_key = $1")
            .bind(api_key)
            .fetch_optional(pool)
            .await
    }

    /// API key format: `{user_id}-{md5(email)}`
    pub fn generate_api_key(user_id: Uuid, email: &str) -> String {
        format!("{}-{:x}", user_id, md5::compute(email.as_bytes()))
    }

    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            email: self.email.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            api_key: self.api_key.clone(),
        }
    }
}
