//! Authentication middleware

use axum::{
    extract::{State, Request},
    middleware::Next,
    response::Response,
    http::{header::AUTHORIZATION, HeaderMap},
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, AppError, AppResult};
use crate::models::User;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// User context extracted from JWT
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Uuid,
}

/// Caller context extracted from API key
#[derive(Debug, Clone)]
pub struct ApiClientContext {
    pub user_id: Uuid,
}

/// Issue a signed session token for `user_id`
pub fn generate_jwt(user_id: Uuid, secret: &str, expiration_hours: u64) -> AppResult<String> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::InternalError(format!("token lifetime of {} hours is out of range", expiration_hours)))?;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))
}

/// Verify a session token and return the user id it was issued for
pub fn verify_jwt(token: &str, secret: &str) -> AppResult<Uuid> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default()
    )?;

    Uuid::parse_str(&token_data.claims.sub).map_err(|_| AppError::TokenInvalid)
}

/// Middleware: Require user JWT authentication
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Missing or bad tokens are answered with 403, never 401
    let token = extract_bearer_token(req.headers()).map_err(|_| AppError::Forbidden)?;

    let user_id = verify_jwt(&token, &state.config.jwt_secret)?;

    // Insert into request extensions
    req.extensions_mut().insert(UserContext { user_id });

    Ok(next.run(req).await)
}

/// Middleware: Require a registered API key
pub async fn require_api_key(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(req.headers())?;

    let user = User::find_by_api_key(&state.pool, &api_key)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(ApiClientContext { user_id: user.user_id });

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

fn extract_api_key(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized)
}

// Implement FromRequestParts for UserContext
#[axum::async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<UserContext>()
            .cloned()
            .ok_or(AppError::Forbidden)
    }
}

// Implement FromRequestParts for ApiClientContext
#[axum::async_trait]
impl<S> FromRequestParts<S> for ApiClientContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions
            .get::<ApiClientContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
