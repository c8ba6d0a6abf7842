//! Authentication handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use uuid::Uuid;

use crate::{AppState, AppError, AppResult};
use crate::middleware::auth::generate_jwt;
use crate::models::{CredentialsRequest, NewUser, SignUpRequest, TokenResponse, User};
use crate::response::ApiResponse;
use crate::validation::validate_request;

const SIGN_UP_FIELDS: &[&str] = &["email", "firstname", "lastname", "password", "confirm_password"];
const CREDENTIAL_FIELDS: &[&str] = &["email", "password"];

/// Hash a password with argon2 and a fresh salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Constant-time password check against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Look a user up by email and check the password.
pub async fn authenticate(state: &AppState, email: &str, password: &str) -> AppResult<Option<User>> {
    let Some(user) = User::find_by_email(&state.pool, email).await? else {
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash)? {
        return Ok(None);
    }

    Ok(Some(user))
}

/// Sign-up endpoint
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let Json(req) = payload?;
    let req = req.normalized();
    validate_request(&req, SIGN_UP_FIELDS)?;

    if req.password != req.confirm_password {
        return Err(AppError::ValidationError("Passwords don't match.".to_string()));
    }

    // Check if email already exists
    if User::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::AlreadyExists("Email address is already in use.".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    let user = User::create(
        &state.pool,
        NewUser {
            user_id,
            api_key: User::generate_api_key(user_id, &req.email),
            email: req.email,
            firstname: req.firstname,
            lastname: req.lastname,
            password_hash,
        },
    )
    .await
    .map_err(|e| match e {
        // Lost a race with a concurrent sign-up for the same email
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::AlreadyExists("Email address is already in use.".to_string())
        }
        other => AppError::from(other),
    })?;

    let token = generate_jwt(user.user_id, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    tracing::info!("New user registered: {}", user.user_id);

    Ok(Json(ApiResponse::ok("Successfully registered!", TokenResponse { token })))
}

/// Sign-in endpoint
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let Json(req) = payload?;
    let req = req.normalized();
    validate_request(&req, CREDENTIAL_FIELDS)?;

    let user = authenticate(&state, &req.email, &req.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let token = generate_jwt(user.user_id, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    tracing::debug!("User signed in: {}", user.user_id);

    Ok(Json(ApiResponse::ok("Authenticated!", TokenResponse { token })))
}
