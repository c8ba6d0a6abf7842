//! Current-user handler

use axum::{extract::State, Json};

use crate::{AppState, AppError, AppResult};
use crate::middleware::auth::UserContext;
use crate::models::{User, UserEnvelope};
use crate::response::ApiResponse;

/// Get the user the session token was issued for
pub async fn get(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<ApiResponse<UserEnvelope>>> {
    let user = User::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Forbidden)?;

    Ok(Json(ApiResponse::ok(
        "Successfully fetched user!",
        UserEnvelope { user: user.to_info() },
    )))
}
