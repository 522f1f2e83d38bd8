//! User profile routes

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    accounts::AccountRole,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: AccountRole,
}

/// Profile of the authenticated account
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.accounts.profile(auth_user.id).await?;

    Ok(Json(ProfileResponse {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        role: profile.role,
    }))
}

/// Profile of an arbitrary account, admin only
pub async fn get_account(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(account_id): Path<Uuid>,
) -> ApiResult<Json<ProfileResponse>> {
    if !auth_user.is_admin() {
        return Err(ApiError::Forbidden);
    }

    let profile = state.accounts.profile(account_id).await?;

    Ok(Json(ProfileResponse {
        id: profile.id,
        email: profile.email,
        name: profile.name,
        role: profile.role,
    }))
}
