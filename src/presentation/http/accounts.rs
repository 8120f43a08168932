use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::forms::account::{PasswordChangeForm, ProfileForm};
use crate::application::use_cases::accounts::change_password::ChangePassword;
use crate::application::use_cases::accounts::delete_account::DeleteAccount;
use crate::application::use_cases::accounts::profile::GetProfile;
use crate::application::use_cases::accounts::update_profile::UpdateProfile;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{self, CurrentUser, UserResponse};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::listings::{ListingSummary, to_summary};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub listings: Vec<ListingSummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub send_messages: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    #[serde(flatten)]
    pub user: UserResponse,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/password", put(change_password))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/accounts/profile", tag = "Accounts", responses(
    (status = 200, body = ProfileResponse),
    (status = 401, description = "Not logged in")
))]
pub async fn get_profile(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = user.id;
    let users = ctx.user_repo();
    let listings = ctx.listing_repo();
    let uc = GetProfile {
        users: users.as_ref(),
        listings: listings.as_ref(),
    };
    let profile = uc.execute(user_id).await?.ok_or(ApiError::Unauthorized)?;
    Ok(Json(ProfileResponse {
        user: profile.user.into(),
        listings: profile
            .listings
            .into_iter()
            .map(|l| to_summary(&ctx.cfg, l))
            .collect(),
    }))
}

#[utoipa::path(put, path = "/api/accounts/profile", tag = "Accounts", request_body = ProfileUpdateRequest, responses(
    (status = 200, body = ProfileUpdatedResponse),
    (status = 422, description = "Invalid form")
))]
pub async fn update_profile(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let user_id = user.id;
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    let form = ProfileForm {
        username: req.username,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        send_messages: req.send_messages,
    };
    let user = uc.execute(user_id, &form).await?;
    tracing::info!(user_id = %user_id, "profile_updated");
    Ok(Json(ProfileUpdatedResponse {
        message: "User data updated".into(),
        user: user.into(),
    }))
}

#[utoipa::path(delete, path = "/api/accounts/profile", tag = "Accounts", responses(
    (status = 200, description = "Account, listings and images removed", body = MessageResponse),
    (status = 404, description = "Account already gone")
))]
pub async fn delete_profile(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
) -> Result<(HeaderMap, Json<MessageResponse>), ApiError> {
    let user_id = user.id;
    let users = ctx.user_repo();
    let listings = ctx.listing_repo();
    let images = ctx.image_storage();
    let uc = DeleteAccount {
        users: users.as_ref(),
        listings: listings.as_ref(),
        images: images.as_ref(),
    };
    if !uc.execute(user_id).await? {
        return Err(ApiError::NotFound);
    }
    Ok((
        auth::expired_cookie_headers(&ctx.cfg),
        Json(MessageResponse {
            message: "User deleted".into(),
        }),
    ))
}

#[utoipa::path(put, path = "/api/accounts/password", tag = "Accounts", request_body = PasswordChangeRequest, responses(
    (status = 200, body = MessageResponse),
    (status = 422, description = "Invalid form")
))]
pub async fn change_password(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = user.id;
    let repo = ctx.user_repo();
    let uc = ChangePassword {
        repo: repo.as_ref(),
    };
    let form = PasswordChangeForm {
        old_password: req.old_password,
        new_password1: req.new_password1,
        new_password2: req.new_password2,
    };
    uc.execute(user_id, &form).await?;
    Ok(Json(MessageResponse {
        message: "Password changed".into(),
    }))
}
