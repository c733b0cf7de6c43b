use crate::api::AppState;
use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{Role, SocialLinks, UserProfile};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register a new user and send an OTP challenge
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ChallengeResponse>)> {
    request.validate()?;

    let role = request.role.unwrap_or_default();
    let challenge = state.auth.register(&request.email, &request.password, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChallengeResponse {
            message: if challenge.email_sent {
                "User registered. Please verify OTP.".to_string()
            } else {
                "User registered, but OTP email delivery failed. Contact support.".to_string()
            },
            user_id: challenge.user_id,
        }),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub message: String,
    pub user_id: String,
}

/// Verify credentials and send an OTP challenge
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ChallengeResponse>> {
    request.validate()?;

    let challenge = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(ChallengeResponse {
        message: if challenge.email_sent {
            "OTP sent to email".to_string()
        } else {
            "Login accepted, but OTP email delivery failed. Contact support.".to_string()
        },
        user_id: challenge.user_id,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Exchange a valid OTP for a bearer session token
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<TokenResponse>> {
    request.validate()?;

    let token = state.auth.verify_otp(&request.email, &request.otp).await?;

    Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Revoke the caller's session token
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.auth.sessions().revoke(token);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Get the caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserProfile>> {
    let user = state
        .users
        .get_user(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.profile()))
}

/// Update the caller's profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfile>> {
    request.validate()?;

    let mut user = state
        .users
        .get_user(&claims.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(email) = request.email {
        let email = email.to_lowercase();
        if email != user.email {
            if state.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
            user.email = email;
        }
    }

    if let Some(avatar) = request.avatar {
        user.avatar = Some(avatar);
    }
    if let Some(social_links) = request.social_links {
        user.social_links = social_links;
    }
    if let Some(profession) = request.profession {
        user.profession = Some(profession);
    }
    if let Some(has_disability) = request.has_disability {
        user.has_disability = has_disability;
    }

    state.users.update_user(&user).await?;

    Ok(Json(user.profile()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub social_links: Option<SocialLinks>,
    #[validate(length(max = 255))]
    pub profession: Option<String>,
    pub has_disability: Option<bool>,
}
