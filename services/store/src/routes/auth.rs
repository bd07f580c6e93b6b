//! Authentication and account management handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    jwt::Claims,
    middleware::{ensure_not_self, require_admin},
    models::{NewUser, Role, UserView},
    oauth::OAuthProvider,
    password,
    repositories::is_unique_violation,
    validation,
};

/// Request for user registration. Fields default to empty so a missing
/// field fails validation with the same JSON 400 shape as a present but
/// invalid one, instead of a serde rejection.
#[derive(Deserialize, Default)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for user login
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request for OAuth login. The access token is the one the client obtained
/// from the provider; the server verifies it against the provider before
/// trusting any identity derived from it.
#[derive(Deserialize, Default)]
pub struct OAuthRequest {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub access_token: String,
}

/// Request for profile self-service update
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Request for an admin role change. A missing role is simply not in the
/// closed set.
#[derive(Deserialize, Default)]
pub struct UpdateRoleRequest {
    #[serde(default)]
    pub role: String,
}

/// Request for admin user creation
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Response carrying a freshly minted token and the sanitized account view
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Registration attempt for: {}", payload.email);

    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let existing = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::ServerError
        })?;
    if existing.is_some() {
        return Err(ApiError::DuplicateAccount);
    }

    let password_hash = password::hash(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::ServerError
    })?;

    let new_user = NewUser {
        name: payload.name,
        email: payload.email,
        password_hash: Some(password_hash),
        role: Role::User,
        provider: None,
    };

    // The unique index on email is the authority; a concurrent registration
    // racing past the pre-check loses here.
    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateAccount
        } else {
            error!("Failed to create user: {}", e);
            ApiError::ServerError
        }
    })?;

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for: {}", payload.email);

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::InvalidCredentials)?;

    // OAuth-only accounts have no credential to compare against.
    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or(ApiError::InvalidCredentials)?;

    let matches = password::verify(&payload.password, stored_hash).map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::ServerError
    })?;
    if !matches {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// POST /auth/oauth
pub async fn oauth_login(
    State(state): State<AppState>,
    Json(payload): Json<OAuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = OAuthProvider::parse(&payload.provider)
        .ok_or_else(|| ApiError::Validation("Unsupported provider".to_string()))?;

    // Identity comes from the provider, never from the request body.
    let profile = state
        .oauth_verifier
        .fetch_profile(provider, &payload.access_token)
        .await
        .map_err(|e| {
            error!("OAuth assertion verification failed: {}", e);
            ApiError::InvalidToken
        })?;

    let existing = state
        .user_repository
        .find_by_email(&profile.email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::ServerError
        })?;

    let user = match existing {
        Some(user) => user,
        None => {
            let new_user = NewUser {
                name: profile.name,
                email: profile.email,
                password_hash: None,
                role: Role::User,
                provider: Some(provider.as_str().to_string()),
            };
            state.user_repository.create(&new_user).await.map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::DuplicateAccount
                } else {
                    error!("Failed to create user: {}", e);
                    ApiError::ServerError
                }
            })?
        }
    };

    let token = state.jwt_service.generate_token(&user).map_err(|e| {
        error!("Failed to generate token: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserView::from(user)))
}

/// PUT /auth/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = payload.name.as_deref() {
        validation::validate_name(name).map_err(ApiError::Validation)?;
    }

    // A password update always re-hashes with a fresh salt.
    let password_hash = match payload.password.as_deref() {
        Some(p) => {
            validation::validate_password(p).map_err(ApiError::Validation)?;
            Some(password::hash(p).map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::ServerError
            })?)
        }
        None => None,
    };

    let user = state
        .user_repository
        .update_profile(claims.sub, payload.name.as_deref(), password_hash.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to update profile: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserView::from(user)))
}

/// DELETE /auth/me
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_repository.delete(claims.sub).await.map_err(|e| {
        error!("Failed to delete user: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(json!({"message": "Account deleted successfully"})))
}

/// GET /auth/users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    let users = state.user_repository.list().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        ApiError::ServerError
    })?;

    let views: Vec<UserView> = users.iter().map(UserView::from).collect();
    Ok(Json(views))
}

/// PUT /auth/users/:id/role (admin only, not self)
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    let role = Role::parse(&payload.role).ok_or(ApiError::InvalidRole)?;

    ensure_not_self(&claims, id, "Cannot change your own role")?;

    let user = state
        .user_repository
        .update_role(id, role)
        .await
        .map_err(|e| {
            error!("Failed to update role: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserView::from(user)))
}

/// DELETE /auth/users/:id (admin only, not self)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    ensure_not_self(&claims, id, "Cannot delete your own account")?;

    let deleted = state.user_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete user: {}", e);
        ApiError::ServerError
    })?;
    if !deleted {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(json!({"message": "User deleted successfully"})))
}

/// POST /auth/admin/create-user (admin only)
pub async fn admin_create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    let (name, email, pass) = match (&payload.name, &payload.email, &payload.password) {
        (Some(name), Some(email), Some(pass)) => (name, email, pass),
        _ => return Err(ApiError::Validation("All fields are required".to_string())),
    };

    validation::validate_name(name).map_err(ApiError::Validation)?;
    validation::validate_email(email).map_err(ApiError::Validation)?;
    validation::validate_password(pass).map_err(ApiError::Validation)?;

    let role = payload
        .role
        .as_deref()
        .and_then(Role::parse)
        .ok_or(ApiError::InvalidRole)?;

    let existing = state
        .user_repository
        .find_by_email(email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::ServerError
        })?;
    if existing.is_some() {
        return Err(ApiError::DuplicateAccount);
    }

    let password_hash = password::hash(pass).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::ServerError
    })?;

    let new_user = NewUser {
        name: name.clone(),
        email: email.clone(),
        password_hash: Some(password_hash),
        role,
        provider: None,
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateAccount
        } else {
            error!("Failed to create user: {}", e);
            ApiError::ServerError
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": UserView::from(user),
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_missing_fields_default_to_empty() {
        let payload: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert!(payload.name.is_empty());
        assert!(payload.email.is_empty());
        assert!(payload.password.is_empty());

        // Empty fields fail validation rather than serde rejection.
        assert!(validation::validate_name(&payload.name).is_err());
        assert!(validation::validate_email(&payload.email).is_err());
        assert!(validation::validate_password(&payload.password).is_err());
    }

    #[test]
    fn test_login_request_missing_fields_default_to_empty() {
        let payload: LoginRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert_eq!(payload.email, "a@x.com");
        assert!(payload.password.is_empty());
    }

    #[test]
    fn test_update_role_request_missing_role_is_outside_closed_set() {
        let payload: UpdateRoleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(Role::parse(&payload.role), None);
    }
}
