//! Catalog handlers
//!
//! Reads are public; writes are admin-only on top of the access-control
//! gate.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    jwt::Claims,
    middleware::require_admin,
    models::{NewSpice, UpdateSpice},
    validation,
};

/// GET /spices
pub async fn list_spices(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let spices = state.spice_repository.list().await.map_err(|e| {
        error!("Failed to list spices: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(spices))
}

/// GET /spices/:id
pub async fn get_spice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let spice = state
        .spice_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get spice: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::NotFound("Spice"))?;

    Ok(Json(spice))
}

/// POST /spices (admin only)
pub async fn create_spice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewSpice>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    validation::validate_name(&payload.name).map_err(ApiError::Validation)?;
    if payload.price < 0.0 {
        return Err(ApiError::Validation("Price must not be negative".to_string()));
    }

    let spice = state.spice_repository.create(&payload).await.map_err(|e| {
        error!("Failed to create spice: {}", e);
        ApiError::ServerError
    })?;

    Ok(Json(spice))
}

/// PUT /spices/:id (admin only)
pub async fn update_spice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSpice>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    if let Some(name) = payload.name.as_deref() {
        validation::validate_name(name).map_err(ApiError::Validation)?;
    }
    if payload.price.is_some_and(|p| p < 0.0) {
        return Err(ApiError::Validation("Price must not be negative".to_string()));
    }

    let spice = state
        .spice_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update spice: {}", e);
            ApiError::ServerError
        })?
        .ok_or(ApiError::NotFound("Spice"))?;

    Ok(Json(spice))
}

/// DELETE /spices/:id (admin only)
pub async fn delete_spice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    let deleted = state.spice_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete spice: {}", e);
        ApiError::ServerError
    })?;
    if !deleted {
        return Err(ApiError::NotFound("Spice"));
    }

    Ok(Json(json!({"message": "Spice deleted successfully"})))
}
