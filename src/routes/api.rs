// Handlers for the admin mutation endpoints

use axum::{
    extract::{Json as JsonExtract, Path, State},
    response::{IntoResponse, Json},
};
use serde::Serialize;

use crate::{
    AppState,
    auth::{AuthState, GateDecision, admin_gate},
    auth_middleware::SessionUser,
    error::{AppError, AppResult},
    models::Listing,
    supabase::ListingStore,
};

// --- Response Wrappers ---

#[derive(Serialize)]
struct GenericResponse {
    success: bool,
    message: Option<String>,
    id: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct UpdateResponse {
    success: bool,
    listing: Option<Listing>,
    error: Option<String>,
}

fn require_admin(auth: &AuthState) -> Result<(), AppError> {
    match admin_gate(auth) {
        GateDecision::Proceed => Ok(()),
        _ => Err(AppError::Unauthorized("Admin access required".into())),
    }
}

// --- API Handlers ---

/// Replaces a listing wholesale. The path id wins over whatever id the body
/// carried. A vanished id is a reported no-op, not an error.
pub async fn update_listing(
    State(app_state): State<AppState>,
    SessionUser(auth): SessionUser,
    Path(id): Path<String>,
    JsonExtract(mut listing): JsonExtract<Listing>,
) -> AppResult<impl IntoResponse> {
    require_admin(&auth)?;
    tracing::info!("API call: update_listing for id: {}", id);

    listing.id = id;
    match app_state.store.update(&listing).await? {
        Some(updated) => Ok(Json(UpdateResponse {
            success: true,
            listing: Some(updated),
            error: None,
        })),
        None => Ok(Json(UpdateResponse {
            success: false,
            listing: None,
            error: Some("Failed to update listing: no data returned".to_string()),
        })),
    }
}

pub async fn delete_listing(
    State(app_state): State<AppState>,
    SessionUser(auth): SessionUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    require_admin(&auth)?;
    tracing::info!("API call: delete_listing for id: {}", id);

    // Idempotent at the store contract: an id that is already gone succeeds
    app_state.store.delete_by_id(&id).await?;
    Ok(Json(GenericResponse {
        success: true,
        message: Some("Listing deleted.".to_string()),
        id: Some(id),
        error: None,
    }))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    SessionUser(auth): SessionUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    require_admin(&auth)?;
    tracing::info!("API call: delete_user for id: {}", id);

    app_state.store.delete_user(&id).await?;
    Ok(Json(GenericResponse {
        success: true,
        message: Some("User deleted.".to_string()),
        id: Some(id),
        error: None,
    }))
}
