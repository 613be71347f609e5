use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};

use crate::{AppState, auth, error::AppError, models::LoginForm};

// Handler for POST /login
// Accepts the access token obtained by the login page and the shared state
pub async fn handle_login(
    State(app_state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    match auth::verify_token(&form.access_token, &app_state.settings) {
        Ok(claims) => {
            tracing::info!("Token verified successfully for user_id: {}", claims.sub);

            // TODO: set a signed session cookie so plain page loads carry
            // the session instead of the Authorization header

            Ok(Redirect::to("/admin"))
        }
        Err(e) => {
            tracing::warn!("Token verification failed: {:?}", e);
            Err(AppError::Unauthorized("Invalid or expired session token".into()))
        }
    }
}
