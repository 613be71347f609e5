// Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

// Declare submodules for different route groups
mod api;
mod auth;
mod pages;

pub fn create_router(app_state: AppState) -> Router {
    // Admin mutation endpoints; handlers expect AppState via the State
    // extractor and a Bearer session on every request.
    let api_router = Router::new()
        .route("/listings/:id", post(api::update_listing))
        .route("/listings/:id/delete", post(api::delete_listing))
        .route("/users/:id/delete", post(api::delete_user))
        .with_state(app_state.clone());

    Router::new()
        // Page routes
        .route("/", get(pages::index))
        .route("/listings/:id", get(pages::listing_detail))
        .route("/post", get(pages::post_page).post(pages::submit_listing))
        .route("/admin", get(pages::admin_page))
        .route("/login", get(pages::login_page))
        // Auth routes
        .route("/login", post(auth::handle_login))
        // Nest the API router which already has state
        .nest("/api", api_router)
        .with_state(app_state)
}
