// Axum extractor resolving the request's session into an AuthState

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use tracing::warn;

use crate::AppState;
use crate::auth::{self, AuthState};
use crate::supabase::ListingStore;

/// The resolved session for this request.
///
/// Extraction never rejects: a missing or invalid token resolves to
/// `Anonymous`, and a role lookup that cannot complete resolves to
/// `Unresolved`. The gate decides what each state may do.
#[derive(Clone)]
pub struct SessionUser(pub AuthState);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = match parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(_) => return Ok(SessionUser(AuthState::Anonymous)),
        };

        let app_state = AppState::from_ref(state);

        let claims = match auth::verify_token(bearer.token(), &app_state.settings) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Rejected session token: {:?}", e);
                return Ok(SessionUser(AuthState::Anonymous));
            }
        };

        // The marketplace role lives on the users row, not in the token.
        // If the row cannot be read the session stays unresolved rather
        // than guessing a role.
        let role = match app_state.store.fetch_users().await {
            Ok(users) => users
                .into_iter()
                .find(|user| user.id == claims.sub)
                .map(|user| user.role)
                .unwrap_or_else(|| "user".to_string()),
            Err(e) => {
                warn!("Could not resolve role for user {}: {}", claims.sub, e);
                return Ok(SessionUser(AuthState::Unresolved));
            }
        };

        Ok(SessionUser(AuthState::Authenticated {
            user_id: claims.sub,
            role,
        }))
    }
}
