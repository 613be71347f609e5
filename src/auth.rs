use anyhow::{Context, Result, anyhow};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Marketplace role that unlocks the admin dashboard.
pub const ADMIN_ROLE: &str = "admin";

// Supabase access tokens carry this audience for every signed-in user.
const SUPABASE_AUDIENCE: &str = "authenticated";

/// Claims inside a Supabase access token. Tokens are HS256-signed with the
/// project's JWT secret, so verification needs no key fetch.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,          // Audience ("authenticated")
    pub sub: String,          // Subject (user ID)
    pub exp: usize,           // Expiration time (seconds since epoch)
    pub email: Option<String>,
    pub role: Option<String>, // Database role, not the marketplace role
}

/// Verifies a Supabase access token and returns its claims.
///
/// The marketplace role is NOT in the token; it lives on the users row and
/// is resolved separately by the session extractor.
pub fn verify_token(token: &str, settings: &Settings) -> Result<Claims> {
    let secret = settings
        .supabase_jwt_secret
        .as_deref()
        .ok_or_else(|| anyhow!("Supabase JWT secret not configured"))?;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SUPABASE_AUDIENCE]);
    // Add leeway for clock skew if necessary: validation.leeway = 60;

    let decoded = decode::<Claims>(token, &decoding_key, &validation)
        .context("JWT validation failed")?;

    Ok(decoded.claims)
}

/// The session as the rest of the application sees it.
///
/// `Unresolved` means the session has not been determined yet (or a role
/// lookup failed mid-resolution); `Anonymous` means it resolved to no user.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unresolved,
    Anonymous,
    Authenticated { user_id: String, role: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Keep waiting; render nothing data-bearing and fetch nothing.
    Wait,
    /// A signed-in non-admin; send them back to the browse page.
    RedirectHome,
    /// Resolved as admin; load the dashboard.
    Proceed,
}

/// Pure routing decision for the admin dashboard. Navigation itself is an
/// explicit side effect performed by the caller.
pub fn admin_gate(auth: &AuthState) -> GateDecision {
    match auth {
        AuthState::Unresolved | AuthState::Anonymous => GateDecision::Wait,
        AuthState::Authenticated { role, .. } if role == ADMIN_ROLE => GateDecision::Proceed,
        AuthState::Authenticated { .. } => GateDecision::RedirectHome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_and_anonymous_sessions_wait() {
        assert_eq!(admin_gate(&AuthState::Unresolved), GateDecision::Wait);
        assert_eq!(admin_gate(&AuthState::Anonymous), GateDecision::Wait);
    }

    #[test]
    fn a_signed_in_non_admin_is_sent_home() {
        let auth = AuthState::Authenticated {
            user_id: "u1".to_string(),
            role: "user".to_string(),
        };
        assert_eq!(admin_gate(&auth), GateDecision::RedirectHome);
    }

    #[test]
    fn an_admin_proceeds() {
        let auth = AuthState::Authenticated {
            user_id: "u1".to_string(),
            role: ADMIN_ROLE.to_string(),
        };
        assert_eq!(admin_gate(&auth), GateDecision::Proceed);
    }
}
