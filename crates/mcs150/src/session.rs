//! Session gate.
//!
//! The access token is decoded locally to learn who is signed in. The
//! signature is not checked here: the backend verifies the token on every
//! request, and an unusable token is simply treated as "not signed in".

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::Store;

/// Where admins land after signing in.
pub const ADMIN_LANDING: &str = "/admin/dashboard";

/// Where everyone else lands after signing in.
pub const USER_LANDING: &str = "/get-started";

/// Token payload claims. Any of them may be missing or `null`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    is_admin: Option<bool>,
    exp: Option<i64>,
}

/// The signed-in user, as read from the stored token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Whether the user may use the admin console.
    pub is_admin: bool,
    /// Token expiry, when the token carries one.
    #[serde(skip)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Full display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Check if the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// The route shown after a successful login.
    #[must_use]
    pub fn landing(&self) -> &'static str {
        if self.is_admin {
            ADMIN_LANDING
        } else {
            USER_LANDING
        }
    }

    /// Login greeting.
    #[must_use]
    pub fn greeting(&self) -> String {
        format!("Welcome back, {}!", self.first_name.trim())
    }
}

/// Decode a token into a session.
///
/// Returns `None` for anything that is not a three-part token with a
/// base64url JSON payload.
#[must_use]
pub fn decode_token(token: &str) -> Option<Session> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        debug!("Access token is not a three-part token");
        return None;
    }

    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| debug!(error = %e, "Access token payload is not base64url"))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| debug!(error = %e, "Access token payload is not valid claims"))
        .ok()?;

    Some(Session {
        first_name: claims.first_name.unwrap_or_default(),
        last_name: claims.last_name.unwrap_or_default(),
        email: claims.email.unwrap_or_default(),
        is_admin: claims.is_admin.unwrap_or_default(),
        expires_at: claims
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0)),
    })
}

/// Read the signed-in user from the store.
///
/// A missing, undecodable, or expired token yields `None`.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn current(store: &Store) -> Result<Option<Session>> {
    let Some(token) = store.credential()? else {
        return Ok(None);
    };
    Ok(decode_token(&token).filter(|session| !session.is_expired_at(Utc::now())))
}

/// Require a signed-in user.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] when no usable session exists.
pub fn gate(store: &Store) -> Result<Session> {
    current(store)?.ok_or(Error::NotAuthenticated)
}

/// Require a signed-in administrator.
///
/// # Errors
///
/// Returns [`Error::NotAuthenticated`] when no usable session exists and
/// [`Error::NotAuthorized`] when the user is not an administrator.
pub fn gate_admin(store: &Store) -> Result<Session> {
    let session = gate(store)?;
    if session.is_admin {
        Ok(session)
    } else {
        Err(Error::NotAuthorized)
    }
}

/// Build an unsigned token carrying the given claims JSON.
#[cfg(test)]
pub(crate) fn make_token(claims: &serde_json::Value) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(claims.to_string());
    let signature = engine.encode("signature");
    format!("{header}.{payload}.{signature}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token(is_admin: bool) -> String {
        make_token(&json!({
            "sub": "42",
            "firstName": "Dana ",
            "lastName": "Reyes",
            "email": "dana@example.com",
            "isAdmin": is_admin,
            "exp": Utc::now().timestamp() + 3600,
        }))
    }

    #[test]
    fn test_decode_token() {
        let session = decode_token(&token(false)).unwrap();
        assert_eq!(session.first_name, "Dana ");
        assert_eq!(session.email, "dana@example.com");
        assert!(!session.is_admin);
        assert!(session.expires_at.is_some());
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(decode_token("").is_none());
        assert!(decode_token("not-a-jwt").is_none());
        assert!(decode_token("a.b").is_none());
    }

    #[test]
    fn test_decode_rejects_bad_payload() {
        assert!(decode_token("header.!!!invalid!!!.signature").is_none());
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let not_json = format!("h.{}.s", engine.encode("plain text"));
        assert!(decode_token(&not_json).is_none());
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let engine = base64::engine::general_purpose::URL_SAFE;
        let payload = engine.encode(r#"{"firstName":"Al"}"#);
        let session = decode_token(&format!("h.{payload}.s")).unwrap();
        assert_eq!(session.first_name, "Al");
        assert!(!session.is_admin);
    }

    #[test]
    fn test_decode_treats_null_claims_as_empty() {
        let store = Store::open_in_memory().unwrap();
        store
            .set_credential(&make_token(&json!({
                "firstName": "Dana",
                "lastName": null,
                "email": "dana@example.com",
                "isAdmin": null,
            })))
            .unwrap();

        let session = gate(&store).unwrap();
        assert_eq!(session.last_name, "");
        assert!(!session.is_admin);
        assert_eq!(session.display_name(), "Dana");
    }

    #[test]
    fn test_landing_and_greeting() {
        let user = decode_token(&token(false)).unwrap();
        let admin = decode_token(&token(true)).unwrap();

        assert_eq!(user.landing(), "/get-started");
        assert_eq!(admin.landing(), "/admin/dashboard");
        assert_eq!(user.greeting(), "Welcome back, Dana!");
        assert_eq!(user.display_name(), "Dana Reyes");
    }

    #[test]
    fn test_gate_without_credential() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(gate(&store), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_gate_with_malformed_credential_redirects() {
        let store = Store::open_in_memory().unwrap();
        store.set_credential("garbage").unwrap();

        let err = gate(&store).unwrap_err();
        assert_eq!(err.redirect(), Some("/login"));
    }

    #[test]
    fn test_gate_with_expired_credential() {
        let store = Store::open_in_memory().unwrap();
        store
            .set_credential(&make_token(&json!({
                "firstName": "Old",
                "exp": Utc::now().timestamp() - 10,
            })))
            .unwrap();

        assert!(matches!(gate(&store), Err(Error::NotAuthenticated)));
    }

    #[test]
    fn test_gate_admin() {
        let store = Store::open_in_memory().unwrap();
        store.set_credential(&token(false)).unwrap();
        assert!(gate(&store).is_ok());
        assert!(matches!(gate_admin(&store), Err(Error::NotAuthorized)));

        store.set_credential(&token(true)).unwrap();
        assert!(gate_admin(&store).unwrap().is_admin);
    }
}
