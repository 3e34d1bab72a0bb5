//! Domain types returned by the auth service
//!
//! `Session` and `User` are decoded from provider JSON. Required fields
//! are non-optional struct fields, so a response missing any of them
//! fails to decode rather than producing a partial value. Fields the
//! provider sends beyond these are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proof of an authenticated user: access/refresh tokens plus expiry.
///
/// `expires_in` is a delta in seconds from response time; `expires_at`,
/// when the provider sends it, is an absolute unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// A user record as the provider reports it.
///
/// Only `id` is required; everything else is provider-populated and
/// treated as opaque-but-typed. Metadata maps carry arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub app_metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub user_metadata: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_confirmed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_confirmed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_until: Option<String>,
}

/// Page positions decoded from a `link`-style response header.
///
/// `next_page`/`last_page` are `None` when the header carries no
/// matching relation. The provider encodes "no page" as page 0, which
/// is normalized to `None` here (a legitimate page 0 is therefore
/// indistinguishable from absence — kept for wire compatibility).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub next_page: Option<u64>,
    pub last_page: Option<u64>,
    pub total: u64,
}

/// Result of the admin generate-link operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedLink {
    pub action_link: String,
    #[serde(default)]
    pub email_otp: Option<String>,
    #[serde(default)]
    pub hashed_token: Option<String>,
    #[serde(default)]
    pub redirect_to: Option<String>,
    #[serde(default)]
    pub verification_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_requires_all_token_fields() {
        // refresh_token missing: must fail to decode, not produce a partial session
        let json = r#"{"access_token":"at","token_type":"bearer","expires_in":3600}"#;
        assert!(serde_json::from_str::<Session>(json).is_err());
    }

    #[test]
    fn session_ignores_unknown_fields() {
        let json = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "token_type": "bearer",
            "expires_in": 3600,
            "weak_password": {"reasons": ["length"]}
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.access_token, "at");
        assert_eq!(session.expires_in, 3600);
        assert!(session.user.is_none());
    }

    #[test]
    fn user_requires_only_id() {
        let json = r#"{"id":"7c4b3a6e-9c1a-4f3d-8e6b-2f1a0d9c8b7a"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.email.is_none());
        assert!(user.app_metadata.is_empty());
    }

    #[test]
    fn user_with_non_uuid_id_fails_to_decode() {
        let json = r#"{"id":"not-a-uuid"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }
}
