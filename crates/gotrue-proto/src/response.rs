//! Response decoding: raw status + JSON body into domain values
//!
//! A 2xx status with a body matching the expected shape decodes into a
//! typed value; extra fields are ignored. Non-2xx statuses map to the
//! [`Error`] taxonomy, with one distinguished case: the provider
//! reports a wrong password as `invalid_grant` with the description
//! "Invalid login credentials", which callers need to tell apart from
//! an expired or malformed grant.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{GeneratedLink, Session, User};

/// Provider description accompanying a wrong-password rejection.
const INVALID_LOGIN: &str = "Invalid login credentials";

pub fn decode_session(status: u16, body: &str) -> Result<Session> {
    let session: Session = decode_json(status, body)?;
    if session.access_token.is_empty() {
        return Err(Error::Decode("session access_token is empty".into()));
    }
    Ok(session)
}

pub fn decode_user(status: u16, body: &str) -> Result<User> {
    decode_json(status, body)
}

/// The list endpoint wraps its users in an envelope object.
pub fn decode_user_list(status: u16, body: &str) -> Result<Vec<User>> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        users: Vec<User>,
    }
    let envelope: Envelope = decode_json(status, body)?;
    Ok(envelope.users)
}

/// OTP dispatch result depends on the delivery channel: phone sends are
/// fire-and-forget, email sends report a provider message id.
pub fn decode_otp(status: u16, body: &str, phone: bool) -> Result<Option<String>> {
    check_status(status, body)?;
    if phone {
        return Ok(None);
    }
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    Ok(json["data"]["message_id"].as_str().map(String::from))
}

/// SSO sign-in yields the redirect URL the application should follow.
pub fn decode_sso(status: u16, body: &str) -> Result<String> {
    check_status(status, body)?;
    let json: Value =
        serde_json::from_str(body).map_err(|e| Error::Decode(format!("sso response: {e}")))?;
    json["url"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| Error::Decode("sso response missing url".into()))
}

pub fn decode_generated_link(status: u16, body: &str) -> Result<GeneratedLink> {
    decode_json(status, body)
}

/// For side-effect-only operations where success carries no payload.
pub fn decode_no_content(status: u16, body: &str) -> Result<()> {
    check_status(status, body)
}

/// Sign-out is idempotent: a session that is already gone (404) or whose
/// token no longer authenticates (401) means the caller's intent is
/// satisfied, so both decode as success.
pub fn decode_sign_out(status: u16, body: &str) -> Result<()> {
    match check_status(status, body) {
        Err(Error::NotFound | Error::Unauthorized) => Ok(()),
        other => other,
    }
}

fn decode_json<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))
}

fn check_status(status: u16, body: &str) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(error_from_response(status, body))
    }
}

/// Map a non-2xx provider response to the domain error taxonomy.
pub fn error_from_response(status: u16, body: &str) -> Error {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let code = json["error"]
        .as_str()
        .or_else(|| json["error_code"].as_str());
    let description = json["error_description"]
        .as_str()
        .or_else(|| json["msg"].as_str())
        .or_else(|| json["message"].as_str());

    match status {
        401 | 403 => Error::Unauthorized,
        404 => Error::NotFound,
        _ if code == Some("invalid_grant") => {
            if description == Some(INVALID_LOGIN) {
                Error::InvalidCredentials
            } else {
                Error::InvalidGrant
            }
        }
        _ => Error::Decode(format!(
            "unexpected status {status}: {}",
            description.or(code).unwrap_or("<no body>")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_BODY: &str = r#"{
        "access_token": "at",
        "refresh_token": "rt",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": {"id": "7c4b3a6e-9c1a-4f3d-8e6b-2f1a0d9c8b7a", "email": "a@b.com"}
    }"#;

    #[test]
    fn session_decodes_from_200() {
        let session = decode_session(200, SESSION_BODY).unwrap();
        assert_eq!(session.access_token, "at");
        assert_eq!(session.refresh_token, "rt");
        assert_eq!(session.token_type, "bearer");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.unwrap().email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn session_decode_is_idempotent() {
        let first = decode_session(200, SESSION_BODY).unwrap();
        let second = decode_session(200, SESSION_BODY).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let body = r#"{"access_token":"at","token_type":"bearer","expires_in":3600}"#;
        assert!(matches!(decode_session(200, body), Err(Error::Decode(_))));
    }

    #[test]
    fn empty_access_token_is_a_decode_error() {
        let body = r#"{"access_token":"","refresh_token":"rt","token_type":"bearer","expires_in":3600}"#;
        assert!(matches!(decode_session(200, body), Err(Error::Decode(_))));
    }

    #[test]
    fn invalid_credentials_is_distinguished_from_invalid_grant() {
        let wrong_password =
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            decode_session(400, wrong_password).unwrap_err(),
            Error::InvalidCredentials
        );

        let expired = r#"{"error":"invalid_grant","error_description":"Token expired"}"#;
        assert_eq!(decode_session(400, expired).unwrap_err(), Error::InvalidGrant);
    }

    #[test]
    fn status_401_maps_to_unauthorized() {
        assert_eq!(
            decode_user(401, r#"{"msg":"bad jwt"}"#).unwrap_err(),
            Error::Unauthorized
        );
    }

    #[test]
    fn status_404_maps_to_not_found() {
        assert_eq!(
            decode_user(404, r#"{"msg":"user not found"}"#).unwrap_err(),
            Error::NotFound
        );
    }

    #[test]
    fn sign_out_treats_gone_sessions_as_success() {
        assert!(decode_sign_out(204, "").is_ok());
        assert!(decode_sign_out(404, r#"{"msg":"session not found"}"#).is_ok());
        assert!(decode_sign_out(401, r#"{"msg":"invalid token"}"#).is_ok());
        assert!(decode_sign_out(500, r#"{"msg":"boom"}"#).is_err());
    }

    #[test]
    fn otp_phone_success_has_no_payload() {
        assert_eq!(decode_otp(200, "{}", true).unwrap(), None);
    }

    #[test]
    fn otp_email_success_extracts_message_id() {
        let body = r#"{"data":{"message_id":"m1"}}"#;
        assert_eq!(decode_otp(200, body, false).unwrap(), Some("m1".into()));
    }

    #[test]
    fn sso_yields_redirect_url() {
        let body = r#"{"url":"https://sso.example/start"}"#;
        assert_eq!(decode_sso(200, body).unwrap(), "https://sso.example/start");
        assert!(matches!(decode_sso(200, "{}"), Err(Error::Decode(_))));
    }

    #[test]
    fn user_list_unwraps_envelope() {
        let body = r#"{"users":[{"id":"7c4b3a6e-9c1a-4f3d-8e6b-2f1a0d9c8b7a"}],"aud":"authenticated"}"#;
        let users = decode_user_list(200, body).unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn unknown_status_carries_provider_message() {
        let err = decode_no_content(500, r#"{"msg":"database exploded"}"#).unwrap_err();
        match err {
            Error::Decode(reason) => assert!(reason.contains("database exploded")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
