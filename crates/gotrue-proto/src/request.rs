//! Wire-request construction for every flow
//!
//! A [`WireRequest`] is transport-agnostic: path suffix relative to the
//! configured auth base URL, query parameters (absent values are never
//! encoded), and an optional JSON body. Builders take a validated
//! credential plus an optional PKCE pair; whether a pair exists at all
//! is the orchestrator's decision, not this module's.

use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::credentials::{
    AdminUserAttributes, Credential, GenerateLinkParams, IdTokenParams, OAuthParams, OtpParams,
    PageParams, PasswordParams, ResendType, SignUpParams, SsoParams, UserAttributes,
    VerifyOtpParams,
};
use crate::pkce::PkcePair;

// Endpoint path suffixes, appended to the configured auth base URL.
pub const TOKEN_PATH: &str = "/token";
pub const SIGNUP_PATH: &str = "/signup";
pub const OTP_PATH: &str = "/otp";
pub const VERIFY_PATH: &str = "/verify";
pub const SSO_PATH: &str = "/sso";
pub const AUTHORIZE_PATH: &str = "/authorize";
pub const RECOVER_PATH: &str = "/recover";
pub const RESEND_PATH: &str = "/resend";
pub const USER_PATH: &str = "/user";
pub const LOGOUT_PATH: &str = "/logout";
pub const INVITE_PATH: &str = "/invite";
pub const ADMIN_USERS_PATH: &str = "/admin/users";
pub const ADMIN_GENERATE_LINK_PATH: &str = "/admin/generate_link";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One outbound request, ready for URL assembly by the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl WireRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    fn query_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present. Absent
    /// values are dropped entirely, never encoded as empty strings.
    fn query_opt(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            self.query.push((key.to_string(), v.to_string()));
        }
        self
    }

    fn body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(Value::Object(body));
        self
    }
}

/// Build the wire request for a sign-in credential.
///
/// The OAuth variant produces a GET against `/authorize` that is never
/// sent — the orchestrator assembles it into a redirect URL instead.
pub fn build(credential: &Credential, pkce: Option<&PkcePair>) -> WireRequest {
    match credential {
        Credential::Password(params) => password_request(params),
        Credential::Otp(params) => otp_request(params, pkce),
        Credential::IdToken(params) => id_token_request(params),
        Credential::Sso(params) => sso_request(params, pkce),
        Credential::OAuth(params) => authorize_request(params, pkce),
        Credential::SignUp(params) => sign_up_request(params, pkce),
    }
}

fn password_request(params: &PasswordParams) -> WireRequest {
    let mut body = Map::new();
    insert_opt(&mut body, "email", params.email.as_deref());
    insert_opt(&mut body, "phone", params.phone.as_deref());
    body.insert("password".into(), json!(params.password));
    insert_meta_security(&mut body, params.captcha_token.as_deref());
    WireRequest::new(Method::Post, TOKEN_PATH)
        .query_param("grant_type", "password")
        .body(body)
}

fn id_token_request(params: &IdTokenParams) -> WireRequest {
    let mut body = Map::new();
    body.insert("provider".into(), json!(params.provider));
    body.insert("id_token".into(), json!(params.id_token));
    insert_opt(&mut body, "access_token", params.access_token.as_deref());
    insert_opt(&mut body, "nonce", params.nonce.as_deref());
    WireRequest::new(Method::Post, TOKEN_PATH)
        .query_param("grant_type", "id_token")
        .body(body)
}

fn otp_request(params: &OtpParams, pkce: Option<&PkcePair>) -> WireRequest {
    let mut body = Map::new();
    insert_opt(&mut body, "email", params.email.as_deref());
    insert_opt(&mut body, "phone", params.phone.as_deref());
    body.insert("create_user".into(), json!(params.options.create_user));
    if has_phone(&params.phone) {
        body.insert("channel".into(), json!(params.options.channel.as_str()));
    }
    if let Some(data) = &params.options.data {
        body.insert("data".into(), json!(data));
    }
    insert_meta_security(&mut body, params.options.captcha_token.as_deref());
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Post, OTP_PATH)
        .query_opt("redirect_to", params.options.redirect_to.as_deref())
        .body(body)
}

fn sso_request(params: &SsoParams, pkce: Option<&PkcePair>) -> WireRequest {
    let mut body = Map::new();
    insert_opt(&mut body, "provider_id", params.provider_id.as_deref());
    insert_opt(&mut body, "domain", params.domain.as_deref());
    insert_meta_security(&mut body, params.options.captcha_token.as_deref());
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Post, SSO_PATH)
        .query_opt("redirect_to", params.options.redirect_to.as_deref())
        .body(body)
}

fn authorize_request(params: &OAuthParams, pkce: Option<&PkcePair>) -> WireRequest {
    let mut request = WireRequest::new(Method::Get, AUTHORIZE_PATH)
        .query_param("provider", &params.provider)
        .query_opt("scopes", params.options.scopes.as_deref())
        .query_opt("redirect_to", params.options.redirect_to.as_deref());
    for (key, value) in &params.options.query_params {
        request = request.query_param(key, value);
    }
    if let Some(pair) = pkce {
        request = request
            .query_param("code_challenge", &pair.challenge)
            .query_param("code_challenge_method", pair.method());
    }
    request
}

fn sign_up_request(params: &SignUpParams, pkce: Option<&PkcePair>) -> WireRequest {
    let mut body = Map::new();
    insert_opt(&mut body, "email", params.email.as_deref());
    insert_opt(&mut body, "phone", params.phone.as_deref());
    body.insert("password".into(), json!(params.password));
    if has_phone(&params.phone) {
        body.insert("channel".into(), json!(params.options.channel.as_str()));
    }
    if let Some(data) = &params.options.data {
        body.insert("data".into(), json!(data));
    }
    insert_meta_security(&mut body, params.options.captcha_token.as_deref());
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Post, SIGNUP_PATH)
        .query_opt("redirect_to", params.options.redirect_to.as_deref())
        .body(body)
}

pub fn verify_otp_request(params: &VerifyOtpParams) -> WireRequest {
    let mut body = Map::new();
    match params {
        VerifyOtpParams::Phone {
            phone,
            token,
            otp_type,
        } => {
            body.insert("phone".into(), json!(phone));
            body.insert("token".into(), json!(token));
            body.insert("type".into(), json!(otp_type.as_str()));
        }
        VerifyOtpParams::Email {
            email,
            token,
            otp_type,
        } => {
            body.insert("email".into(), json!(email));
            body.insert("token".into(), json!(token));
            body.insert("type".into(), json!(otp_type.as_str()));
        }
        VerifyOtpParams::TokenHash {
            token_hash,
            otp_type,
        } => {
            body.insert("token_hash".into(), json!(token_hash));
            body.insert("type".into(), json!(otp_type.as_str()));
        }
    }
    WireRequest::new(Method::Post, VERIFY_PATH).body(body)
}

pub fn recover_request(
    email: &str,
    captcha_token: Option<&str>,
    redirect_to: Option<&str>,
    pkce: Option<&PkcePair>,
) -> WireRequest {
    let mut body = Map::new();
    body.insert("email".into(), json!(email));
    insert_meta_security(&mut body, captcha_token);
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Post, RECOVER_PATH)
        .query_opt("redirect_to", redirect_to)
        .body(body)
}

pub fn resend_request(
    email: &str,
    resend_type: ResendType,
    captcha_token: Option<&str>,
    redirect_to: Option<&str>,
    pkce: Option<&PkcePair>,
) -> WireRequest {
    let mut body = Map::new();
    body.insert("email".into(), json!(email));
    body.insert("type".into(), json!(resend_type.as_str()));
    insert_meta_security(&mut body, captcha_token);
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Post, RESEND_PATH)
        .query_opt("redirect_to", redirect_to)
        .body(body)
}

pub fn get_user_request() -> WireRequest {
    WireRequest::new(Method::Get, USER_PATH)
}

pub fn update_user_request(attributes: &UserAttributes, pkce: Option<&PkcePair>) -> WireRequest {
    let mut body = Map::new();
    insert_opt(&mut body, "email", attributes.email.as_deref());
    insert_opt(&mut body, "phone", attributes.phone.as_deref());
    insert_opt(&mut body, "password", attributes.password.as_deref());
    if let Some(data) = &attributes.data {
        body.insert("data".into(), json!(data));
    }
    insert_pkce(&mut body, pkce);
    WireRequest::new(Method::Put, USER_PATH).body(body)
}

pub fn refresh_token_request(refresh_token: &str) -> WireRequest {
    let mut body = Map::new();
    body.insert("refresh_token".into(), json!(refresh_token));
    WireRequest::new(Method::Post, TOKEN_PATH)
        .query_param("grant_type", "refresh_token")
        .body(body)
}

/// Second half of the PKCE flow: trade the authorization code plus the
/// retained verifier for a session.
pub fn exchange_code_request(auth_code: &str, verifier: &str) -> WireRequest {
    let mut body = Map::new();
    body.insert("auth_code".into(), json!(auth_code));
    body.insert("code_verifier".into(), json!(verifier));
    WireRequest::new(Method::Post, TOKEN_PATH)
        .query_param("grant_type", "pkce")
        .body(body)
}

/// Which sessions a sign-out should revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutScope {
    #[default]
    Global,
    Local,
    Others,
}

impl SignOutScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Local => "local",
            Self::Others => "others",
        }
    }
}

pub fn sign_out_request(scope: SignOutScope) -> WireRequest {
    WireRequest::new(Method::Post, LOGOUT_PATH).query_param("scope", scope.as_str())
}

// Admin-scoped requests, authorized with the service API key.

pub fn admin_create_user_request(attributes: &AdminUserAttributes) -> WireRequest {
    WireRequest::new(Method::Post, ADMIN_USERS_PATH).body(admin_attributes_body(attributes))
}

pub fn admin_get_user_request(user_id: Uuid) -> WireRequest {
    WireRequest::new(Method::Get, admin_user_path(user_id))
}

pub fn admin_update_user_request(user_id: Uuid, attributes: &AdminUserAttributes) -> WireRequest {
    WireRequest::new(Method::Put, admin_user_path(user_id)).body(admin_attributes_body(attributes))
}

pub fn admin_delete_user_request(user_id: Uuid, soft_delete: bool) -> WireRequest {
    let mut body = Map::new();
    body.insert("should_soft_delete".into(), json!(soft_delete));
    WireRequest::new(Method::Delete, admin_user_path(user_id)).body(body)
}

pub fn admin_list_users_request(params: PageParams) -> WireRequest {
    WireRequest::new(Method::Get, ADMIN_USERS_PATH)
        .query_opt("page", params.page.map(|p| p.to_string()).as_deref())
        .query_opt("per_page", params.per_page.map(|p| p.to_string()).as_deref())
}

pub fn admin_invite_user_request(
    email: &str,
    data: Option<&serde_json::Map<String, Value>>,
    redirect_to: Option<&str>,
) -> WireRequest {
    let mut body = Map::new();
    body.insert("email".into(), json!(email));
    if let Some(data) = data {
        body.insert("data".into(), Value::Object(data.clone()));
    }
    WireRequest::new(Method::Post, INVITE_PATH)
        .query_opt("redirect_to", redirect_to)
        .body(body)
}

pub fn admin_generate_link_request(params: &GenerateLinkParams) -> WireRequest {
    let mut body = Map::new();
    body.insert("type".into(), json!(params.link_type.as_str()));
    body.insert("email".into(), json!(params.email));
    insert_opt(&mut body, "password", params.password.as_deref());
    if let Some(data) = &params.data {
        body.insert("data".into(), json!(data));
    }
    WireRequest::new(Method::Post, ADMIN_GENERATE_LINK_PATH)
        .query_opt("redirect_to", params.redirect_to.as_deref())
        .body(body)
}

fn admin_user_path(user_id: Uuid) -> String {
    format!("{ADMIN_USERS_PATH}/{user_id}")
}

fn admin_attributes_body(attributes: &AdminUserAttributes) -> Map<String, Value> {
    let mut body = Map::new();
    insert_opt(&mut body, "email", attributes.email.as_deref());
    insert_opt(&mut body, "phone", attributes.phone.as_deref());
    insert_opt(&mut body, "password", attributes.password.as_deref());
    if let Some(confirm) = attributes.email_confirm {
        body.insert("email_confirm".into(), json!(confirm));
    }
    if let Some(confirm) = attributes.phone_confirm {
        body.insert("phone_confirm".into(), json!(confirm));
    }
    if let Some(data) = &attributes.user_metadata {
        body.insert("user_metadata".into(), json!(data));
    }
    if let Some(data) = &attributes.app_metadata {
        body.insert("app_metadata".into(), json!(data));
    }
    insert_opt(&mut body, "ban_duration", attributes.ban_duration.as_deref());
    insert_opt(&mut body, "role", attributes.role.as_deref());
    body
}

fn has_phone(phone: &Option<String>) -> bool {
    phone.as_deref().is_some_and(|p| !p.is_empty())
}

/// Absent and empty values are both dropped, never serialized.
fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), json!(v));
    }
}

/// Captcha tokens travel nested under the provider's security field.
fn insert_meta_security(body: &mut Map<String, Value>, captcha_token: Option<&str>) {
    if let Some(token) = captcha_token {
        body.insert(
            "gotrue_meta_security".into(),
            json!({ "captcha_token": token }),
        );
    }
}

fn insert_pkce(body: &mut Map<String, Value>, pkce: Option<&PkcePair>) {
    if let Some(pair) = pkce {
        body.insert("code_challenge".into(), json!(pair.challenge));
        body.insert("code_challenge_method".into(), json!(pair.method()));
    }
}
