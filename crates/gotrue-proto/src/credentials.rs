//! Credential schemas for each sign-in flow
//!
//! Raw caller input is validated exactly once, at this boundary, into a
//! [`Credential`] variant. Downstream code matches on the variant and
//! never re-inspects which optional fields were present. All validation
//! failures are reported before any network traffic happens.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{Error, Result};

/// Delivery channel for phone-based OTP messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Sms,
    Whatsapp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "sms",
            Self::Whatsapp => "whatsapp",
        }
    }
}

/// Options shared by the OTP sign-in flow.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpOptions {
    /// Create the user on first sign-in when they don't exist yet
    pub create_user: bool,
    pub channel: Channel,
    pub captcha_token: Option<String>,
    pub redirect_to: Option<String>,
    /// Arbitrary user metadata stored on creation
    pub data: Option<HashMap<String, Value>>,
}

impl Default for OtpOptions {
    fn default() -> Self {
        Self {
            create_user: true,
            channel: Channel::Sms,
            captcha_token: None,
            redirect_to: None,
            data: None,
        }
    }
}

/// Options for the sign-up flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpOptions {
    pub data: Option<HashMap<String, Value>>,
    pub captcha_token: Option<String>,
    pub redirect_to: Option<String>,
    pub channel: Channel,
}

/// Options for the SSO flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SsoOptions {
    pub captcha_token: Option<String>,
    pub redirect_to: Option<String>,
}

/// Options for the OAuth redirect-URL flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthOptions {
    pub scopes: Option<String>,
    pub redirect_to: Option<String>,
    /// Extra provider-specific query parameters, appended verbatim
    pub query_params: Vec<(String, String)>,
}

/// Raw input for password sign-in. At least one of email/phone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub captcha_token: Option<String>,
}

/// Raw input for OTP sign-in. At least one of email/phone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OtpParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub options: OtpOptions,
}

/// Raw input for ID-token sign-in (OIDC providers).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdTokenParams {
    pub provider: String,
    pub id_token: String,
    pub access_token: Option<String>,
    pub nonce: Option<String>,
}

/// Raw input for SSO sign-in. At least one of provider_id/domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SsoParams {
    pub provider_id: Option<String>,
    pub domain: Option<String>,
    pub options: SsoOptions,
}

/// Raw input for the OAuth redirect-URL flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OAuthParams {
    pub provider: String,
    pub options: OAuthOptions,
}

/// Raw input for sign-up. At least one of email/phone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpParams {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: String,
    pub options: SignUpOptions,
}

/// A validated, flow-specific credential. One variant per sign-in shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    Password(PasswordParams),
    Otp(OtpParams),
    IdToken(IdTokenParams),
    Sso(SsoParams),
    OAuth(OAuthParams),
    SignUp(SignUpParams),
}

impl Credential {
    pub fn password(params: PasswordParams) -> Result<Self> {
        one_of("email", &params.email, "phone", &params.phone)?;
        require("password", &params.password)?;
        optional_non_empty("captcha_token", &params.captcha_token)?;
        Ok(Self::Password(params))
    }

    pub fn otp(params: OtpParams) -> Result<Self> {
        one_of("email", &params.email, "phone", &params.phone)?;
        optional_non_empty("captcha_token", &params.options.captcha_token)?;
        optional_non_empty("redirect_to", &params.options.redirect_to)?;
        Ok(Self::Otp(params))
    }

    pub fn id_token(params: IdTokenParams) -> Result<Self> {
        require("provider", &params.provider)?;
        require("id_token", &params.id_token)?;
        Ok(Self::IdToken(params))
    }

    pub fn sso(params: SsoParams) -> Result<Self> {
        one_of("provider_id", &params.provider_id, "domain", &params.domain)?;
        optional_non_empty("captcha_token", &params.options.captcha_token)?;
        optional_non_empty("redirect_to", &params.options.redirect_to)?;
        Ok(Self::Sso(params))
    }

    pub fn oauth(params: OAuthParams) -> Result<Self> {
        require("provider", &params.provider)?;
        optional_non_empty("redirect_to", &params.options.redirect_to)?;
        Ok(Self::OAuth(params))
    }

    pub fn sign_up(params: SignUpParams) -> Result<Self> {
        one_of("email", &params.email, "phone", &params.phone)?;
        require("password", &params.password)?;
        optional_non_empty("captcha_token", &params.options.captcha_token)?;
        optional_non_empty("redirect_to", &params.options.redirect_to)?;
        Ok(Self::SignUp(params))
    }
}

/// What kind of secret a verify-OTP request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerifyType {
    Signup,
    Invite,
    Magiclink,
    Recovery,
    EmailChange,
    Sms,
    PhoneChange,
}

impl OtpVerifyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Invite => "invite",
            Self::Magiclink => "magiclink",
            Self::Recovery => "recovery",
            Self::EmailChange => "email_change",
            Self::Sms => "sms",
            Self::PhoneChange => "phone_change",
        }
    }
}

/// Verify-OTP input, one variant per accepted shape. Each shape is
/// validated independently.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyOtpParams {
    Phone {
        phone: String,
        token: String,
        otp_type: OtpVerifyType,
    },
    Email {
        email: String,
        token: String,
        otp_type: OtpVerifyType,
    },
    TokenHash {
        token_hash: String,
        otp_type: OtpVerifyType,
    },
}

impl VerifyOtpParams {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Phone { phone, token, .. } => {
                require("phone", phone)?;
                require("token", token)
            }
            Self::Email { email, token, .. } => {
                require("email", email)?;
                require("token", token)
            }
            Self::TokenHash { token_hash, .. } => require("token_hash", token_hash),
        }
    }
}

/// Mutable attributes for the authenticated user (PUT /user).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAttributes {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub data: Option<HashMap<String, Value>>,
}

impl UserAttributes {
    pub fn validate(&self) -> Result<()> {
        if self.email.is_none()
            && self.phone.is_none()
            && self.password.is_none()
            && self.data.is_none()
        {
            return Err(Error::validation(
                "attributes",
                "at least one attribute must be set",
            ));
        }
        optional_non_empty("email", &self.email)?;
        optional_non_empty("phone", &self.phone)?;
        optional_non_empty("password", &self.password)
    }
}

/// Attributes for admin-side user creation and update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminUserAttributes {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub email_confirm: Option<bool>,
    pub phone_confirm: Option<bool>,
    pub user_metadata: Option<HashMap<String, Value>>,
    pub app_metadata: Option<HashMap<String, Value>>,
    /// e.g. "24h" or "none" to lift an existing ban
    pub ban_duration: Option<String>,
    pub role: Option<String>,
}

impl AdminUserAttributes {
    /// Validation for user creation, which needs a contact point.
    pub fn validate_for_create(&self) -> Result<()> {
        one_of("email", &self.email, "phone", &self.phone)?;
        optional_non_empty("password", &self.password)
    }
}

/// Kind of one-time link produced by the admin generate-link operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Signup,
    Invite,
    Magiclink,
    Recovery,
    EmailChangeCurrent,
    EmailChangeNew,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Invite => "invite",
            Self::Magiclink => "magiclink",
            Self::Recovery => "recovery",
            Self::EmailChangeCurrent => "email_change_current",
            Self::EmailChangeNew => "email_change_new",
        }
    }
}

/// Input for admin generate-link.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateLinkParams {
    pub link_type: LinkType,
    pub email: String,
    /// Required for `LinkType::Signup`
    pub password: Option<String>,
    pub data: Option<HashMap<String, Value>>,
    pub redirect_to: Option<String>,
}

impl GenerateLinkParams {
    pub fn validate(&self) -> Result<()> {
        require("email", &self.email)?;
        if self.link_type == LinkType::Signup && self.password.is_none() {
            return Err(Error::validation("password", "required for signup links"));
        }
        optional_non_empty("redirect_to", &self.redirect_to)
    }
}

/// Which confirmation message to resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendType {
    Signup,
    EmailChange,
}

impl ResendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::EmailChange => "email_change",
        }
    }
}

/// Page selection for admin list-users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Require that at least one of two fields is present and non-empty.
/// Both present is allowed. Failure names both fields.
fn one_of(
    name_a: &str,
    value_a: &Option<String>,
    name_b: &str,
    value_b: &Option<String>,
) -> Result<()> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    if present(value_a) || present(value_b) {
        Ok(())
    } else {
        Err(Error::validation(
            format!("{name_a}/{name_b}"),
            format!("at least one of {name_a} or {name_b} is required"),
        ))
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::validation(name, "must not be empty"))
    } else {
        Ok(())
    }
}

fn optional_non_empty(name: &str, value: &Option<String>) -> Result<()> {
    match value.as_deref() {
        Some("") => Err(Error::validation(name, "must not be empty when set")),
        _ => Ok(()),
    }
}
