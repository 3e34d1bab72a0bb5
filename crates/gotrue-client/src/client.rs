//! Flow orchestration: validate → build → send → decode
//!
//! `AuthClient` is the public seam between application code and the
//! provider's wire protocol. Every operation is one pass through the
//! same four stages, short-circuiting on the first failure, with at
//! most one network round trip. The client holds no session state:
//! decoded sessions and users are returned to the caller and never
//! cached, so one client can serve concurrent callers freely.
//!
//! This is also the only place the configured flow mode is consulted.
//! When it is [`FlowMode::Pkce`], a fresh [`PkcePair`] is generated per
//! invocation and threaded into the request builder; the builders
//! themselves never look at the mode.

use std::sync::Arc;

use gotrue_proto::credentials::{
    Credential, IdTokenParams, OAuthParams, OtpParams, PasswordParams, ResendType, SignUpParams,
    SsoParams, UserAttributes, VerifyOtpParams,
};
use gotrue_proto::{Error, PkcePair, Result, Session, SignOutScope, User, request, response};
use tracing::debug;
use url::Url;

use crate::admin::AdminApi;
use crate::config::{ClientConfig, FlowMode};
use crate::transport::{HttpTransport, OutboundRequest, RawResponse, Transport};

/// Result of the OAuth redirect-URL flow. No network call is made; the
/// application sends the user to `url`. In PKCE mode the pair is
/// returned for the caller to retain until the code exchange — the
/// client does not store it.
#[derive(Debug, Clone)]
pub struct OAuthRedirect {
    pub provider: String,
    pub url: Url,
    pub pkce: Option<PkcePair>,
}

/// Result of sign-up. In PKCE mode the pair must be retained by the
/// caller for the later verification step.
#[derive(Debug, Clone)]
pub struct SignUpResult {
    pub user: User,
    pub pkce: Option<PkcePair>,
}

/// How a request authenticates against the auth service. Every request
/// carries the `apikey` header; the bearer token is either the service
/// API key itself (anonymous and admin calls) or a user access token.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Authorization<'a> {
    ApiKey,
    Bearer(&'a str),
}

/// Stateless client for a GoTrue-compatible auth service.
#[derive(Clone)]
pub struct AuthClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl AuthClient {
    /// Build a client using the default reqwest-backed transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Admin surface, authorized with the service API key.
    pub fn admin(&self) -> AdminApi<'_> {
        AdminApi::new(self)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sign in with email/phone and password. The password grant has no
    /// PKCE variant.
    pub async fn sign_in_with_password(&self, params: PasswordParams) -> Result<Session> {
        let credential = Credential::password(params)?;
        let wire = request::build(&credential, None);
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_session(raw.status, &raw.body)
    }

    /// Sign in with an OIDC ID token issued by an external provider.
    pub async fn sign_in_with_id_token(&self, params: IdTokenParams) -> Result<Session> {
        let credential = Credential::id_token(params)?;
        let wire = request::build(&credential, None);
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_session(raw.status, &raw.body)
    }

    /// Request a one-time password. A phone delivery resolves to
    /// `Ok(None)`; an email delivery reports the provider's message id.
    pub async fn sign_in_with_otp(&self, params: OtpParams) -> Result<Option<String>> {
        // An empty phone string counts as absent, same as in validation.
        let phone = params.phone.as_deref().is_some_and(|p| !p.is_empty());
        let credential = Credential::otp(params)?;
        let pkce = self.pkce_pair();
        let wire = request::build(&credential, pkce.as_ref());
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_otp(raw.status, &raw.body, phone)
    }

    /// Start an SSO sign-in; yields the identity provider redirect URL.
    pub async fn sign_in_with_sso(&self, params: SsoParams) -> Result<String> {
        let credential = Credential::sso(params)?;
        let pkce = self.pkce_pair();
        let wire = request::build(&credential, pkce.as_ref());
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_sso(raw.status, &raw.body)
    }

    /// Build the OAuth authorization redirect. Purely local: validates,
    /// assembles the URL, and returns without any network call.
    pub fn sign_in_with_oauth(&self, params: OAuthParams) -> Result<OAuthRedirect> {
        let provider = params.provider.clone();
        let credential = Credential::oauth(params)?;
        let pkce = self.pkce_pair();
        let wire = request::build(&credential, pkce.as_ref());
        let url = self.config.endpoint(&wire)?;
        Ok(OAuthRedirect {
            provider,
            url,
            pkce,
        })
    }

    /// Register a new user.
    pub async fn sign_up(&self, params: SignUpParams) -> Result<SignUpResult> {
        let credential = Credential::sign_up(params)?;
        let pkce = self.pkce_pair();
        let wire = request::build(&credential, pkce.as_ref());
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        let user = response::decode_user(raw.status, &raw.body)?;
        Ok(SignUpResult { user, pkce })
    }

    /// Verify a one-time password and obtain a session.
    pub async fn verify_otp(&self, params: VerifyOtpParams) -> Result<Session> {
        params.validate()?;
        let wire = request::verify_otp_request(&params);
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_session(raw.status, &raw.body)
    }

    /// Fetch the user the access token belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<User> {
        let wire = request::get_user_request();
        let raw = self.execute(wire, Authorization::Bearer(access_token)).await?;
        response::decode_user(raw.status, &raw.body)
    }

    /// Update the authenticated user's attributes.
    pub async fn update_user(
        &self,
        access_token: &str,
        attributes: UserAttributes,
    ) -> Result<User> {
        attributes.validate()?;
        let pkce = self.pkce_pair();
        let wire = request::update_user_request(&attributes, pkce.as_ref());
        let raw = self.execute(wire, Authorization::Bearer(access_token)).await?;
        response::decode_user(raw.status, &raw.body)
    }

    /// Send a password recovery email. Success is side-effect-only.
    pub async fn reset_password_for_email(
        &self,
        email: &str,
        captcha_token: Option<&str>,
        redirect_to: Option<&str>,
    ) -> Result<()> {
        if email.is_empty() {
            return Err(Error::validation("email", "must not be empty"));
        }
        let pkce = self.pkce_pair();
        let wire = request::recover_request(email, captcha_token, redirect_to, pkce.as_ref());
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_no_content(raw.status, &raw.body)
    }

    /// Resend a signup or email-change confirmation message.
    pub async fn resend(
        &self,
        email: &str,
        resend_type: ResendType,
        captcha_token: Option<&str>,
        redirect_to: Option<&str>,
    ) -> Result<()> {
        if email.is_empty() {
            return Err(Error::validation("email", "must not be empty"));
        }
        let pkce = self.pkce_pair();
        let wire = request::resend_request(email, resend_type, captcha_token, redirect_to, pkce.as_ref());
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_no_content(raw.status, &raw.body)
    }

    /// Trade a refresh token for a fresh session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        if refresh_token.is_empty() {
            return Err(Error::validation("refresh_token", "must not be empty"));
        }
        let wire = request::refresh_token_request(refresh_token);
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_session(raw.status, &raw.body)
    }

    /// Complete the PKCE flow: exchange the authorization code plus the
    /// caller-retained verifier for a session.
    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        verifier: &str,
    ) -> Result<Session> {
        if auth_code.is_empty() {
            return Err(Error::validation("auth_code", "must not be empty"));
        }
        if verifier.is_empty() {
            return Err(Error::validation("code_verifier", "must not be empty"));
        }
        let wire = request::exchange_code_request(auth_code, verifier);
        let raw = self.execute(wire, Authorization::ApiKey).await?;
        response::decode_session(raw.status, &raw.body)
    }

    /// Revoke the session behind the access token. A session that is
    /// already gone counts as success.
    pub async fn sign_out(&self, access_token: &str, scope: SignOutScope) -> Result<()> {
        let wire = request::sign_out_request(scope);
        let raw = self.execute(wire, Authorization::Bearer(access_token)).await?;
        response::decode_sign_out(raw.status, &raw.body)
    }

    /// A fresh PKCE pair when the client runs the PKCE flow, once per
    /// invocation. Builders never make this decision.
    fn pkce_pair(&self) -> Option<PkcePair> {
        match self.config.flow() {
            FlowMode::Pkce => Some(PkcePair::generate()),
            FlowMode::Implicit => None,
        }
    }

    pub(crate) async fn execute(
        &self,
        wire: gotrue_proto::WireRequest,
        auth: Authorization<'_>,
    ) -> Result<RawResponse> {
        let url = self.config.endpoint(&wire)?;
        let bearer = match auth {
            Authorization::ApiKey => self.config.api_key().expose(),
            Authorization::Bearer(token) => token,
        };
        let headers = vec![
            ("apikey".to_string(), self.config.api_key().expose().to_string()),
            ("authorization".to_string(), format!("Bearer {bearer}")),
        ];

        debug!(method = wire.method.as_str(), path = %wire.path, "dispatching auth request");
        let raw = self
            .transport
            .send(OutboundRequest {
                method: wire.method,
                url,
                headers,
                body: wire.body,
            })
            .await?;
        debug!(status = raw.status, path = %wire.path, "auth response received");
        Ok(raw)
    }
}
