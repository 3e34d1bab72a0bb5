//! Client for a GoTrue-compatible identity provider
//!
//! Orchestrates the `gotrue-proto` protocol layer over a pluggable
//! transport: one public method per credential flow, plus the
//! admin-scoped user management surface. The client is stateless and
//! call-scoped — it returns sessions and users to the caller and keeps
//! nothing, so a single client can serve concurrent callers.
//!
//! Typical flow:
//! 1. Build a [`ClientConfig`] with the auth base URL and API key
//!    (select [`FlowMode::Pkce`] for the PKCE-augmented flows)
//! 2. Wrap it in an [`AuthClient`]
//! 3. Call `sign_in_with_*` / `sign_up` / `verify_otp` / admin ops
//!
//! Framework glue (cookie storage, redirects) lives with the caller;
//! session persistence is explicitly not this crate's concern.

pub mod admin;
pub mod client;
pub mod config;
pub mod secret;
pub mod transport;

pub use admin::{AdminApi, UserList};
pub use client::{AuthClient, OAuthRedirect, SignUpResult};
pub use config::{ClientConfig, FlowMode};
pub use gotrue_proto::{
    AdminUserAttributes, Channel, Error, GenerateLinkParams, GeneratedLink, IdTokenParams,
    LinkType, OAuthOptions, OAuthParams, OtpOptions, OtpParams, OtpVerifyType, PageParams,
    Pagination, PasswordParams, PkcePair, ResendType, Result, Session, SignOutScope,
    SignUpOptions, SignUpParams, SsoOptions, SsoParams, User, UserAttributes, VerifyOtpParams,
};
pub use secret::SecretString;
pub use transport::{HttpTransport, OutboundRequest, RawResponse, Transport};
