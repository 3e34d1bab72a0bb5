//! GoTrue wire-protocol layer
//!
//! Pure request/response protocol for a GoTrue-compatible identity
//! provider: credential validation, PKCE pair generation, wire-request
//! construction, and response decoding. This crate never touches the
//! network — the companion `gotrue-client` crate supplies transport and
//! orchestration.
//!
//! One call flows in a single direction:
//! 1. Raw input validated into a [`Credential`] variant
//! 2. [`request::build`] turns it into a [`WireRequest`]
//!    (plus a [`PkcePair`] when the client runs the PKCE flow)
//! 3. The transport sends it and hands back status/headers/body
//! 4. `response::decode_*` produces a [`Session`], [`User`], or [`Error`]

pub mod credentials;
pub mod error;
pub mod pagination;
pub mod pkce;
pub mod request;
pub mod response;
pub mod types;

pub use credentials::{
    AdminUserAttributes, Channel, Credential, GenerateLinkParams, IdTokenParams, LinkType,
    OAuthOptions, OAuthParams, OtpOptions, OtpParams, OtpVerifyType, PageParams, PasswordParams,
    ResendType, SignUpOptions, SignUpParams, SsoOptions, SsoParams, UserAttributes,
    VerifyOtpParams,
};
pub use error::{Error, Result};
pub use pagination::decode_pagination;
pub use pkce::{PkcePair, compute_challenge};
pub use request::{Method, SignOutScope, WireRequest};
pub use types::{GeneratedLink, Pagination, Session, User};
