//! PKCE (Proof Key for Code Exchange) pair generation per RFC 7636
//!
//! A pair is generated once per flow invocation when the client is
//! configured for the PKCE flow. The challenge travels with the
//! authorization request; the verifier is held by the caller and sent
//! during the later code exchange to prove both requests came from the
//! same party.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

/// Length of the code verifier in characters. RFC 7636 allows 43-128.
const VERIFIER_LEN: usize = 56;

/// A verifier/challenge pair bound to a single flow invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    /// Random URL-safe string, retained by the caller for the exchange step
    pub verifier: String,
    /// `BASE64URL(SHA256(verifier))`, sent with the authorization request
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh pair from a cryptographically secure source.
    ///
    /// The verifier is 56 bytes of CSPRNG output, URL-safe base64
    /// encoded without padding, truncated to 56 characters.
    pub fn generate() -> Self {
        let mut bytes = [0u8; VERIFIER_LEN];
        rand::rng().fill(&mut bytes);
        let mut verifier = URL_SAFE_NO_PAD.encode(bytes);
        verifier.truncate(VERIFIER_LEN);
        let challenge = compute_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    /// Challenge method name for the wire: `"s256"` unless hashing was
    /// skipped (challenge equal to verifier), which is the degenerate
    /// `"plain"` case and never produced by [`PkcePair::generate`].
    pub fn method(&self) -> &'static str {
        if self.challenge == self.verifier {
            "plain"
        } else {
            "s256"
        }
    }
}

/// Compute the S256 code challenge from a verifier.
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}
