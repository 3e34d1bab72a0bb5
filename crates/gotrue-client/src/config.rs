//! Client configuration: base URL, API key, flow mode
//!
//! Built once by the caller and read-only afterward. The flow mode is
//! the single switch between the implicit grant and the PKCE-augmented
//! variant of every sign-in flow.

use gotrue_proto::{Error, Result, WireRequest};
use url::Url;

use crate::secret::SecretString;

/// Which sign-in flow variant the client runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowMode {
    #[default]
    Implicit,
    Pkce,
}

/// Immutable client configuration for one auth service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    api_key: SecretString,
    flow: FlowMode,
}

impl ClientConfig {
    /// Validate the auth base URL (e.g. `https://x.co/auth/v1`) and pair
    /// it with the API key. Defaults to the implicit flow.
    pub fn new(base_url: &str, api_key: impl Into<SecretString>) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::validation("base_url", e.to_string()))?;
        if !base_url.has_host() {
            return Err(Error::validation("base_url", "must carry a host"));
        }
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            flow: FlowMode::default(),
        })
    }

    pub fn with_flow(mut self, flow: FlowMode) -> Self {
        self.flow = flow;
        self
    }

    pub fn flow(&self) -> FlowMode {
        self.flow
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Resolve a wire request against the base URL, appending its path
    /// suffix and encoding the query parameters.
    pub fn endpoint(&self, request: &WireRequest) -> Result<Url> {
        // Url prints a bare authority with a trailing slash; trim it so
        // the path suffix never doubles up.
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", request.path))
            .map_err(|e| Error::validation("url", e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use gotrue_proto::{Method, WireRequest};

    use super::*;

    fn request(path: &str, query: Vec<(String, String)>) -> WireRequest {
        WireRequest {
            method: Method::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    #[test]
    fn rejects_garbage_base_url() {
        assert!(ClientConfig::new("not a url", "key").is_err());
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let config = ClientConfig::new("https://x.co/auth/v1/", "key").unwrap();
        let url = config.endpoint(&request("/token", vec![])).unwrap();
        assert_eq!(url.as_str(), "https://x.co/auth/v1/token");
    }

    #[test]
    fn query_parameters_are_encoded() {
        let config = ClientConfig::new("https://x.co/auth/v1", "key").unwrap();
        let url = config
            .endpoint(&request(
                "/otp",
                vec![("redirect_to".into(), "https://app.example/a b".into())],
            ))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://x.co/auth/v1/otp?redirect_to=https%3A%2F%2Fapp.example%2Fa+b"
        );
    }

    #[test]
    fn default_flow_is_implicit() {
        let config = ClientConfig::new("https://x.co/auth/v1", "key").unwrap();
        assert_eq!(config.flow(), FlowMode::Implicit);
        let config = config.with_flow(FlowMode::Pkce);
        assert_eq!(config.flow(), FlowMode::Pkce);
    }
}
