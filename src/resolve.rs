//! Resolution of signing keys via [OpenID Connect Discovery].
//!
//! The issuer from the `iss` claim is used to fetch the discovery document
//! (`{iss}/.well-known/openid-configuration`); its `jwks_uri` field points to the key set
//! that must contain a key with the `kid` from the token header.
//!
//! [OpenID Connect Discovery]: https://openid.net/specs/openid-connect-discovery-1_0.html

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{jwk::JsonWebKeySet, Claims, ResolutionError, VerificationError};

/// Path of the discovery document relative to the issuer URL.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Capability to retrieve a document by URL.
///
/// The verifier makes at most two calls per verification: one for the discovery document,
/// and one for the key set. Implementations should not retry on failure.
pub trait Fetch {
    /// Performs a `GET` request and returns the response body.
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use anyhow::Context as _;

    use core::time::Duration;

    use super::Fetch;

    /// [`Fetch`] implementation based on the blocking [`reqwest`] client.
    #[derive(Debug, Clone)]
    #[cfg_attr(docsrs, doc(cfg(feature = "http")))]
    pub struct HttpFetcher {
        client: reqwest::blocking::Client,
    }

    impl HttpFetcher {
        /// Creates a fetcher with the specified timeout applied to each request.
        ///
        /// # Panics
        ///
        /// The underlying [`reqwest::blocking::Client`] panics if it is created or dropped
        /// within an async runtime (e.g., `tokio`). Async callers should implement [`Fetch`]
        /// on top of an async client and use it via `Verifier::with_fetcher()`.
        pub fn new(timeout: Duration) -> anyhow::Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .context("failed to build HTTP client")?;
            Ok(Self { client })
        }

        /// Wraps a preconfigured client. The same restrictions as for [`Self::new()`] apply
        /// to creating and dropping the client.
        pub fn from_client(client: reqwest::blocking::Client) -> Self {
            Self { client }
        }
    }

    impl Fetch for HttpFetcher {
        fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .with_context(|| format!("request to `{url}` failed"))?
                .error_for_status()?;
            let body = response
                .bytes()
                .with_context(|| format!("cannot read response body from `{url}`"))?;
            Ok(body.to_vec())
        }
    }
}

/// Fields of the discovery document used by the verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenIdConfiguration {
    /// Issuer identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// URL of the issuer's JSON Web Key Set.
    pub jwks_uri: String,
}

/// Retrieves PEM-encoded verifying keys for tokens via a [`Fetch`] implementation.
#[derive(Debug)]
pub struct KeyResolver<'a, F: ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: Fetch + ?Sized> KeyResolver<'a, F> {
    /// Creates a resolver based on the specified fetcher.
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    fn fetch_json<T>(&self, url: &str) -> Result<T, ResolutionError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let body = self
            .fetcher
            .fetch(url)
            .map_err(|source| ResolutionError::Fetch {
                url: url.to_owned(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| ResolutionError::MalformedDocument {
            url: url.to_owned(),
            source,
        })
    }

    /// Fetches the discovery document for the specified issuer.
    pub fn discover(&self, issuer: &str) -> Result<OpenIdConfiguration, ResolutionError> {
        let url = format!("{issuer}{DISCOVERY_PATH}");
        debug!(url = %url, "fetching discovery document");
        self.fetch_json(&url)
    }

    /// Fetches the key set from the specified URL.
    pub fn key_set(&self, jwks_uri: &str) -> Result<JsonWebKeySet, ResolutionError> {
        debug!(jwks_uri = %jwks_uri, "fetching key set");
        self.fetch_json(jwks_uri)
    }

    /// Resolves the PEM-encoded key that should have signed a token with the specified
    /// `claims` and `key_id` (the `kid` header field).
    ///
    /// # Errors
    ///
    /// - [`ResolutionError`] if the issuer is absent, or if either document cannot be retrieved.
    /// - [`VerificationError::SigningKeyNotFound`] if no key in the set has a matching `kid`.
    ///   A token without `kid` never matches.
    /// - [`VerificationError::SignatureInvalid`] if the matching key lacks RSA components.
    pub fn resolve(
        &self,
        claims: &Claims,
        key_id: Option<&str>,
    ) -> Result<String, VerificationError> {
        let issuer = claims.issuer().ok_or(ResolutionError::MissingIssuer)?;
        let configuration = self.discover(issuer)?;
        let key_set = self.key_set(&configuration.jwks_uri)?;

        let key = key_id
            .and_then(|key_id| key_set.find(key_id))
            .ok_or(VerificationError::SigningKeyNotFound)?;
        debug!(kid = key_id, keys = key_set.keys.len(), "selected signing key");
        key.to_pem().map_err(|_| VerificationError::SignatureInvalid)
    }
}
