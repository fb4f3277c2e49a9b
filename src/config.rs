//! Verifier configuration.

use core::time::Duration;

use crate::TimeOptions;

/// Default timeout for each HTTP request made during key resolution.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Expected claim values and other options for a [`Verifier`](crate::Verifier).
///
/// Every expectation is optional; an unset (or empty) expectation imposes no constraint
/// on the corresponding claim.
///
/// # Examples
///
/// ```
/// use rs256_verifier::VerifierConfig;
/// use std::time::Duration;
///
/// let config = VerifierConfig::new()
///     .with_issuer("https://example.okta.com/oauth2/default")
///     .with_audience("api://default")
///     .with_client_id("0oa1b2c3d4")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.audience(), Some("api://default"));
/// assert_eq!(config.nonce(), None);
/// ```
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    audience: Option<String>,
    client_id: Option<String>,
    issuer: Option<String>,
    nonce: Option<String>,
    pem: Option<String>,
    time_options: TimeOptions,
    timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    Some(value.into()).filter(|value| !value.is_empty())
}

impl VerifierConfig {
    /// Creates a configuration without expectations.
    pub fn new() -> Self {
        Self {
            audience: None,
            client_id: None,
            issuer: None,
            nonce: None,
            pem: None,
            time_options: TimeOptions::default(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Sets the expected `aud` claim.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = non_empty(audience);
        self
    }

    /// Sets the expected `cid` claim.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = non_empty(client_id);
        self
    }

    /// Sets the expected `iss` claim.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = non_empty(issuer);
        self
    }

    /// Sets the expected `nonce` claim.
    #[must_use]
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = non_empty(nonce);
        self
    }

    /// Sets a PEM-encoded RSA public key to verify signatures with. When set, the issuer's
    /// discovery document and key set are not fetched.
    ///
    /// Both `PUBLIC KEY` (SPKI) and `RSA PUBLIC KEY` (PKCS#1) documents are accepted.
    #[must_use]
    pub fn with_pem(mut self, pem: impl Into<String>) -> Self {
        self.pem = non_empty(pem);
        self
    }

    /// Sets time-related validation options.
    #[must_use]
    pub fn with_time_options(mut self, time_options: TimeOptions) -> Self {
        self.time_options = time_options;
        self
    }

    /// Sets the timeout for each HTTP request made during key resolution.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Expected `aud` claim.
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    /// Expected `cid` claim.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Expected `iss` claim.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Expected `nonce` claim.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// PEM-encoded key overriding key resolution.
    pub fn pem(&self) -> Option<&str> {
        self.pem.as_deref()
    }

    /// Time-related validation options.
    pub fn time_options(&self) -> &TimeOptions {
        &self.time_options
    }

    /// Timeout for HTTP requests.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
