//! Verification pipeline tying together token parsing, claim validation, key resolution
//! and signature verification.

use tracing::{debug, warn};

use core::fmt;

use crate::{
    alg::{parse_public_key, Rs256, RsaSignature},
    resolve::{Fetch, KeyResolver},
    Claims, UntrustedToken, VerificationError, VerifierConfig,
};

#[cfg(feature = "http")]
use crate::resolve::HttpFetcher;

/// Stage reached by a verification.
///
/// Stages are passed in order; a failure at any stage terminates the verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum VerificationState {
    /// Nothing is checked yet.
    Init,
    /// Token is split into segments and its header and claims are decoded.
    Decomposed,
    /// Header algorithm is checked.
    StructureChecked,
    /// Claims are validated against the configured expectations.
    ClaimsChecked,
    /// Verifying key is obtained.
    KeyResolved,
    /// Signature is checked.
    SignatureChecked,
    /// Verification has succeeded.
    Verified,
}

impl fmt::Display for VerificationState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Init => "init",
            Self::Decomposed => "decomposed",
            Self::StructureChecked => "structure checked",
            Self::ClaimsChecked => "claims checked",
            Self::KeyResolved => "key resolved",
            Self::SignatureChecked => "signature checked",
            Self::Verified => "verified",
        })
    }
}

/// Verifier of `RS256`-signed tokens.
///
/// The verifier is immutable once created, so a single instance can be shared among threads
/// (provided that the fetcher is `Sync`) and used to verify any number of tokens.
///
/// # Examples
///
/// ```no_run
/// use rs256_verifier::{Verifier, VerifierConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = VerifierConfig::new()
///     .with_issuer("https://example.okta.com/oauth2/default")
///     .with_audience("api://default");
/// let verifier = Verifier::new(config)?;
///
/// # let token = "";
/// match verifier.verify(token) {
///     Ok(claims) => println!("subject: {:?}", claims.get("sub")),
///     Err(err) => println!("{}", err.report()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[cfg(feature = "http")]
pub struct Verifier<F = HttpFetcher> {
    config: VerifierConfig,
    fetcher: F,
}

/// Verifier of `RS256`-signed tokens.
#[derive(Debug)]
#[cfg(not(feature = "http"))]
pub struct Verifier<F> {
    config: VerifierConfig,
    fetcher: F,
}

#[cfg(feature = "http")]
impl Verifier {
    /// Creates a verifier that fetches keys over HTTP(S), using the timeout
    /// from `config`.
    ///
    /// # Panics
    ///
    /// Panics if called, or if the verifier is dropped, within an async runtime such as `tokio`,
    /// since the verifier uses a blocking HTTP client ([`HttpFetcher`]). In async code, use
    /// [`Self::with_fetcher()`] with a [`Fetch`] implementation based on an async client,
    /// or run verification on a dedicated blocking thread.
    #[cfg_attr(docsrs, doc(cfg(feature = "http")))]
    pub fn new(config: VerifierConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config.timeout())?;
        Ok(Self { config, fetcher })
    }
}

impl<F: Fetch> Verifier<F> {
    /// Creates a verifier with a custom document fetcher.
    pub fn with_fetcher(config: VerifierConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Returns the configuration of this verifier.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies a token in the compact serialization and returns its claims.
    ///
    /// Checks are performed in the following order, stopping at the first failure:
    ///
    /// 1. Token structure and the `alg` header field (must be `RS256`)
    /// 2. `iat` and `exp` claims against the current time
    /// 3. `aud`, `cid`, `iss` and `nonce` claims against the configured expectations
    /// 4. Signature, using either the PEM key from the configuration, or the issuer's key
    ///    with the `kid` from the token header
    ///
    /// # Errors
    ///
    /// Returns an error describing the first failed check.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let mut state = VerificationState::Init;
        self.verify_inner(token, &mut state).map_err(|err| {
            warn!(state = %state, summary = err.summary(), "token verification failed");
            err
        })
    }

    fn verify_inner(
        &self,
        token: &str,
        state: &mut VerificationState,
    ) -> Result<Claims, VerificationError> {
        let token = UntrustedToken::new(token)?;
        advance(state, VerificationState::Decomposed);

        if token.algorithm() != Rs256::NAME {
            return Err(VerificationError::UnsupportedAlgorithm(
                token.algorithm().to_owned(),
            ));
        }
        advance(state, VerificationState::StructureChecked);

        self.validate_claims(token.claims())?;
        advance(state, VerificationState::ClaimsChecked);

        let pem = match self.config.pem() {
            Some(pem) => pem.to_owned(),
            None => KeyResolver::new(&self.fetcher)
                .resolve(token.claims(), token.header().key_id.as_deref())?,
        };
        let verifying_key =
            parse_public_key(&pem).map_err(|_| VerificationError::SignatureInvalid)?;
        advance(state, VerificationState::KeyResolved);

        let signature = RsaSignature::from_segment(token.signature_segment())
            .map_err(|_| VerificationError::SignatureInvalid)?;
        if !Rs256.verify_signature(&signature, &verifying_key, token.signed_data()) {
            return Err(VerificationError::SignatureInvalid);
        }
        advance(state, VerificationState::SignatureChecked);

        advance(state, VerificationState::Verified);
        Ok(token.into_claims())
    }

    fn validate_claims(&self, claims: &Claims) -> Result<(), VerificationError> {
        let config = &self.config;
        let time_options = config.time_options();
        claims
            .validate_issued_at(time_options)?
            .validate_expiration(time_options)?;

        if let Some(audience) = config.audience() {
            claims.validate_audience(audience)?;
        }
        if let Some(client_id) = config.client_id() {
            claims.validate_client_id(client_id)?;
        }
        if let Some(issuer) = config.issuer() {
            claims.validate_issuer(issuer)?;
        }
        if let Some(nonce) = config.nonce() {
            claims.validate_nonce(nonce)?;
        }
        Ok(())
    }
}

fn advance(state: &mut VerificationState, next: VerificationState) {
    debug!(from = %state, to = %next, "verification progressed");
    *state = next;
}
