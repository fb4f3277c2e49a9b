//! Verification of [JSON web tokens (JWT)][JWT] signed with `RS256` by an [OpenID Connect]
//! provider.
//!
//! # Design choices
//!
//! - Only `RS256` (RSASSA-PKCS1-v1_5 with SHA-256) is accepted. A token announcing any other
//!   `alg` in its header is rejected before anything else is checked; this eliminates
//!   [algorithm switching attacks][switching].
//! - Verifying keys are discovered from the `iss` claim: the provider's
//!   [discovery document] points to a [JSON Web Key Set][JWK], and the key with the `kid`
//!   from the token header is converted to a PEM-encoded public key. Alternatively,
//!   a PEM key may be supplied in the configuration, in which case nothing is fetched.
//! - Expectations (audience, client ID, issuer and nonce) are supplied once via
//!   [`VerifierConfig`]. A [`Verifier`] is immutable afterwards and can be shared among threads.
//! - Every failure is reported as a [`VerificationError`] with a fixed human-readable
//!   [summary](VerificationError::summary()), safe to be returned to the token holder.
//!
//! # Crate features
//!
//! - `http` (on by default) provides [`HttpFetcher`](resolve::HttpFetcher), a blocking
//!   [`reqwest`] client used by [`Verifier::new()`]. Without it, documents are retrieved
//!   via a custom [`Fetch`](resolve::Fetch) implementation.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: verification progress and fetched URLs
//! on the `DEBUG` level, and verification failures on the `WARN` level. Neither tokens
//! nor key material are logged.
//!
//! [JWT]: https://jwt.io/
//! [OpenID Connect]: https://openid.net/connect/
//! [switching]: https://auth0.com/blog/critical-vulnerabilities-in-json-web-token-libraries/
//! [discovery document]: https://openid.net/specs/openid-connect-discovery-1_0.html
//! [JWK]: https://tools.ietf.org/html/rfc7517.html
//! [`reqwest`]: https://docs.rs/reqwest/
//! [`tracing`]: https://docs.rs/tracing/
//!
//! # Examples
//!
//! Verifying a token with a known key:
//!
//! ```
//! use rs256_verifier::{jwk::build_pem, prelude::*, VerificationError};
//! # use rs256_verifier::resolve::Fetch;
//! # struct Offline;
//! # impl Fetch for Offline {
//! #     fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
//! #         anyhow::bail!("unexpected request to {url}")
//! #     }
//! # }
//!
//! # fn main() -> anyhow::Result<()> {
//! // RSA components as published in a JWK.
//! let pem = build_pem(
//!     "nzyis1ZjfNB0bBgKFMSvvkTtwlvBsaJq7S5wA-kzeVOVpVWwkWdVha4s38XM_pa_yr47av7-z3VTmvDRyAHc\
//!      aT92whREFpLv9cj5lTeJSibyr_Mrm_YtjCZVWgaOYIhwrXwKLqPr_11inWsAkfIytvHWTxZYEcXLgAXFuUu\
//!      aS3uF9gEiNQwzGTU1v0FqkqTBr4B8nW3HCN47XUu0t8Y0e-lf4s4OxQawWD79J9_5d3Ry0vbV3Am1FtGJiJ\
//!      vOwRsIfVChDpYStTcHTCMqtvWbV6L11BWkpzGXSW4Hv43qa-GSYOD2QU68Mb59oSk2OB-BtOLpJofmbGEGg\
//!      vmwyCI9Mw",
//!     "AQAB",
//! )?;
//! let config = VerifierConfig::new()
//!     .with_pem(pem)
//!     .with_issuer("https://issuer.example")
//!     .with_audience("api://default");
//! let verifier = Verifier::with_fetcher(config, Offline);
//!
//! // The token has expired long ago.
//! let token = "eyJhbGciOiJSUzI1NiIsImtpZCI6InRlc3Qta2V5IiwidHlwIjoiSldUIn0.\
//!     eyJzdWIiOiIxMjM0NTY3ODkwIiwiaXNzIjoiaHR0cHM6Ly9pc3N1ZXIuZXhhbXBsZSIsImF1ZCI6ImFwaT\
//!     ovL2RlZmF1bHQiLCJpYXQiOjE3MDAwMDAwMDAsImV4cCI6MTcwMDAwMzYwMH0.F4stzqXrm4otpRFwrpqvDg\
//!     3zzhQY6dqBMwgGIU1_ycPbzV4-q9ZuEYolYbSuWej59GYe0zIE8CcGiFZMrPQTHrY0rSxQ08j_Mx4OYt8uA3\
//!     Xa59FiEsA4wdqHNIWd5eUprTDEX-NZlGPTTE2YqGZZ4zvCnl-3X5b_cL4IGYY3X2DiqsG2nce1ldmaoKxeGO\
//!     3Xaj_KOdmtsLwKJTeA8XqYsNfa0DEWuhPqJA-5bbS7qzQQGVbkevJ9piux-XSr4_9XbxWdhflZtXYXwVIPJo\
//!     lpsmbXW18DRad-frZNaybAxwGOV06v0mA-iozv6A9Y8uMZOJFdvurjVOaBevhS2u-WCw";
//! let err = verifier.verify(token).unwrap_err();
//! assert!(matches!(err, VerificationError::Expired));
//! assert_eq!(
//!     err.report().to_string(),
//!     r#"{"error":{"errorSummary":"The JWT is expired."}}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Verifying tokens issued by an OpenID provider:
//!
//! ```no_run
//! use rs256_verifier::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = VerifierConfig::new()
//!     .with_issuer("https://example.okta.com/oauth2/default")
//!     .with_client_id("0oa1b2c3d4")
//!     .with_time_options(TimeOptions::from_leeway(chrono::Duration::seconds(30)));
//! let verifier = Verifier::new(config)?;
//! # let token = "";
//! let claims = verifier.verify(token)?;
//! println!("subject: {:?}", claims.get("sub"));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/rs256-verifier/0.1.0")]
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub mod alg;
pub mod base64url;
mod claims;
mod config;
pub mod der;
mod error;
pub mod jwk;
pub mod resolve;
mod token;
mod verifier;

/// Prelude to neatly import all necessary stuff from the crate.
pub mod prelude {
    pub use crate::{Claims, TimeOptions, UntrustedToken, Verifier, VerifierConfig};
}

pub use crate::{
    claims::{Claims, TimeOptions},
    config::{VerifierConfig, DEFAULT_HTTP_TIMEOUT},
    error::{ErrorReport, ErrorSummary, ParseError, ResolutionError, VerificationError},
    token::{Header, UntrustedToken},
    verifier::{VerificationState, Verifier},
};
