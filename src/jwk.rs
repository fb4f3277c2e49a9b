//! [JSON Web Keys](https://tools.ietf.org/html/rfc7517.html) (JWK) published by the issuer
//! and conversion of RSA keys into PEM.
//!
//! Only the fields needed to select and reconstruct an RSA verifying key are modelled;
//! other JWK fields are ignored during deserialization.
//!
//! # Examples
//!
//! ```
//! use rs256_verifier::jwk::JsonWebKeySet;
//!
//! # fn main() -> anyhow::Result<()> {
//! let json_str = r#"{
//!     "keys": [
//!         { "kty": "RSA", "kid": "key-1", "alg": "RS256", "use": "sig",
//!           "n": "0vx7agoebGcQSuuPiLJXZptN", "e": "AQAB" }
//!     ]
//! }"#;
//! let key_set: JsonWebKeySet = serde_json::from_str(json_str)?;
//! let key = key_set.find("key-1").expect("key is present");
//! let pem = key.to_pem()?;
//! assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----\r\n"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use core::fmt;

use crate::{base64url, der};

/// Errors that can occur when converting a [`JsonWebKey`] into a PEM-encoded public key.
#[derive(Debug)]
#[non_exhaustive]
pub enum JwkError {
    /// Required field is absent from JWK.
    NoField(&'static str),
    /// JWK field is not valid base64url.
    Base64 {
        /// Field name.
        field: &'static str,
        /// Decoding error.
        source: base64ct::Error,
    },
}

impl fmt::Display for JwkError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoField(field) => write!(formatter, "field `{field}` is absent from JWK"),
            Self::Base64 { field, source } => {
                write!(formatter, "field `{field}` is not valid base64url: {source}")
            }
        }
    }
}

impl std::error::Error for JwkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64 { source, .. } => Some(source),
            Self::NoField(_) => None,
        }
    }
}

/// Single key from a [`JsonWebKeySet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key identifier, matched against the `kid` field of the token header.
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    /// Key type, e.g. `RSA`.
    #[serde(rename = "kty", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Algorithm the key is intended for, e.g. `RS256`.
    #[serde(rename = "alg", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Intended key use, e.g. `sig`.
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// RSA modulus, base64url-encoded big-endian unsigned integer.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub modulus: Option<String>,
    /// RSA public exponent, base64url-encoded big-endian unsigned integer.
    #[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
    pub public_exponent: Option<String>,
}

impl JsonWebKey {
    /// Creates an RSA key with the specified base64url-encoded modulus and exponent.
    pub fn rsa(modulus: impl Into<String>, public_exponent: impl Into<String>) -> Self {
        Self {
            key_type: Some("RSA".to_owned()),
            modulus: Some(modulus.into()),
            public_exponent: Some(public_exponent.into()),
            ..Self::default()
        }
    }

    /// Sets the `key_id` field for this key.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Reconstructs the PEM-encoded public key from the `n` and `e` fields.
    pub fn to_pem(&self) -> Result<String, JwkError> {
        let modulus = self.modulus.as_deref().ok_or(JwkError::NoField("n"))?;
        let exponent = self
            .public_exponent
            .as_deref()
            .ok_or(JwkError::NoField("e"))?;

        let modulus = base64url::decode(modulus)
            .map_err(|source| JwkError::Base64 { field: "n", source })?;
        let exponent = base64url::decode(exponent)
            .map_err(|source| JwkError::Base64 { field: "e", source })?;
        Ok(der::pem_armor(&der::subject_public_key_info(
            &modulus, &exponent,
        )))
    }
}

/// Set of keys served from the `jwks_uri` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Keys in the order they were published.
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Returns the first key with the specified identifier.
    pub fn find(&self, key_id: &str) -> Option<&JsonWebKey> {
        self.keys
            .iter()
            .find(|key| key.key_id.as_deref() == Some(key_id))
    }
}

/// Builds a PEM-encoded RSA public key from the base64url-encoded modulus `n`
/// and public exponent `e`.
///
/// The output is deterministic. Key contents are not validated; e.g., an empty modulus
/// produces a structurally valid document that no RSA implementation will accept.
pub fn build_pem(n: &str, e: &str) -> Result<String, base64ct::Error> {
    let modulus = base64url::decode(n)?;
    let exponent = base64url::decode(e)?;
    Ok(der::pem_armor(&der::subject_public_key_info(
        &modulus, &exponent,
    )))
}
