//! `UntrustedToken` and closely related types.

use serde::{Deserialize, Serialize};

use crate::{base64url, Claims, ParseError};

/// JWT header.
///
/// See [RFC 7515](https://tools.ietf.org/html/rfc7515#section-4.1) for the description
/// of the fields. Since these values are provided by the token holder, none of them
/// is trusted before the signature is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Header {
    /// Signature algorithm. This field is renamed to [`alg`] for serialization;
    /// it is empty if absent from the token.
    ///
    /// [`alg`]: https://www.rfc-editor.org/rfc/rfc7515.html#section-4.1.1
    #[serde(rename = "alg", default)]
    pub algorithm: String,

    /// Identifier of the key that has signed the token. This field is renamed to [`kid`]
    /// for serialization.
    ///
    /// [`kid`]: https://www.rfc-editor.org/rfc/rfc7515.html#section-4.1.4
    #[serde(rename = "kid", default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// URL of the JSON Web Key Set containing the key that has signed the token.
    /// This field is renamed to [`jku`] for serialization. It is informational only;
    /// keys are always resolved via the issuer's discovery document.
    ///
    /// [`jku`]: https://www.rfc-editor.org/rfc/rfc7515.html#section-4.1.2
    #[serde(rename = "jku", default, skip_serializing_if = "Option::is_none")]
    pub key_set_url: Option<String>,

    /// Application-specific [token type]. This field is renamed to `typ` for serialization.
    ///
    /// [token type]: https://tools.ietf.org/html/rfc7519#section-5.1
    #[serde(rename = "typ", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// Parsed, but unvalidated token.
///
/// Keeps the original base64url segments (the signature is computed over their text)
/// together with the decoded header and claims.
///
/// # Examples
///
/// ```
/// use rs256_verifier::UntrustedToken;
///
/// # fn main() -> anyhow::Result<()> {
/// let token_str = "eyJhbGciOiJSUzI1NiIsImtpZCI6ImtleS0xIn0.\
///                  eyJpc3MiOiJodHRwczovL2lzc3Vlci5leGFtcGxlIn0.c2ln";
/// let token = UntrustedToken::new(token_str)?;
/// assert_eq!(token.algorithm(), "RS256");
/// assert_eq!(token.header().key_id.as_deref(), Some("key-1"));
/// assert_eq!(token.claims().issuer(), Some("https://issuer.example"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UntrustedToken<'a> {
    signed_data: &'a str,
    header_segment: &'a str,
    claims_segment: &'a str,
    signature_segment: &'a str,
    header: Header,
    claims: Claims,
}

impl<'a> TryFrom<&'a str> for UntrustedToken<'a> {
    type Error = ParseError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        if !s.contains('.') {
            return Err(ParseError::NoDelimiter);
        }

        let token_parts: Vec<_> = s.splitn(4, '.').collect();
        match token_parts.as_slice() {
            &[header_segment, claims_segment, signature_segment] => {
                let header = base64url::decode(header_segment)?;
                let claims = base64url::decode(claims_segment)?;
                let header: Header =
                    serde_json::from_slice(&header).map_err(ParseError::MalformedHeader)?;
                let claims: Claims =
                    serde_json::from_slice(&claims).map_err(ParseError::MalformedClaims)?;

                let signed_data_len = header_segment.len() + 1 + claims_segment.len();
                Ok(Self {
                    signed_data: &s[..signed_data_len],
                    header_segment,
                    claims_segment,
                    signature_segment,
                    header,
                    claims,
                })
            }
            _ => Err(ParseError::InvalidTokenStructure),
        }
    }
}

impl<'a> UntrustedToken<'a> {
    /// Creates an untrusted token from a string. This is a shortcut for calling the [`TryFrom`]
    /// conversion.
    pub fn new<S: AsRef<str> + ?Sized>(s: &'a S) -> Result<Self, ParseError> {
        Self::try_from(s.as_ref())
    }

    /// Gets the token header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Gets the signature algorithm mentioned in the header.
    pub fn algorithm(&self) -> &str {
        &self.header.algorithm
    }

    /// Gets the decoded claims. They are **not** validated.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Converts this token into its claims.
    pub fn into_claims(self) -> Claims {
        self.claims
    }

    /// Returns the bytes covered by the signature: the header and claims segments
    /// joined with `.`, as they appear in the token.
    pub fn signed_data(&self) -> &'a [u8] {
        self.signed_data.as_bytes()
    }

    /// Returns the base64url-encoded header segment.
    pub fn header_segment(&self) -> &'a str {
        self.header_segment
    }

    /// Returns the base64url-encoded claims segment.
    pub fn claims_segment(&self) -> &'a str {
        self.claims_segment
    }

    /// Returns the base64url-encoded signature segment. It is **not** guaranteed to decode
    /// into a valid signature.
    pub fn signature_segment(&self) -> &'a str {
        self.signature_segment
    }
}
