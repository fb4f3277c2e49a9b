//! Error handling.

use serde::Serialize;

use core::fmt;

/// Errors that may occur while splitting a token into its segments and decoding them.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// Token does not contain a single `.` delimiter.
    NoDelimiter,
    /// Token has invalid structure.
    ///
    /// Valid tokens must consist of 3 base64url-encoded parts (header, claims, and signature)
    /// separated by periods.
    InvalidTokenStructure,
    /// Cannot decode base64.
    Base64(base64ct::Error),
    /// Token header cannot be parsed.
    MalformedHeader(serde_json::Error),
    /// Token claims cannot be parsed as a JSON object.
    MalformedClaims(serde_json::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDelimiter => formatter.write_str("Token contains no `.` delimiter"),
            Self::InvalidTokenStructure => formatter.write_str("Invalid token structure"),
            Self::Base64(e) => write!(formatter, "base64 decoding error: {e}"),
            Self::MalformedHeader(e) => write!(formatter, "Malformed token header: {e}"),
            Self::MalformedClaims(e) => write!(formatter, "Malformed token claims: {e}"),
        }
    }
}

impl From<base64ct::Error> for ParseError {
    fn from(error: base64ct::Error) -> Self {
        Self::Base64(error)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64(e) => Some(e),
            Self::MalformedHeader(e) | Self::MalformedClaims(e) => Some(e),
            Self::NoDelimiter | Self::InvalidTokenStructure => None,
        }
    }
}

/// Errors that can occur while retrieving the issuer's signing keys.
#[derive(Debug)]
#[non_exhaustive]
pub enum ResolutionError {
    /// Token has no string `iss` claim to discover the keys from.
    MissingIssuer,
    /// Document could not be fetched.
    Fetch {
        /// Requested URL.
        url: String,
        /// Transport error.
        source: anyhow::Error,
    },
    /// Fetched document is not valid JSON or lacks a required field.
    MalformedDocument {
        /// Requested URL.
        url: String,
        /// Deserialization error.
        source: serde_json::Error,
    },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIssuer => formatter.write_str("Token has no `iss` claim"),
            Self::Fetch { url, source } => write!(formatter, "Cannot fetch `{url}`: {source}"),
            Self::MalformedDocument { url, source } => {
                write!(formatter, "Malformed document at `{url}`: {source}")
            }
        }
    }
}

impl std::error::Error for ResolutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MissingIssuer => None,
            Self::Fetch { source, .. } => Some(&**source),
            Self::MalformedDocument { source, .. } => Some(source),
        }
    }
}

/// Errors that can occur during token verification.
///
/// Each variant maps to a fixed human-readable [summary](Self::summary()) that is safe
/// to return to the token holder; details (if any) are available via
/// [`source()`](std::error::Error::source()).
#[derive(Debug)]
pub enum VerificationError {
    /// Token cannot be split into segments or its header / claims cannot be decoded.
    MalformedToken(ParseError),
    /// Algorithm in the token header is not `RS256`.
    UnsupportedAlgorithm(String),
    /// `iat` claim is in the future.
    IssuedInFuture,
    /// `exp` claim is in the past or absent.
    Expired,
    /// `aud` claim differs from the expected audience.
    AudienceMismatch,
    /// `cid` claim differs from the expected client ID.
    ClientIdMismatch,
    /// `iss` claim differs from the expected issuer.
    IssuerMismatch,
    /// `nonce` claim differs from the expected nonce.
    NonceMismatch,
    /// Issuer's key set has no key with the `kid` from the token header.
    SigningKeyNotFound,
    /// Token signature has failed verification.
    SignatureInvalid,
    /// Discovery document or key set could not be retrieved.
    Resolution(ResolutionError),
}

impl VerificationError {
    /// Returns the fixed summary for this error.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::MalformedToken(ParseError::NoDelimiter) => {
                "The JWT provided does not contain a delimiter between header, payload and signature."
            }
            Self::MalformedToken(_) => "The JWT provided does not contain the expected structure.",
            Self::UnsupportedAlgorithm(_) => {
                "The JWT token is generated through an unsupported algorithm."
            }
            Self::IssuedInFuture => "The JWT was issued in the future.",
            Self::Expired => "The JWT is expired.",
            Self::AudienceMismatch => "The JWT does not contain the expected audience.",
            Self::ClientIdMismatch => "The JWT does not contain the expected client ID.",
            Self::IssuerMismatch => "The JWT does not contain the expected issuer.",
            Self::NonceMismatch => "The JWT does not contain the expected nonce.",
            Self::SigningKeyNotFound => {
                "The signing key for the token was not found under /keys endpoint."
            }
            Self::SignatureInvalid => "The signature could not be verified.",
            Self::Resolution(_) => "The signing keys for the token could not be retrieved.",
        }
    }

    /// Returns a serializable report for this error.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            error: ErrorSummary {
                error_summary: self.summary(),
            },
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.summary())
    }
}

impl std::error::Error for VerificationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedToken(e) => Some(e),
            Self::Resolution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for VerificationError {
    fn from(error: ParseError) -> Self {
        Self::MalformedToken(error)
    }
}

impl From<ResolutionError> for VerificationError {
    fn from(error: ResolutionError) -> Self {
        Self::Resolution(error)
    }
}

/// Serializable form of a [`VerificationError`]: `{"error":{"errorSummary":"..."}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Error payload.
    pub error: ErrorSummary,
}

/// Payload of an [`ErrorReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    /// Fixed summary of the error.
    #[serde(rename = "errorSummary")]
    pub error_summary: &'static str,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        formatter.write_str(&json)
    }
}
