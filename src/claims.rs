use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use subtle::ConstantTimeEq;

use core::fmt;
use std::sync::Arc;

use crate::VerificationError;

/// Time-related validation options.
#[derive(Clone)]
#[non_exhaustive]
pub struct TimeOptions {
    /// Leeway to use during validation.
    pub leeway: Duration,
    /// Source of the current timestamps.
    pub clock_fn: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl fmt::Debug for TimeOptions {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TimeOptions")
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

impl TimeOptions {
    /// Creates options based on the specified time leeway and clock function.
    pub fn new<F>(leeway: Duration, clock_fn: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            leeway,
            clock_fn: Arc::new(clock_fn),
        }
    }

    /// Creates options based on the specified time leeway. The clock source is [`Utc::now()`].
    pub fn from_leeway(leeway: Duration) -> Self {
        Self::new(leeway, Utc::now)
    }

    fn now_timestamp(&self) -> i64 {
        (self.clock_fn)().timestamp()
    }
}

/// Zero leeway with [`Utc::now()`] as the clock.
impl Default for TimeOptions {
    fn default() -> Self {
        Self::from_leeway(Duration::zero())
    }
}

/// Claims decoded from the token payload.
///
/// The claims are kept as a JSON object exactly as decoded; accessors are provided
/// for the claims participating in verification:
///
/// | Claim | Meaning | Accessor |
/// |-------|---------|----------|
/// | `iat` | issuance time, epoch seconds | [`Self::issued_at()`] |
/// | `exp` | expiration time, epoch seconds | [`Self::expiration()`] |
/// | `aud` | audience | [`Self::audience()`] |
/// | `cid` | client ID | [`Self::client_id()`] |
/// | `iss` | issuer URL | [`Self::issuer()`] |
/// | `nonce` | nonce | [`Self::nonce()`] |
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Claims> for Map<String, Value> {
    fn from(claims: Claims) -> Self {
        claims.0
    }
}

impl Claims {
    /// Gets a claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns all claims as a JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts claims into the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Gets the `iat` claim as epoch seconds. Fractional values are floored.
    pub fn issued_at(&self) -> Option<i64> {
        self.get("iat").and_then(timestamp)
    }

    /// Gets the `exp` claim as epoch seconds. Fractional values are floored.
    pub fn expiration(&self) -> Option<i64> {
        self.get("exp").and_then(timestamp)
    }

    /// Gets the raw `aud` claim.
    pub fn audience(&self) -> Option<&Value> {
        self.get("aud")
    }

    /// Gets the `cid` claim if it is a string.
    pub fn client_id(&self) -> Option<&str> {
        self.get("cid").and_then(Value::as_str)
    }

    /// Gets the `iss` claim if it is a string.
    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Gets the `nonce` claim if it is a string.
    pub fn nonce(&self) -> Option<&str> {
        self.get("nonce").and_then(Value::as_str)
    }

    /// Validates the issuance time (`iat` claim).
    ///
    /// Fails if the claim is later than the current time (subject to the provided `options`).
    /// A missing or non-numeric claim imposes no constraint.
    pub fn validate_issued_at(&self, options: &TimeOptions) -> Result<&Self, VerificationError> {
        match self.issued_at() {
            Some(issued_at)
                if issued_at > options.now_timestamp() + options.leeway.num_seconds() =>
            {
                Err(VerificationError::IssuedInFuture)
            }
            _ => Ok(self),
        }
    }

    /// Validates the expiration claim.
    ///
    /// This method will return an error if the claims do not feature an expiration date,
    /// or if it is in the past (subject to the provided `options`).
    pub fn validate_expiration(&self, options: &TimeOptions) -> Result<&Self, VerificationError> {
        match self.expiration() {
            Some(expiration)
                if expiration >= options.now_timestamp() - options.leeway.num_seconds() =>
            {
                Ok(self)
            }
            _ => Err(VerificationError::Expired),
        }
    }

    /// Validates the `aud` claim. The claim must be a string equal to `expected`;
    /// arrays and other values never match.
    pub fn validate_audience(&self, expected: &str) -> Result<&Self, VerificationError> {
        let matches =
            matches!(self.audience(), Some(Value::String(audience)) if audience == expected);
        if matches {
            Ok(self)
        } else {
            Err(VerificationError::AudienceMismatch)
        }
    }

    /// Validates the `cid` claim.
    pub fn validate_client_id(&self, expected: &str) -> Result<&Self, VerificationError> {
        if self.client_id() == Some(expected) {
            Ok(self)
        } else {
            Err(VerificationError::ClientIdMismatch)
        }
    }

    /// Validates the `iss` claim.
    pub fn validate_issuer(&self, expected: &str) -> Result<&Self, VerificationError> {
        if self.issuer() == Some(expected) {
            Ok(self)
        } else {
            Err(VerificationError::IssuerMismatch)
        }
    }

    /// Validates the `nonce` claim. The comparison is constant-time for equal-length values.
    pub fn validate_nonce(&self, expected: &str) -> Result<&Self, VerificationError> {
        let matches = self
            .nonce()
            .is_some_and(|nonce| nonce.as_bytes().ct_eq(expected.as_bytes()).into());
        if matches {
            Ok(self)
        } else {
            Err(VerificationError::NonceMismatch)
        }
    }
}

#[allow(clippy::cast_possible_truncation)] // saturating float -> int casts are intended
fn timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().map(|float| float.floor() as i64)),
        _ => None,
    }
}
