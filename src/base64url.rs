//! Base64url codec used by JWT segments and JWK fields.
//!
//! Decoding is forgiving about padding: the input is padded with `=`
//! to a multiple of 4 chars, the URL-safe alphabet is mapped onto the standard one,
//! and the result is decoded as standard base64. This accepts both the unpadded
//! form mandated by [RFC 7515] and the padded form emitted by some issuers.
//!
//! [RFC 7515]: https://www.rfc-editor.org/rfc/rfc7515.html#section-2

use base64ct::{Base64, Encoding};

/// Decodes base64url-encoded `input`, with or without padding.
pub fn decode(input: &str) -> Result<Vec<u8>, base64ct::Error> {
    let padding = (4 - input.len() % 4) % 4;
    let mut standard = String::with_capacity(input.len() + padding);
    standard.extend(input.chars().map(|ch| match ch {
        '-' => '+',
        '_' => '/',
        other => other,
    }));
    standard.extend(core::iter::repeat('=').take(padding));
    Base64::decode_vec(&standard)
}

/// Encodes `bytes` using the standard padded base64 alphabet.
pub fn encode_padded(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}
