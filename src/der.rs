//! Minimal DER writer producing RSA `SubjectPublicKeyInfo` structures.
//!
//! Only the handful of ASN.1 types needed to express an RSA public key are supported:
//!
//! ```text
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm         AlgorithmIdentifier,  -- rsaEncryption, NULL params
//!     subjectPublicKey  BIT STRING            -- DER of RSAPublicKey
//! }
//! RSAPublicKey ::= SEQUENCE {
//!     modulus         INTEGER,
//!     publicExponent  INTEGER
//! }
//! ```

use crate::base64url;

const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_SEQUENCE: u8 = 0x30;

/// DER-encoded `AlgorithmIdentifier` for `rsaEncryption` (OID 1.2.840.113549.1.1.1)
/// with `NULL` parameters.
pub const RSA_ALGORITHM_ID: [u8; 15] = [
    0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00,
];

const PEM_HEADER: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_FOOTER: &str = "-----END PUBLIC KEY-----";
const PEM_LINE_WIDTH: usize = 64;
const PEM_EOL: &str = "\r\n";

/// Encodes a definite length: short form for lengths up to 127, long form otherwise.
pub fn encode_length(len: usize) -> Vec<u8> {
    if len <= 0x7f {
        // Guarded by the comparison above.
        #[allow(clippy::cast_possible_truncation)]
        return vec![len as u8];
    }

    let be_bytes = len.to_be_bytes();
    let first_significant = be_bytes
        .iter()
        .position(|&byte| byte != 0)
        .unwrap_or(be_bytes.len() - 1);
    let significant = &be_bytes[first_significant..];

    let mut encoded = Vec::with_capacity(1 + significant.len());
    // `significant.len()` is at most `size_of::<usize>()`.
    #[allow(clippy::cast_possible_truncation)]
    encoded.push(0x80 | significant.len() as u8);
    encoded.extend_from_slice(significant);
    encoded
}

fn tlv(tag: u8, parts: &[&[u8]]) -> Vec<u8> {
    let content_len = parts.iter().map(|part| part.len()).sum();
    let length = encode_length(content_len);

    let mut encoded = Vec::with_capacity(1 + length.len() + content_len);
    encoded.push(tag);
    encoded.extend_from_slice(&length);
    for part in parts {
        encoded.extend_from_slice(part);
    }
    encoded
}

/// Encodes big-endian unsigned integer bytes as a DER `INTEGER`.
///
/// A `0x00` byte is prepended if the high bit of the first byte is set, so that the value
/// stays non-negative. Other bytes (including an existing leading zero) are kept as given;
/// an empty slice produces a zero-length `INTEGER`.
pub fn integer(unsigned_be: &[u8]) -> Vec<u8> {
    let needs_sign_byte = matches!(unsigned_be.first(), Some(byte) if byte & 0x80 != 0);
    if needs_sign_byte {
        tlv(TAG_INTEGER, &[&[0], unsigned_be])
    } else {
        tlv(TAG_INTEGER, &[unsigned_be])
    }
}

/// Wraps already encoded elements into a DER `SEQUENCE`.
pub fn sequence(elements: &[&[u8]]) -> Vec<u8> {
    tlv(TAG_SEQUENCE, elements)
}

/// Wraps `content` into a DER `BIT STRING` with zero unused bits.
pub fn bit_string(content: &[u8]) -> Vec<u8> {
    tlv(TAG_BIT_STRING, &[&[0], content])
}

/// Builds the DER encoding of an RSA `SubjectPublicKeyInfo` from the raw modulus
/// and public exponent (both big-endian unsigned integers).
pub fn subject_public_key_info(modulus: &[u8], public_exponent: &[u8]) -> Vec<u8> {
    let rsa_public_key = sequence(&[&integer(modulus), &integer(public_exponent)]);
    sequence(&[&RSA_ALGORITHM_ID, &bit_string(&rsa_public_key)])
}

/// Armors a DER-encoded `SubjectPublicKeyInfo` as a `PUBLIC KEY` PEM document.
///
/// Lines are CRLF-terminated and at most 64 chars wide; the footer has no trailing newline.
pub fn pem_armor(der: &[u8]) -> String {
    let body = base64url::encode_padded(der);
    let line_count = (body.len() + PEM_LINE_WIDTH - 1) / PEM_LINE_WIDTH;
    let mut pem = String::with_capacity(
        PEM_HEADER.len() + body.len() + (line_count + 1) * PEM_EOL.len() + PEM_FOOTER.len(),
    );

    pem.push_str(PEM_HEADER);
    pem.push_str(PEM_EOL);
    // Standard base64 output is pure ASCII, so splitting on byte offsets is safe.
    for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
        pem.push_str(core::str::from_utf8(line).unwrap_or_default());
        pem.push_str(PEM_EOL);
    }
    pem.push_str(PEM_FOOTER);
    pem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_lengths() {
        assert_eq!(encode_length(0), [0x00]);
        assert_eq!(encode_length(1), [0x01]);
        assert_eq!(encode_length(127), [0x7f]);
    }

    #[test]
    fn long_form_lengths() {
        assert_eq!(encode_length(128), [0x81, 0x80]);
        assert_eq!(encode_length(255), [0x81, 0xff]);
        assert_eq!(encode_length(256), [0x82, 0x01, 0x00]);
        assert_eq!(encode_length(270), [0x82, 0x01, 0x0e]);
        assert_eq!(encode_length(65_536), [0x83, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn integer_encoding() {
        assert_eq!(integer(&[1, 0, 1]), [0x02, 0x03, 0x01, 0x00, 0x01]);
        assert_eq!(integer(&[0x7f]), [0x02, 0x01, 0x7f]);
        assert_eq!(integer(&[0x80]), [0x02, 0x02, 0x00, 0x80]);
        // An explicit leading zero is trusted as-is.
        assert_eq!(integer(&[0x00, 0x80]), [0x02, 0x02, 0x00, 0x80]);
        assert_eq!(integer(&[]), [0x02, 0x00]);
    }

    #[test]
    fn bit_string_has_unused_bits_prefix() {
        assert_eq!(bit_string(&[0x30, 0x00]), [0x03, 0x03, 0x00, 0x30, 0x00]);
    }

    #[test]
    fn spki_for_tiny_key() {
        let der = subject_public_key_info(&[0x0b], &[0x03]);
        let mut expected = vec![0x30, 0x1a];
        expected.extend_from_slice(&RSA_ALGORITHM_ID);
        expected.extend_from_slice(&[0x03, 0x09, 0x00, 0x30, 0x06, 0x02, 0x01, 0x0b]);
        expected.extend_from_slice(&[0x02, 0x01, 0x03]);
        assert_eq!(der, expected);
    }

    #[test]
    fn pem_armor_wraps_lines() {
        let pem = pem_armor(&[0xab; 100]);
        let lines: Vec<_> = pem.split("\r\n").collect();
        assert_eq!(lines.first(), Some(&PEM_HEADER));
        assert_eq!(lines.last(), Some(&PEM_FOOTER));
        // 100 bytes encode into 136 base64 chars: 64 + 64 + 8.
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].len(), 64);
        assert_eq!(lines[2].len(), 64);
        assert_eq!(lines[3].len(), 8);
        assert!(!pem.ends_with('\n'));
    }
}
