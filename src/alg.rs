//! `RS256` signature verification: RSASSA-PKCS1-v1_5 with SHA-256.

pub use rsa::RsaPublicKey;

use anyhow::Context as _;
use rsa::{pkcs1::DecodeRsaPublicKey, pkcs8::DecodePublicKey, Pkcs1v15Sign};
use sha2::{Digest, Sha256};

use crate::base64url;

/// RSA signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaSignature(Vec<u8>);

impl RsaSignature {
    /// Decodes a signature from the base64url-encoded token segment.
    pub fn from_segment(segment: &str) -> anyhow::Result<Self> {
        let bytes = base64url::decode(segment).context("signature is not valid base64url")?;
        Self::try_from_slice(&bytes)
    }

    /// Creates a signature from raw bytes.
    pub fn try_from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.is_empty() {
            Err(anyhow::anyhow!("Empty signature"))
        } else {
            Ok(RsaSignature(bytes.to_vec()))
        }
    }

    /// Returns the signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Parses a PEM-encoded RSA public key.
///
/// Accepts both `PUBLIC KEY` (SubjectPublicKeyInfo, as produced by
/// [`build_pem()`](crate::jwk::build_pem)) and `RSA PUBLIC KEY` (PKCS#1) documents.
pub fn parse_public_key(pem: &str) -> anyhow::Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .context("cannot parse RSA public key from PEM")
}

/// Integrity algorithm using [RSA] digital signatures with PKCS#1 v1.5 padding
/// and the SHA-256 hash function, as per [RFC 7518].
///
/// [RSA]: https://en.wikipedia.org/wiki/RSA_(cryptosystem)
/// [RFC 7518]: https://www.rfc-editor.org/rfc/rfc7518.html#section-3.3
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rs256;

impl Rs256 {
    /// Algorithm name as it appears in the `alg` header field.
    pub const NAME: &'static str = "RS256";

    /// Returns the algorithm name.
    pub fn name(self) -> &'static str {
        Self::NAME
    }

    /// Verifies `signature` over `message` (the signed part of the token).
    pub fn verify_signature(
        self,
        signature: &RsaSignature,
        verifying_key: &RsaPublicKey,
        message: &[u8],
    ) -> bool {
        let digest = Sha256::digest(message);
        verifying_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature.0)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    use crate::{jwk::build_pem, UntrustedToken};

    // Signed with the 2048-bit key whose public part is given by `MODULUS`.
    const TOKEN: &str =
        "eyJhbGciOiJSUzI1NiIsImtpZCI6InRlc3Qta2V5IiwidHlwIjoiSldUIn0.eyJzdWIiOiIxMjM0NTY3ODkwIi\
         wiaXNzIjoiaHR0cHM6Ly9pc3N1ZXIuZXhhbXBsZSIsImF1ZCI6ImFwaTovL2RlZmF1bHQiLCJpYXQiOjE3MDA\
         wMDAwMDAsImV4cCI6MTcwMDAwMzYwMH0.F4stzqXrm4otpRFwrpqvDg3zzhQY6dqBMwgGIU1_ycPbzV4-q9ZuE\
         YolYbSuWej59GYe0zIE8CcGiFZMrPQTHrY0rSxQ08j_Mx4OYt8uA3Xa59FiEsA4wdqHNIWd5eUprTDEX-NZlGP\
         TTE2YqGZZ4zvCnl-3X5b_cL4IGYY3X2DiqsG2nce1ldmaoKxeGO3Xaj_KOdmtsLwKJTeA8XqYsNfa0DEWuhPqJ\
         A-5bbS7qzQQGVbkevJ9piux-XSr4_9XbxWdhflZtXYXwVIPJolpsmbXW18DRad-frZNaybAxwGOV06v0mA-iozv\
         6A9Y8uMZOJFdvurjVOaBevhS2u-WCw";

    const MODULUS: &str = "nzyis1ZjfNB0bBgKFMSvvkTtwlvBsaJq7S5wA-kzeVOVpVWwkWdVha4s38XM_pa_yr47av7\
        -z3VTmvDRyAHcaT92whREFpLv9cj5lTeJSibyr_Mrm_YtjCZVWgaOYIhwrXwKLqPr_11inWsAkfIytvHWTxZYEcX\
        LgAXFuUuaS3uF9gEiNQwzGTU1v0FqkqTBr4B8nW3HCN47XUu0t8Y0e-lf4s4OxQawWD79J9_5d3Ry0vbV3Am1FtG\
        JiJvOwRsIfVChDpYStTcHTCMqtvWbV6L11BWkpzGXSW4Hv43qa-GSYOD2QU68Mb59oSk2OB-BtOLpJofmbGEGgvm\
        wyCI9Mw";

    const PKCS1_PEM: &str = "\
        -----BEGIN RSA PUBLIC KEY-----\n\
        MIIBCgKCAQEAnzyis1ZjfNB0bBgKFMSvvkTtwlvBsaJq7S5wA+kzeVOVpVWwkWdV\n\
        ha4s38XM/pa/yr47av7+z3VTmvDRyAHcaT92whREFpLv9cj5lTeJSibyr/Mrm/Yt\n\
        jCZVWgaOYIhwrXwKLqPr/11inWsAkfIytvHWTxZYEcXLgAXFuUuaS3uF9gEiNQwz\n\
        GTU1v0FqkqTBr4B8nW3HCN47XUu0t8Y0e+lf4s4OxQawWD79J9/5d3Ry0vbV3Am1\n\
        FtGJiJvOwRsIfVChDpYStTcHTCMqtvWbV6L11BWkpzGXSW4Hv43qa+GSYOD2QU68\n\
        Mb59oSk2OB+BtOLpJofmbGEGgvmwyCI9MwIDAQAB\n\
        -----END RSA PUBLIC KEY-----\n";

    fn check_token(verifying_key: &RsaPublicKey, token: &str) -> bool {
        let token = UntrustedToken::new(token).unwrap();
        let signature = RsaSignature::from_segment(token.signature_segment()).unwrap();
        Rs256.verify_signature(&signature, verifying_key, token.signed_data())
    }

    #[test]
    fn verifying_token_with_reconstructed_key() {
        let pem = build_pem(MODULUS, "AQAB").unwrap();
        let verifying_key = parse_public_key(&pem).unwrap();
        assert!(check_token(&verifying_key, TOKEN));
    }

    #[test]
    fn verifying_token_with_pkcs1_key() {
        let verifying_key = parse_public_key(PKCS1_PEM).unwrap();
        assert!(check_token(&verifying_key, TOKEN));
    }

    #[test]
    fn tampered_signature() {
        let verifying_key = parse_public_key(&build_pem(MODULUS, "AQAB").unwrap()).unwrap();
        let token = UntrustedToken::new(TOKEN).unwrap();
        let mut signature = RsaSignature::from_segment(token.signature_segment()).unwrap();
        signature.0[17] ^= 1;
        assert!(!Rs256.verify_signature(&signature, &verifying_key, token.signed_data()));
    }

    #[test]
    fn tampered_claims() {
        let verifying_key = parse_public_key(&build_pem(MODULUS, "AQAB").unwrap()).unwrap();
        // `"iat":1700000000` -> `"iat":1800000000`
        let mangled = TOKEN.replacen("LCJpYXQiOjE3MDA", "LCJpYXQiOjE4MDA", 1);
        assert_ne!(mangled, TOKEN);
        assert!(!check_token(&verifying_key, &mangled));
    }

    #[test]
    fn wrong_key() {
        let other_modulus = MODULUS.replacen("nzyis1", "nzyis2", 1);
        let verifying_key = parse_public_key(&build_pem(&other_modulus, "AQAB").unwrap()).unwrap();
        assert!(!check_token(&verifying_key, TOKEN));
    }

    #[test]
    fn invalid_key_material() {
        assert_matches!(parse_public_key(""), Err(_));
        assert_matches!(parse_public_key("-----BEGIN PUBLIC KEY-----"), Err(_));
        assert_matches!(parse_public_key(&build_pem("", "").unwrap()), Err(_));
    }

    #[test]
    fn invalid_signatures() {
        assert_matches!(RsaSignature::from_segment(""), Err(_));
        assert_matches!(RsaSignature::from_segment("!!!"), Err(_));
        assert_eq!(Rs256.name(), "RS256");
    }
}
