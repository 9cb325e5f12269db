use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signature generation and verification
pub struct HmacSignature;

impl HmacSignature {
    /// Generate HMAC-SHA256 signature
    pub fn sign(message: &[u8], secret: &[u8]) -> AppResult<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| AppError::Internal(format!("HMAC initialization failed: {}", e)))?;

        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Generate HMAC-SHA256 signature as lowercase hex string
    pub fn sign_hex(message: &[u8], secret: &[u8]) -> AppResult<String> {
        let signature = Self::sign(message, secret)?;
        Ok(hex::encode(signature))
    }

    /// Verify a hex signature against the HMAC of `message`.
    ///
    /// The supplied string is compared byte-for-byte with the lowercase hex
    /// digest in constant time, so a mismatch at the first byte costs the
    /// same as one at the last.
    pub fn verify_hex(message: &[u8], signature_hex: &str, secret: &[u8]) -> AppResult<bool> {
        let expected = Self::sign_hex(message, secret)?;
        Ok(constant_time_eq(expected.as_bytes(), signature_hex.as_bytes()))
    }
}

/// Length is not secret; only the content comparison runs in constant time.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_hex_roundtrip() {
        let message = b"test message";
        let secret = b"secret key";

        let signature_hex = HmacSignature::sign_hex(message, secret).unwrap();
        assert_eq!(signature_hex.len(), 64);
        assert!(HmacSignature::verify_hex(message, &signature_hex, secret).unwrap());
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let signature =
            HmacSignature::sign_hex(b"what do ya want for nothing?", b"Jefe").unwrap();
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature_hex = HmacSignature::sign_hex(b"order|pay", b"secret").unwrap();
        assert!(!HmacSignature::verify_hex(b"order|pay", &signature_hex, b"other").unwrap());
    }

    #[test]
    fn test_case_is_significant() {
        let signature_hex = HmacSignature::sign_hex(b"order|pay", b"secret").unwrap();
        let upper = signature_hex.to_uppercase();
        assert!(!HmacSignature::verify_hex(b"order|pay", &upper, b"secret").unwrap());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hi"));
        assert!(constant_time_eq(b"", b""));
    }
}
