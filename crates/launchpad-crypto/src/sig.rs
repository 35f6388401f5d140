use hmac::{Mac, SimpleHmac};
use sha2::Sha256;

use super::{CryptoError, Result};

const SIGNATURE_PREFIX: &str = "sha256=";

/// HMAC-SHA256 signature carried by a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSignature(Vec<u8>);

impl WebhookSignature {
    /// Parse a `sha256=<hex>` header value.
    pub fn from_header(header: &str) -> Result<Self> {
        let invalid = || CryptoError::InvalidSignatureFormat {
            header: header.to_string(),
        };

        let digest = header.strip_prefix(SIGNATURE_PREFIX).ok_or_else(invalid)?;
        hex::decode(digest).map(Self).map_err(|_| invalid())
    }

    /// Sign a body, producing a header value.
    pub fn sign(body: &[u8], secret: &str) -> Result<String> {
        let mut hmac = Self::hmac(secret)?;
        hmac.update(body);

        Ok(format!(
            "{SIGNATURE_PREFIX}{}",
            hex::encode(hmac.finalize().into_bytes())
        ))
    }

    /// Check the signature against a body and a shared secret.
    ///
    /// Comparison runs in constant time.
    pub fn verify(&self, body: &[u8], secret: &str) -> Result<bool> {
        let mut hmac = Self::hmac(secret)?;
        hmac.update(body);
        Ok(hmac.verify_slice(&self.0).is_ok())
    }

    fn hmac(secret: &str) -> Result<SimpleHmac<Sha256>> {
        if secret.is_empty() {
            return Err(CryptoError::EmptySecret);
        }

        SimpleHmac::<Sha256>::new_from_slice(secret.as_bytes())
            .map_err(|_| CryptoError::EmptySecret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &[u8] = br#"{"secret": "hello"}"#;
    const SECRET: &str = "iAmAsEcReTkEy";

    #[test]
    fn known_signature_is_accepted() {
        let sig = WebhookSignature::from_header(
            "sha256=a2b41e3bb9a09babb36b42e145eacc38916d078ba378d60db679f6ac79cd1408",
        )
        .unwrap();

        assert!(sig.verify(BODY, SECRET).unwrap());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let sig = WebhookSignature::from_header(
            "sha256=a2b41e3bb9a09babb36b42e145eacc38916d078ba378d60db679f6ac79cd1409",
        )
        .unwrap();

        assert!(!sig.verify(BODY, SECRET).unwrap());
    }

    #[test]
    fn signed_body_verifies() {
        let header = WebhookSignature::sign(BODY, SECRET).unwrap();
        let sig = WebhookSignature::from_header(&header).unwrap();

        assert!(sig.verify(BODY, SECRET).unwrap());
        assert!(!sig.verify(BODY, "another-secret").unwrap());
        assert!(!sig.verify(b"{}", SECRET).unwrap());
    }

    #[test]
    fn malformed_headers() {
        assert!(matches!(
            WebhookSignature::from_header("a2b41e3b"),
            Err(CryptoError::InvalidSignatureFormat { .. })
        ));
        assert!(matches!(
            WebhookSignature::from_header("sha256=zz"),
            Err(CryptoError::InvalidSignatureFormat { .. })
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        let sig = WebhookSignature::from_header("sha256=00").unwrap();
        assert!(matches!(sig.verify(BODY, ""), Err(CryptoError::EmptySecret)));
    }
}
