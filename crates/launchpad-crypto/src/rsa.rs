use std::fmt;

use rand::rngs::OsRng;
use rsa::{
    pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey},
    pkcs8::LineEnding,
    RsaPrivateKey, RsaPublicKey,
};

use super::{CryptoError, Result};

const APP_KEY_BITS: usize = 2048;

/// PKCS#1 PEM key pair, in the format GitHub issues App private keys.
#[derive(Clone)]
pub struct AppKeyPair {
    private_pem: String,
    public_pem: String,
}

impl AppKeyPair {
    /// Generate a fresh key pair, e.g. for a development GitHub App.
    pub fn generate() -> Result<Self> {
        let private = RsaPrivateKey::new(&mut OsRng, APP_KEY_BITS).map_err(generation_error)?;
        let public = RsaPublicKey::from(&private);

        Ok(Self {
            private_pem: private
                .to_pkcs1_pem(LineEnding::LF)
                .map_err(generation_error)?
                .to_string(),
            public_pem: public
                .to_pkcs1_pem(LineEnding::LF)
                .map_err(generation_error)?,
        })
    }

    /// Private key, as expected in `LAUNCHPAD_API_GITHUB_APP_PRIVATE_KEY`.
    pub fn private_pem(&self) -> &str {
        &self.private_pem
    }

    pub fn public_pem(&self) -> &str {
        &self.public_pem
    }
}

// Never print the private half.
impl fmt::Debug for AppKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppKeyPair")
            .field("public_pem", &self.public_pem)
            .finish_non_exhaustive()
    }
}

fn generation_error<E>(e: E) -> CryptoError
where
    E: std::error::Error + Send + Sync + 'static,
{
    CryptoError::KeyGenerationFailed {
        source: Box::new(e),
    }
}
