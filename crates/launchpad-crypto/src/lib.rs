//! Crypto module.

mod errors;
mod jwt;
mod rsa;
mod sig;

pub use jwt::JwtUtils;

pub use self::{
    errors::{CryptoError, Result},
    rsa::AppKeyPair,
    sig::WebhookSignature,
};
