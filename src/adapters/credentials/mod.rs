//! Credential adapters.
//!
//! - `HmacCredentialIssuer` - Signed, expiring activation tokens

mod hmac_issuer;

pub use hmac_issuer::HmacCredentialIssuer;
