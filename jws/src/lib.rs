//! JSON Web Signature <br>
//!
//! - [RFC 7515 JWS](https://www.rfc-editor.org/rfc/rfc7515) <br>
//! - [RFC 7517 JWK](https://www.rfc-editor.org/rfc/rfc7517) <br>
//! - [RFC 7518 JWA](https://www.rfc-editor.org/rfc/rfc7518) <br>
//! - [RFC 7519 JWT](https://www.rfc-editor.org/rfc/rfc7519) <br>
//! - [RFC 7638 JWK Thumbprint](https://www.rfc-editor.org/rfc/rfc7638) <br>
//!
//! 签名原语来自`cipher`: HMAC和RSASSA-PKCS1-v1_5.
//!

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

mod error;
pub use error::JwsError;

mod algorithm;
pub use algorithm::{AlgorithmFamily, SignatureAlgorithm};

mod jwk;
pub use jwk::Jwk;

mod header;
pub use header::{Claims, Header};

mod signer;
pub use signer::{DefaultSigner, HmacSigner, RsaSigner, Signer, Verifier};

mod resolver;
pub use resolver::{JwkSetResolver, KeyResolver, StaticKeyResolver};

mod jwt;
pub use jwt::Jwt;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

/// base64url, 无填充
pub fn b64_encode<T: AsRef<[u8]>>(data: T) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

pub fn b64_decode<T: AsRef<[u8]>>(data: T) -> Result<Vec<u8>, JwsError> {
    Ok(URL_SAFE_NO_PAD.decode(data)?)
}
