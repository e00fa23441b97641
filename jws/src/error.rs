use cipher::CipherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JwsError {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("unsupported algorithm `{0}`")]
    UnsupportedAlgorithm(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("missing key parameter `{0}`")]
    MissingKeyParameter(&'static str),

    #[error("invalid base64url data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("no key matches the header `{0}`")]
    KeyNotFound(String),
}
