//! JWA签名算法(RFC 7518 Section 3.1)

use crate::JwsError;
use cipher::asn1::AlgorithmIdentifier;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    None,
    Hmac,
    Rsa,
    Ecdsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlgorithm {
    #[serde(rename = "none")]
    None,
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    ES256,
    ES384,
    ES512,
    PS256,
    PS384,
    PS512,
}

impl SignatureAlgorithm {
    pub const ALL: [Self; 13] = [
        Self::None,
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
    ];

    pub const fn family(&self) -> AlgorithmFamily {
        match self {
            Self::None => AlgorithmFamily::None,
            Self::HS256 | Self::HS384 | Self::HS512 => AlgorithmFamily::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512 => {
                AlgorithmFamily::Rsa
            }
            Self::ES256 | Self::ES384 | Self::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// 推荐的最小密钥位数
    pub const fn min_key_bits(&self) -> usize {
        match self {
            Self::None => 0,
            Self::HS256 | Self::ES256 => 256,
            Self::HS384 | Self::ES384 => 384,
            Self::HS512 => 512,
            Self::ES512 => 521,
            Self::RS256 | Self::RS384 | Self::RS512 | Self::PS256 | Self::PS384 | Self::PS512 => {
                2048
            }
        }
    }

    /// 摘要字节长度
    pub const fn digest_len(&self) -> usize {
        match self.hash() {
            Some(h) => h.h_len(),
            None => 0,
        }
    }

    pub const fn hash(&self) -> Option<AlgorithmIdentifier> {
        match self {
            Self::None => None,
            Self::HS256 | Self::RS256 | Self::ES256 | Self::PS256 => {
                Some(AlgorithmIdentifier::Sha256)
            }
            Self::HS384 | Self::RS384 | Self::ES384 | Self::PS384 => {
                Some(AlgorithmIdentifier::Sha384)
            }
            Self::HS512 | Self::RS512 | Self::ES512 | Self::PS512 => {
                Some(AlgorithmIdentifier::Sha512)
            }
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = JwsError;

    /// JWA名称区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|x| x.name() == s)
            .ok_or_else(|| JwsError::UnsupportedAlgorithm(s.to_string()))
    }
}
