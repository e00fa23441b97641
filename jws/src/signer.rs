//! 按算法族分派签名和验证 <br>
//!
//! - `HS*`: HMAC, 密钥长度至少为摘要长度, 验证即重新计算后做常量时间比较;
//! - `RS*`: RSASSA-PKCS1-v1_5;
//! - `none`, `ES*`, `PS*`: 不支持;
//!

use crate::{Jwk, JwsError, SignatureAlgorithm};
use cipher::asn1::AlgorithmIdentifier;
use cipher::mac::{Hmac, MAC};
use cipher::rsa::{Pkcs1v15Sign, Pkcs1v15Verify};
use cipher::{Sign, Verify};

pub trait Signer {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm];

    fn sign(&self, alg: SignatureAlgorithm, data: &[u8], key: &Jwk) -> Result<Vec<u8>, JwsError>;
}

pub trait Verifier {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm];

    /// 签名不匹配返回`Ok(false)`, `Err`只表示算法或密钥使用错误
    fn verify(
        &self,
        alg: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
        key: &Jwk,
    ) -> Result<bool, JwsError>;
}

fn check_supported(
    supported: &[SignatureAlgorithm],
    alg: SignatureAlgorithm,
) -> Result<AlgorithmIdentifier, JwsError> {
    match alg.hash() {
        Some(hash) if supported.contains(&alg) => Ok(hash),
        _ => Err(JwsError::UnsupportedAlgorithm(alg.to_string())),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HmacSigner;

impl HmacSigner {
    pub const ALGORITHMS: [SignatureAlgorithm; 3] = [
        SignatureAlgorithm::HS256,
        SignatureAlgorithm::HS384,
        SignatureAlgorithm::HS512,
    ];

    fn mac(alg: SignatureAlgorithm, key: &Jwk) -> Result<Hmac, JwsError> {
        let hash = check_supported(&Self::ALGORITHMS, alg)?;
        let k = key.to_hmac_key()?;
        let min_len = alg.min_key_bits() >> 3;
        if k.len() < min_len {
            return Err(JwsError::InvalidKey(format!(
                "{alg} needs a key of at least `{min_len}` bytes, but got `{}`",
                k.len()
            )));
        }

        Ok(Hmac::new(hash, k.as_slice()))
    }
}

impl Signer for HmacSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn sign(&self, alg: SignatureAlgorithm, data: &[u8], key: &Jwk) -> Result<Vec<u8>, JwsError> {
        Ok(Self::mac(alg, key)?.mac(data)?)
    }
}

impl Verifier for HmacSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn verify(
        &self,
        alg: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
        key: &Jwk,
    ) -> Result<bool, JwsError> {
        Ok(Self::mac(alg, key)?.verify_mac(data, signature))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RsaSigner;

impl RsaSigner {
    pub const ALGORITHMS: [SignatureAlgorithm; 3] = [
        SignatureAlgorithm::RS256,
        SignatureAlgorithm::RS384,
        SignatureAlgorithm::RS512,
    ];

    fn warn_short_key(alg: SignatureAlgorithm, bits: usize) {
        if bits < alg.min_key_bits() {
            log::warn!(
                "{alg}: RSA modulus of `{bits}` bits is shorter than the recommended `{}` bits",
                alg.min_key_bits()
            );
        }
    }
}

impl Signer for RsaSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn sign(&self, alg: SignatureAlgorithm, data: &[u8], key: &Jwk) -> Result<Vec<u8>, JwsError> {
        let hash = check_supported(&Self::ALGORITHMS, alg)?;
        let sk = key.to_private_key()?;
        Self::warn_short_key(alg, sk.modulus().bits() as usize);

        let mut sig = Vec::with_capacity(sk.key_len());
        Pkcs1v15Sign::new(sk, hash).sign(data, &mut sig)?;
        Ok(sig)
    }
}

impl Verifier for RsaSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn verify(
        &self,
        alg: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
        key: &Jwk,
    ) -> Result<bool, JwsError> {
        let hash = check_supported(&Self::ALGORITHMS, alg)?;
        let pk = key.to_public_key()?;
        Self::warn_short_key(alg, pk.key_bits());
        Ok(Pkcs1v15Verify::new(pk, hash).verify(data, signature))
    }
}

/// 由算法族选择`HmacSigner`或`RsaSigner`
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSigner {
    hmac: HmacSigner,
    rsa: RsaSigner,
}

impl DefaultSigner {
    pub const ALGORITHMS: [SignatureAlgorithm; 6] = [
        SignatureAlgorithm::HS256,
        SignatureAlgorithm::HS384,
        SignatureAlgorithm::HS512,
        SignatureAlgorithm::RS256,
        SignatureAlgorithm::RS384,
        SignatureAlgorithm::RS512,
    ];

    pub fn new() -> Self {
        Self::default()
    }
}

impl Signer for DefaultSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn sign(&self, alg: SignatureAlgorithm, data: &[u8], key: &Jwk) -> Result<Vec<u8>, JwsError> {
        log::debug!("sign with {alg}, family {:?}", alg.family());
        if Signer::supported_algorithms(&self.hmac).contains(&alg) {
            self.hmac.sign(alg, data, key)
        } else if Signer::supported_algorithms(&self.rsa).contains(&alg) {
            self.rsa.sign(alg, data, key)
        } else {
            Err(JwsError::UnsupportedAlgorithm(alg.to_string()))
        }
    }
}

impl Verifier for DefaultSigner {
    fn supported_algorithms(&self) -> &'static [SignatureAlgorithm] {
        &Self::ALGORITHMS
    }

    fn verify(
        &self,
        alg: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
        key: &Jwk,
    ) -> Result<bool, JwsError> {
        let valid = if Verifier::supported_algorithms(&self.hmac).contains(&alg) {
            self.hmac.verify(alg, data, signature, key)?
        } else if Verifier::supported_algorithms(&self.rsa).contains(&alg) {
            self.rsa.verify(alg, data, signature, key)?
        } else {
            return Err(JwsError::UnsupportedAlgorithm(alg.to_string()));
        };

        log::debug!("verify with {alg}: {valid}");
        Ok(valid)
    }
}
