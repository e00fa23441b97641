//! = RFC 8017
//!
//! == PKCS #1: RSA Cryptography Specification Version 2.2
//!
//! === RSASSA-PKCS1-v1_5(Section 8.2)
//!

use crate::asn1::AlgorithmIdentifier;
use crate::rsa::primitives::{emsa_pkcs1_v15_encode, i2osp, os2ip};
use crate::rsa::{PrivateKey, PublicKey};
use crate::{CipherError, Sign, Verify};

#[derive(Clone, Debug)]
pub struct Pkcs1v15Verify {
    key: PublicKey,
    alg: AlgorithmIdentifier,
}

#[derive(Clone, Debug)]
pub struct Pkcs1v15Sign {
    key: PrivateKey,
    alg: AlgorithmIdentifier,
}

impl AsRef<PublicKey> for Pkcs1v15Verify {
    fn as_ref(&self) -> &PublicKey {
        &self.key
    }
}

impl AsRef<PrivateKey> for Pkcs1v15Sign {
    fn as_ref(&self) -> &PrivateKey {
        &self.key
    }
}

impl Pkcs1v15Verify {
    /// 不检查`key`的合法性
    pub fn new(key: PublicKey, alg: AlgorithmIdentifier) -> Self {
        Self { key, alg }
    }

    pub fn algorithm(&self) -> AlgorithmIdentifier {
        self.alg
    }

    /// 签名的字节长度`k`
    pub fn key_len(&self) -> usize {
        self.key.key_len()
    }

    fn verify_inner(&self, msg: &[u8], signature: &[u8]) -> Result<bool, CipherError> {
        let k = self.key_len();
        let s = os2ip(signature);
        let m = self.key.rsavp1(&s)?;
        let em = i2osp(&m, k)?;
        let expect = emsa_pkcs1_v15_encode(msg, k, self.alg)?;
        Ok(em == expect)
    }
}

impl Verify for Pkcs1v15Verify {
    /// 签名长度不等于`k`时直接返回`false`, 验证过程中的任何错误也都视为验证失败.
    fn verify(&self, msg: &[u8], signature: &[u8]) -> bool {
        if signature.len() != self.key_len() {
            log::debug!(
                "rsassa-pkcs1-v1_5: signature length `{}` not match to modulus length `{}`",
                signature.len(),
                self.key_len()
            );
            return false;
        }

        match self.verify_inner(msg, signature) {
            Ok(b) => b,
            Err(e) => {
                log::debug!("rsassa-pkcs1-v1_5: {e}");
                false
            }
        }
    }
}

impl Pkcs1v15Sign {
    /// 不检查`key`的合法性
    pub fn new(key: PrivateKey, alg: AlgorithmIdentifier) -> Self {
        Self { key, alg }
    }

    pub fn algorithm(&self) -> AlgorithmIdentifier {
        self.alg
    }

    pub fn key_len(&self) -> usize {
        self.key.key_len()
    }
}

impl Sign for Pkcs1v15Sign {
    /// `S = I2OSP(RSASP1(K, OS2IP(EMSA-PKCS1-V1_5-ENCODE(M, k))), k)`, 写入`signature`之前不清空
    fn sign(&self, msg: &[u8], signature: &mut Vec<u8>) -> Result<(), CipherError> {
        let k = self.key_len();
        let em = emsa_pkcs1_v15_encode(msg, k, self.alg)?;
        let s = self.key.rsasp1(&os2ip(em.as_slice()))?;
        signature.extend(i2osp(&s, k)?);
        Ok(())
    }
}
