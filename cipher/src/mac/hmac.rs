//! HMAC(RFC 2104, FIPS 198-1) <br>
//!
//! `HMAC(K, m) = H((K' ^ opad) || H((K' ^ ipad) || m))`, 计算委托给`hmac`库.
//!

use crate::asn1::AlgorithmIdentifier;
use crate::mac::MAC;
use crate::CipherError;
use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::Digest;
use hmac::{Mac, SimpleHmac};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

#[derive(Clone)]
pub struct Hmac {
    alg: AlgorithmIdentifier,
    key: Vec<u8>,
}

impl Hmac {
    /// 任意长度的密钥都合法, 长于摘要块大小时先做摘要
    pub fn new(alg: AlgorithmIdentifier, key: &[u8]) -> Self {
        Self {
            alg,
            key: key.to_vec(),
        }
    }

    pub fn algorithm(&self) -> AlgorithmIdentifier {
        self.alg
    }

    fn compute<D: Digest + BlockSizeUser>(&self, msg: &[u8]) -> Result<SimpleHmac<D>, CipherError> {
        let mut h = <SimpleHmac<D> as Mac>::new_from_slice(self.key.as_slice()).map_err(|_| {
            CipherError::InvalidKeySize {
                target: None,
                real: self.key.len(),
            }
        })?;
        h.update(msg);
        Ok(h)
    }

    fn tag<D: Digest + BlockSizeUser>(&self, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        Ok(self.compute::<D>(msg)?.finalize().into_bytes().to_vec())
    }

    fn check<D: Digest + BlockSizeUser>(&self, msg: &[u8], tag: &[u8]) -> bool {
        self.compute::<D>(msg)
            .map(|h| h.verify_slice(tag).is_ok())
            .unwrap_or(false)
    }
}

impl MAC for Hmac {
    fn mac_len(&self) -> usize {
        self.alg.h_len()
    }

    fn mac(&self, msg: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.alg {
            AlgorithmIdentifier::Md2 => self.tag::<md2::Md2>(msg),
            AlgorithmIdentifier::Md5 => self.tag::<md5::Md5>(msg),
            AlgorithmIdentifier::Sha1 => self.tag::<sha1::Sha1>(msg),
            AlgorithmIdentifier::Sha224 => self.tag::<sha2::Sha224>(msg),
            AlgorithmIdentifier::Sha256 => self.tag::<sha2::Sha256>(msg),
            AlgorithmIdentifier::Sha384 => self.tag::<sha2::Sha384>(msg),
            AlgorithmIdentifier::Sha512 => self.tag::<sha2::Sha512>(msg),
            AlgorithmIdentifier::Sha512_224 => self.tag::<sha2::Sha512_224>(msg),
            AlgorithmIdentifier::Sha512_256 => self.tag::<sha2::Sha512_256>(msg),
        }
    }

    fn verify_mac(&self, msg: &[u8], tag: &[u8]) -> bool {
        match self.alg {
            AlgorithmIdentifier::Md2 => self.check::<md2::Md2>(msg, tag),
            AlgorithmIdentifier::Md5 => self.check::<md5::Md5>(msg, tag),
            AlgorithmIdentifier::Sha1 => self.check::<sha1::Sha1>(msg, tag),
            AlgorithmIdentifier::Sha224 => self.check::<sha2::Sha224>(msg, tag),
            AlgorithmIdentifier::Sha256 => self.check::<sha2::Sha256>(msg, tag),
            AlgorithmIdentifier::Sha384 => self.check::<sha2::Sha384>(msg, tag),
            AlgorithmIdentifier::Sha512 => self.check::<sha2::Sha512>(msg, tag),
            AlgorithmIdentifier::Sha512_224 => self.check::<sha2::Sha512_224>(msg, tag),
            AlgorithmIdentifier::Sha512_256 => self.check::<sha2::Sha512_256>(msg, tag),
        }
    }
}

impl std::fmt::Debug for Hmac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hmac")
            .field("alg", &self.alg)
            .field("key_len", &self.key.len())
            .finish()
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for Hmac {
    fn zeroize(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(feature = "sec-zeroize-drop")]
impl Drop for Hmac {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::Hmac;
    use crate::asn1::AlgorithmIdentifier;
    use crate::mac::MAC;

    #[test]
    fn known_answer() {
        // RFC 2104, RFC 2202, RFC 4231 test case 2
        let cases = [
            (AlgorithmIdentifier::Md5, "750c783e6ab0b503eaa86e310a5db738"),
            (AlgorithmIdentifier::Sha1, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"),
            (
                AlgorithmIdentifier::Sha256,
                "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
            ),
            (
                AlgorithmIdentifier::Sha512,
                "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737",
            ),
        ];

        let msg = b"what do ya want for nothing?";
        for (i, (alg, expect)) in cases.into_iter().enumerate() {
            let h = Hmac::new(alg, b"Jefe");
            let tag = h.mac(msg).unwrap();
            assert_eq!(hex::encode(&tag), expect, "case {i} {alg} failed");
            assert_eq!(tag.len(), h.mac_len(), "case {i} {alg} length");
            assert!(h.verify_mac(msg, &tag), "case {i} {alg} verify failed");
        }
    }

    #[test]
    fn reject_modified() {
        for alg in AlgorithmIdentifier::ALL {
            let h = Hmac::new(alg, &[0x0b; 20]);
            let mut tag = h.mac(b"Hi There").unwrap();
            assert_eq!(tag.len(), alg.h_len(), "{alg}");

            assert!(!h.verify_mac(b"Hi there", &tag), "{alg}");
            assert!(!h.verify_mac(b"Hi There", &tag[1..]), "{alg}");
            tag[0] ^= 0x80;
            assert!(!h.verify_mac(b"Hi There", &tag), "{alg}");
        }
    }
}
