use std::fmt::Display;
use std::str::FromStr;

use sha2::Digest;

use crate::asn1::der::{encode_tlv, Asn1Tag, DerReader};
use crate::asn1::ObjectIdentifier;
use crate::CipherError;

/// PKCS#1 v2.2(RFC 8017) Appendix B.1中EMSA-PKCS1-v1_5使用的摘要算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmIdentifier {
    Md2,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha512_224,
    Sha512_256,
}

impl AlgorithmIdentifier {
    pub const ALL: [Self; 9] = [
        Self::Md2,
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
    ];

    pub const fn oid_components(&self) -> &'static [u64] {
        match self {
            Self::Md2 => &[1, 2, 840, 113549, 2, 2],
            Self::Md5 => &[1, 2, 840, 113549, 2, 5],
            Self::Sha1 => &[1, 3, 14, 3, 2, 26],
            Self::Sha224 => &[2, 16, 840, 1, 101, 3, 4, 2, 4],
            Self::Sha256 => &[2, 16, 840, 1, 101, 3, 4, 2, 1],
            Self::Sha384 => &[2, 16, 840, 1, 101, 3, 4, 2, 2],
            Self::Sha512 => &[2, 16, 840, 1, 101, 3, 4, 2, 3],
            Self::Sha512_224 => &[2, 16, 840, 1, 101, 3, 4, 2, 5],
            Self::Sha512_256 => &[2, 16, 840, 1, 101, 3, 4, 2, 6],
        }
    }

    pub fn oid(&self) -> ObjectIdentifier {
        ObjectIdentifier(self.oid_components().to_vec())
    }

    /// 摘要字节长度`hLen`
    pub const fn h_len(&self) -> usize {
        match self {
            Self::Md2 | Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 => 28,
            Self::Sha256 | Self::Sha512_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Md2 => "MD2",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha224 => "SHA-224",
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
            Self::Sha512_224 => "SHA-512/224",
            Self::Sha512_256 => "SHA-512/256",
        }
    }

    pub fn digest(&self, msg: &[u8]) -> Vec<u8> {
        match self {
            Self::Md2 => md2::Md2::digest(msg).to_vec(),
            Self::Md5 => md5::Md5::digest(msg).to_vec(),
            Self::Sha1 => sha1::Sha1::digest(msg).to_vec(),
            Self::Sha224 => sha2::Sha224::digest(msg).to_vec(),
            Self::Sha256 => sha2::Sha256::digest(msg).to_vec(),
            Self::Sha384 => sha2::Sha384::digest(msg).to_vec(),
            Self::Sha512 => sha2::Sha512::digest(msg).to_vec(),
            Self::Sha512_224 => sha2::Sha512_224::digest(msg).to_vec(),
            Self::Sha512_256 => sha2::Sha512_256::digest(msg).to_vec(),
        }
    }

    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self, CipherError> {
        Self::ALL
            .into_iter()
            .find(|x| x.oid_components() == oid.components())
            .ok_or_else(|| CipherError::UnsupportedAlgorithm(format!("OID {oid}")))
    }

    /// `SEQUENCE { algorithm OBJECT IDENTIFIER, parameters NULL }`
    pub fn encode(&self) -> Vec<u8> {
        let mut content = self.oid().encode();
        content.extend(encode_tlv(Asn1Tag::Null, &[]));
        encode_tlv(Asn1Tag::Sequence, &content)
    }

    /// 解码一个AlgorithmIdentifier, 参数可以是NULL或缺省. 返回算法和消耗的字节数.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), CipherError> {
        let mut reader = DerReader::new(bytes);
        let seq = reader.read(Asn1Tag::Sequence)?;

        let mut inner = DerReader::new(seq);
        let oid = ObjectIdentifier::decode_content(inner.read(Asn1Tag::ObjectIdentifier)?)?;
        if !inner.is_empty() {
            let params = inner.read(Asn1Tag::Null)?;
            if !params.is_empty() || !inner.is_empty() {
                return Err(CipherError::InvalidDer(
                    "unexpected AlgorithmIdentifier parameters".to_string(),
                ));
            }
        }

        Ok((Self::from_oid(&oid)?, reader.position()))
    }
}

impl Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmIdentifier {
    type Err = CipherError;

    /// 忽略大小写, `-`和`_`, 如`sha256`, `SHA-256`, `sha512/224`, `sha512_224`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s
            .chars()
            .filter(|c| *c != '-')
            .map(|c| if c == '_' { '/' } else { c.to_ascii_lowercase() })
            .collect::<String>();
        Self::ALL
            .into_iter()
            .find(|x| x.name().replace('-', "").to_ascii_lowercase() == norm)
            .ok_or_else(|| CipherError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// `DigestInfo ::= SEQUENCE { digestAlgorithm AlgorithmIdentifier, digest OCTET STRING }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestInfo {
    pub algorithm: AlgorithmIdentifier,
    pub digest: Vec<u8>,
}

impl DigestInfo {
    pub fn new(algorithm: AlgorithmIdentifier, digest: Vec<u8>) -> Self {
        Self { algorithm, digest }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut content = self.algorithm.encode();
        content.extend(encode_tlv(Asn1Tag::OctetString, &self.digest));
        encode_tlv(Asn1Tag::Sequence, &content)
    }

    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), CipherError> {
        let mut reader = DerReader::new(bytes);
        let seq = reader.read(Asn1Tag::Sequence)?;

        let (algorithm, size) = AlgorithmIdentifier::decode(seq)?;
        let mut inner = DerReader::new(&seq[size..]);
        let digest = inner.read(Asn1Tag::OctetString)?.to_vec();
        if !inner.is_empty() {
            return Err(CipherError::InvalidDer(
                "trailing data in DigestInfo".to_string(),
            ));
        }

        Ok((Self { algorithm, digest }, reader.position()))
    }
}
