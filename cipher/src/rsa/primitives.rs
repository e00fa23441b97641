//! 数据转换原语(RFC 8017 Section 4)和EMSA-PKCS1-v1_5编码(Section 9.2)

use crate::asn1::{AlgorithmIdentifier, DigestInfo};
use crate::CipherError;
use num_bigint::BigUint;

/// OS2IP: 大端序字节串转非负整数
pub fn os2ip(x: &[u8]) -> BigUint {
    BigUint::from_bytes_be(x)
}

/// I2OSP: 非负整数转`x_len`字节的大端序字节串, 高位补0
pub fn i2osp(x: &BigUint, x_len: usize) -> Result<Vec<u8>, CipherError> {
    let bytes = x.to_bytes_be();
    // 0的to_bytes_be为`[0]`
    let bytes = if bytes.iter().all(|&b| b == 0) {
        &[][..]
    } else {
        bytes.as_slice()
    };

    if bytes.len() > x_len {
        return Err(CipherError::IntegerTooLarge { len: x_len });
    }

    let mut out = vec![0u8; x_len];
    out[(x_len - bytes.len())..].copy_from_slice(bytes);
    Ok(out)
}

/// EMSA-PKCS1-v1_5-ENCODE, 使用`alg`计算`msg`的摘要 <br>
///
/// `EM = 0x00 || 0x01 || PS || 0x00 || T`, `T`为DigestInfo的DER编码, `PS`为至少8个`0xff`.
pub fn emsa_pkcs1_v15_encode(
    msg: &[u8],
    em_len: usize,
    alg: AlgorithmIdentifier,
) -> Result<Vec<u8>, CipherError> {
    emsa_pkcs1_v15_encode_digest(alg.digest(msg).as_slice(), em_len, alg)
}

/// 同[`emsa_pkcs1_v15_encode`], 但`h`为已经计算好的摘要
pub fn emsa_pkcs1_v15_encode_digest(
    h: &[u8],
    em_len: usize,
    alg: AlgorithmIdentifier,
) -> Result<Vec<u8>, CipherError> {
    if h.len() > alg.h_len() {
        return Err(CipherError::MessageTooLong {
            target: alg.h_len(),
            real: h.len(),
        });
    }

    let t = DigestInfo::new(alg, h.to_vec()).encode();
    if em_len < t.len() + 11 {
        return Err(CipherError::EncodedMessageTooShort {
            em_len,
            t_len: t.len(),
        });
    }

    let mut em = Vec::with_capacity(em_len);
    em.extend([0x00, 0x01]);
    em.resize(em_len - t.len() - 1, 0xff);
    em.push(0x00);
    em.extend(t);
    Ok(em)
}
