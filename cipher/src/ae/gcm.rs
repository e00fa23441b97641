use crate::{BlockEncrypt, CipherError};

/// # Galois/Counter Mode(GCM) 基本运算
///
/// - [Recommendation for Block Cipher Modes of Operation: GCM and GMAC](https://csrc.nist.gov/pubs/sp/800/38/d/final) <br>
///
/// 只提供GCM的组成部件: `inc32`, 块乘法, `GHASH`, `GCTR`, hash subkey `H`以及pre-counter block `J0`.
/// 不提供认证标签的生成和校验. <br>
///
/// 128位块以大端序`u128`表示, 块的第0位是`u128`的最高位.
pub struct Gcm<E> {
    cipher: E,
}

/// `R = 11100001 || 0^120`
const R: u128 = 0b11100001u128 << 120;

/// `inc_32(X) = MSB_96(X) || (LSB_32(X) + 1 mod 2^32)`
pub const fn inc32(x: u128) -> u128 {
    let low = (x as u32).wrapping_add(1);
    ((x >> 32) << 32) | (low as u128)
}

/// GF(2^128)上两个块的乘积`X \cdot Y`, SP 800-38D Algorithm 1
pub const fn block_mul(x: u128, y: u128) -> u128 {
    let (mut z, mut v, mut i) = (0, y, 0);

    while i < u128::BITS {
        if (x & (1u128 << (u128::BITS - 1 - i))) != 0 {
            z ^= v;
        }
        if (v & 0x1) != 0 {
            v = (v >> 1) ^ R;
        } else {
            v >>= 1;
        }
        i += 1;
    }

    z
}

/// `GHASH(pre, X, h) = Y_m`, `Y_i = (Y_{i-1} ^ X_i) * h, i = 1...m` <br>
/// `x`的长度无需是16的整数倍, 等价于末尾补0对齐.
pub fn ghash(pre_hash: u128, x: &[u8], h: u128) -> u128 {
    x.chunks(16).fold(pre_hash, |y, chunk| {
        let mut buf = [0u8; 16];
        buf[..chunk.len()].copy_from_slice(chunk);
        block_mul(y ^ u128::from_be_bytes(buf), h)
    })
}

impl<E> Gcm<E>
where
    E: BlockEncrypt<16>,
{
    pub fn new(cipher: E) -> Self {
        Self { cipher }
    }

    fn ciph(&self, block: u128) -> u128 {
        u128::from_be_bytes(self.cipher.encrypt_block(&block.to_be_bytes()))
    }

    /// `H = CIPH_K(0^128)`
    pub fn hash_subkey(&self) -> u128 {
        self.ciph(0)
    }

    /// `GCTR(ICB, X)`: 第`i`个计数块`CB_i = inc32(CB_{i-1})`, 输出和`x`等长. 空输入得到空输出.
    pub fn gctr(&self, icb: u128, x: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(x.len());
        let mut cb = icb;

        for chunk in x.chunks(16) {
            let y = self.ciph(cb).to_be_bytes();
            out.extend(chunk.iter().zip(y.iter()).map(|(a, b)| a ^ b));
            cb = inc32(cb);
        }

        out
    }

    /// pre-counter block `J0` <br>
    /// - `len(IV) = 96`: `J0 = IV || 0^31 || 1`;
    /// - 其它: `J0 = GHASH_H(IV || 0^{s+64} || [len(IV)]_64)`;
    pub fn pre_counter_block(&self, iv: &[u8], h: u128) -> Result<u128, CipherError> {
        if iv.is_empty() {
            return Err(CipherError::AEError(
                "IV length cannot be zero".to_string(),
            ));
        }

        let mut buf = [0u8; 16];
        if iv.len() == 12 {
            buf[..12].copy_from_slice(iv);
            buf[15] = 1;
            Ok(u128::from_be_bytes(buf))
        } else {
            buf[8..].copy_from_slice(&((iv.len() as u64) << 3).to_be_bytes());
            let pre = ghash(0, iv, h);
            Ok(ghash(pre, buf.as_slice(), h))
        }
    }
}
