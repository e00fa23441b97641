//! FIPS 197 Section 5.2 Key Expansion <br>
//!
//! 由`Nk`个字的密钥派生出`4 * (Nr + 1)`个字的轮密钥: <br>
//! - `w[i] = key[4i..4i+4], i < Nk`;
//! - `w[i] = w[i - Nk] ^ SubWord(RotWord(w[i-1])) ^ Rcon[i/Nk], i mod Nk = 0`;
//! - `w[i] = w[i - Nk] ^ SubWord(w[i-1]), Nk > 6 && i mod Nk = 4`;
//! - `w[i] = w[i - Nk] ^ w[i-1]`, 其它;

use super::{Aes, AesMode};
use crate::CipherError;

#[inline]
pub(super) const fn sub_word(w: u32) -> u32 {
    let i = w.to_be_bytes();
    u32::from_be_bytes([
        Aes::SBOX[i[0] as usize],
        Aes::SBOX[i[1] as usize],
        Aes::SBOX[i[2] as usize],
        Aes::SBOX[i[3] as usize],
    ])
}

/// `[a0, a1, a2, a3] -> [a1, a2, a3, a0]`
#[inline]
pub(super) const fn rot_word(w: u32) -> u32 {
    w.rotate_left(8)
}

#[inline]
const fn rcon(i: usize) -> u32 {
    (Aes::RCON[i - 1] as u32) << 24
}

/// `nk`: 密钥字长; `nr`: 加密轮数. 返回`4 * (nr + 1)`个大端序字.
pub fn key_expansion(key: &[u8], nk: usize, nr: usize) -> Result<Vec<u32>, CipherError> {
    let mode = AesMode::from_rounds(nr)?;
    if mode.nk() != nk {
        return Err(CipherError::InvalidKeySize {
            target: Some(mode.key_len()),
            real: nk << 2,
        });
    } else if key.len() != (nk << 2) {
        return Err(CipherError::InvalidKeySize {
            target: Some(nk << 2),
            real: key.len(),
        });
    }

    Ok(expand(key, nk, nr))
}

// 调用者保证`key.len() == 4 * nk`
pub(super) fn expand(key: &[u8], nk: usize, nr: usize) -> Vec<u32> {
    let total = (nr + 1) << 2;
    let mut w = Vec::with_capacity(total);

    w.extend(
        key.chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]])),
    );

    for i in nk..total {
        let tmp = w[i - 1];
        let t = if i % nk == 0 {
            sub_word(rot_word(tmp)) ^ rcon(i / nk)
        } else if nk > 6 && i % nk == 4 {
            sub_word(tmp)
        } else {
            tmp
        };
        w.push(w[i - nk] ^ t);
    }

    w
}
