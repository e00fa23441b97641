//! AES State: 4x4字节矩阵, 按列存储, `s[r, c] = in[r + 4c]`, `0 <= r, c < 4`. <br>
//!
//! FIPS 197 Section 3.4 / 5.1 / 5.3 <br>

use super::gf::multiply_gf256;
use super::Aes;
use crate::CipherError;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct State {
    bytes: [u8; State::BYTES],
}

impl State {
    pub const BYTES: usize = 16;
    const NB: usize = 4;

    pub const fn from_block(block: &[u8; Self::BYTES]) -> Self {
        Self { bytes: *block }
    }

    pub fn new(input: &[u8]) -> Result<Self, CipherError> {
        let bytes = <[u8; Self::BYTES]>::try_from(input).map_err(|_| {
            CipherError::InvalidBlockSize {
                target: Self::BYTES,
                real: input.len(),
            }
        })?;
        Ok(Self { bytes })
    }

    #[inline]
    const fn idx(row: usize, col: usize) -> usize {
        row + (col << 2)
    }

    fn check_idx(row: usize, col: usize) -> Result<usize, CipherError> {
        if row < Self::NB && col < Self::NB {
            Ok(Self::idx(row, col))
        } else {
            Err(CipherError::IndexOutOfRange { row, col })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<u8, CipherError> {
        Self::check_idx(row, col).map(|i| self.bytes[i])
    }

    pub fn set(&mut self, row: usize, col: usize, val: u8) -> Result<(), CipherError> {
        let i = Self::check_idx(row, col)?;
        self.bytes[i] = val;
        Ok(())
    }

    pub fn sub_bytes(&mut self) {
        self.bytes
            .iter_mut()
            .for_each(|b| *b = Aes::SBOX[*b as usize]);
    }

    pub fn inv_sub_bytes(&mut self) {
        self.bytes
            .iter_mut()
            .for_each(|b| *b = Aes::INV_SBOX[*b as usize]);
    }

    /// `s'[r, c] = s[r, (c + r) mod 4]`
    pub fn shift_rows(&mut self) {
        for r in 1..Self::NB {
            let row = self.row(r);
            for c in 0..Self::NB {
                self.bytes[Self::idx(r, c)] = row[(c + r) % Self::NB];
            }
        }
    }

    /// `s'[r, (c + r) mod 4] = s[r, c]`
    pub fn inv_shift_rows(&mut self) {
        for r in 1..Self::NB {
            let row = self.row(r);
            for c in 0..Self::NB {
                self.bytes[Self::idx(r, (c + r) % Self::NB)] = row[c];
            }
        }
    }

    /// 每列视为GF(2^8)上的多项式, 乘以`a(x) = {03}x^3 + {01}x^2 + {01}x + {02}`
    pub fn mix_columns(&mut self) {
        self.mix_columns_with([0x02, 0x03, 0x01, 0x01]);
    }

    /// 乘以`a^{-1}(x) = {0b}x^3 + {0d}x^2 + {09}x + {0e}`
    pub fn inv_mix_columns(&mut self) {
        self.mix_columns_with([0x0e, 0x0b, 0x0d, 0x09]);
    }

    // 循环矩阵第`r`行为`coef`右移`r`位
    fn mix_columns_with(&mut self, coef: [u8; 4]) {
        for c in 0..Self::NB {
            let col = self.column(c);
            for r in 0..Self::NB {
                self.bytes[Self::idx(r, c)] = (0..Self::NB).fold(0, |acc, k| {
                    acc ^ multiply_gf256(coef[(k + Self::NB - r) % Self::NB], col[k])
                });
            }
        }
    }

    /// `round_key`是4个大端序字, 第`c`个字与第`c`列异或
    pub fn add_round_key(&mut self, round_key: &[u32]) {
        for (c, w) in round_key.iter().take(Self::NB).enumerate() {
            for (r, k) in w.to_be_bytes().into_iter().enumerate() {
                self.bytes[Self::idx(r, c)] ^= k;
            }
        }
    }

    /// `out[r + 4c] = s[r, c]`
    pub const fn output(&self) -> [u8; Self::BYTES] {
        self.bytes
    }

    fn row(&self, r: usize) -> [u8; 4] {
        [
            self.bytes[Self::idx(r, 0)],
            self.bytes[Self::idx(r, 1)],
            self.bytes[Self::idx(r, 2)],
            self.bytes[Self::idx(r, 3)],
        ]
    }

    fn column(&self, c: usize) -> [u8; 4] {
        let i = Self::idx(0, c);
        [
            self.bytes[i],
            self.bytes[i + 1],
            self.bytes[i + 2],
            self.bytes[i + 3],
        ]
    }
}
