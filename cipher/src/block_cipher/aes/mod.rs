//! AES加密<br>
//! FIPS 197  <br>
//! [FIPS 197-upd1](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.197-upd1.pdf)<br>
//!
//! 按标准逐步实现: State变换(`SubBytes`, `ShiftRows`, `MixColumns`, `AddRoundKey`)、
//! 密钥扩展以及`Cipher`/`InvCipher`. 不使用T-table或硬件指令.<br>

use std::fmt::{Debug, Display};

#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

use crate::{BlockDecrypt, BlockEncrypt, CipherError, Decrypt, Encrypt};

mod consts;
pub mod gf;
pub mod key_schedule;
pub mod state;

pub use key_schedule::key_expansion;
pub use state::State;


/// AES-128 / AES-192 / AES-256
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AesMode {
    Aes128,
    Aes192,
    Aes256,
}

impl AesMode {
    pub const BLOCK_SIZE: usize = 16;

    /// 加密轮数`Nr`
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }

    pub const fn block_size(self) -> usize {
        Self::BLOCK_SIZE
    }

    /// 密钥字节长度
    pub const fn key_len(self) -> usize {
        self.nk() << 2
    }

    /// 密钥字长`Nk`
    pub const fn nk(self) -> usize {
        match self {
            Self::Aes128 => 4,
            Self::Aes192 => 6,
            Self::Aes256 => 8,
        }
    }

    /// 轮密钥字数`4 * (Nr + 1)`
    pub const fn round_key_words(self) -> usize {
        (self.rounds() + 1) << 2
    }

    pub fn from_key_len(len: usize) -> Result<Self, CipherError> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            _ => Err(CipherError::InvalidKeySize {
                target: None,
                real: len,
            }),
        }
    }

    pub fn from_rounds(nr: usize) -> Result<Self, CipherError> {
        match nr {
            10 => Ok(Self::Aes128),
            12 => Ok(Self::Aes192),
            14 => Ok(Self::Aes256),
            _ => Err(CipherError::InvalidRounds(nr)),
        }
    }
}

impl Display for AesMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("AES-{}", self.key_len() << 3))
    }
}

/// 持有加密模式和扩展后的轮密钥, 创建后不可变.
#[derive(Clone)]
pub struct Aes {
    mode: AesMode,
    round_keys: Vec<u32>,
}

impl Aes {
    pub const BLOCK_SIZE: usize = AesMode::BLOCK_SIZE;

    /// 根据密钥长度(16/24/32字节)选择AES模式
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        Self::with_mode(key, AesMode::from_key_len(key.len())?)
    }

    pub fn with_mode(key: &[u8], mode: AesMode) -> Result<Self, CipherError> {
        if key.len() != mode.key_len() {
            return Err(CipherError::InvalidKeySize {
                target: Some(mode.key_len()),
                real: key.len(),
            });
        }

        Ok(Self {
            mode,
            round_keys: key_schedule::expand(key, mode.nk(), mode.rounds()),
        })
    }

    pub fn mode(&self) -> AesMode {
        self.mode
    }

    pub fn round_keys(&self) -> &[u32] {
        self.round_keys.as_slice()
    }
}

impl Debug for Aes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes").field("mode", &self.mode).finish()
    }
}

#[cfg(feature = "sec-zeroize")]
impl Zeroize for Aes {
    fn zeroize(&mut self) {
        self.round_keys.zeroize();
    }
}

#[cfg(feature = "sec-zeroize-drop")]
impl Drop for Aes {
    fn drop(&mut self) {
        self.zeroize();
    }
}

fn check_params(input: &[u8], round_keys: &[u32], nr: usize) -> Result<[u8; 16], CipherError> {
    let mode = AesMode::from_rounds(nr)?;
    if round_keys.len() != mode.round_key_words() {
        return Err(CipherError::InvalidKeySize {
            target: Some(mode.round_key_words()),
            real: round_keys.len(),
        });
    }

    <[u8; 16]>::try_from(input).map_err(|_| CipherError::InvalidBlockSize {
        target: AesMode::BLOCK_SIZE,
        real: input.len(),
    })
}

/// FIPS 197 Section 5.1 Cipher
pub fn cipher(input: &[u8], round_keys: &[u32], nr: usize) -> Result<[u8; 16], CipherError> {
    let block = check_params(input, round_keys, nr)?;
    Ok(cipher_block(&block, round_keys, nr))
}

/// FIPS 197 Section 5.3 InvCipher
pub fn inv_cipher(input: &[u8], round_keys: &[u32], nr: usize) -> Result<[u8; 16], CipherError> {
    let block = check_params(input, round_keys, nr)?;
    Ok(inv_cipher_block(&block, round_keys, nr))
}

// 调用者保证`w.len() == 4 * (nr + 1)`
fn cipher_block(input: &[u8; 16], w: &[u32], nr: usize) -> [u8; 16] {
    let mut state = State::from_block(input);
    state.add_round_key(&w[0..4]);

    for round in 1..nr {
        state.sub_bytes();
        state.shift_rows();
        state.mix_columns();
        state.add_round_key(&w[(round << 2)..((round + 1) << 2)]);
    }

    state.sub_bytes();
    state.shift_rows();
    state.add_round_key(&w[(nr << 2)..((nr + 1) << 2)]);

    state.output()
}

fn inv_cipher_block(input: &[u8; 16], w: &[u32], nr: usize) -> [u8; 16] {
    let mut state = State::from_block(input);
    state.add_round_key(&w[(nr << 2)..((nr + 1) << 2)]);

    for round in (1..nr).rev() {
        state.inv_shift_rows();
        state.inv_sub_bytes();
        state.add_round_key(&w[(round << 2)..((round + 1) << 2)]);
        state.inv_mix_columns();
    }

    state.inv_shift_rows();
    state.inv_sub_bytes();
    state.add_round_key(&w[0..4]);

    state.output()
}

impl BlockEncrypt<16> for Aes {
    fn encrypt_block(&self, plaintext: &[u8; 16]) -> [u8; 16] {
        cipher_block(plaintext, &self.round_keys, self.mode.rounds())
    }
}

impl BlockDecrypt<16> for Aes {
    fn decrypt_block(&self, ciphertext: &[u8; 16]) -> [u8; 16] {
        inv_cipher_block(ciphertext, &self.round_keys, self.mode.rounds())
    }
}

impl Encrypt for Aes {
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError> {
        let block = cipher(plaintext, &self.round_keys, self.mode.rounds())?;
        ciphertext.extend(block);
        Ok(())
    }
}

impl Decrypt for Aes {
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError> {
        let block = inv_cipher(ciphertext, &self.round_keys, self.mode.rounds())?;
        plaintext.extend(block);
        Ok(())
    }
}

/// 根据密钥长度选择模式, 加密单个分组
pub fn encrypt_block(key: &[u8], input: &[u8]) -> Result<[u8; 16], CipherError> {
    let aes = Aes::new(key)?;
    cipher(input, aes.round_keys(), aes.mode().rounds())
}

pub fn decrypt_block(key: &[u8], input: &[u8]) -> Result<[u8; 16], CipherError> {
    let aes = Aes::new(key)?;
    inv_cipher(input, aes.round_keys(), aes.mode().rounds())
}

/// 密钥长度需和`mode`一致
pub fn encrypt_block_with_mode(
    key: &[u8],
    input: &[u8],
    mode: AesMode,
) -> Result<[u8; 16], CipherError> {
    let aes = Aes::with_mode(key, mode)?;
    cipher(input, aes.round_keys(), mode.rounds())
}

pub fn decrypt_block_with_mode(
    key: &[u8],
    input: &[u8],
    mode: AesMode,
) -> Result<[u8; 16], CipherError> {
    let aes = Aes::with_mode(key, mode)?;
    inv_cipher(input, aes.round_keys(), mode.rounds())
}
