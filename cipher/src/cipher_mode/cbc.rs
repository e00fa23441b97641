//! ## The Cipher Block Chaining Mode(CBC)
//!
//! 给定初始向量IV, IV可以不保密, 但是**它必须是不可预测的(unpredictable)**. <br>
//!
//! $$
//! C_1 = Encrypt(P_1 \xor IV); C_j = Encrypt(P_j \xor C_{j-1}), j = 2...n
//!
//! P_1 = Decrypt(C_1) \xor IV; P_j = Decrypt(C_j) \xor C_{j-1}, j = 2...n
//! $$
//!
//! 在CBC模式中, 加密每个明文块依赖前一个密文输出, 故Encrypt无法并行. 但Decrypt是可以并行的. <br>

use crate::block_cipher::{Aes, BlockDecrypt, BlockEncrypt};
use crate::cipher_mode::{BlockCipherSession, BlockPadding, ChainingMode, Operation};
use crate::CipherError;
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

/// Cipher Block Chaining Mode(CBC) <br>
///
/// `prev`初始为IV, 之后是上一个密文块. 每次加解密需要新的会话和新的IV.
#[derive(Clone)]
pub struct Cbc<E, const N: usize> {
    cipher: E,
    prev: [u8; N],
}

impl<E, const N: usize> Cbc<E, N> {
    pub fn new(cipher: E, iv: [u8; N]) -> Self {
        Self { cipher, prev: iv }
    }

    pub fn cipher(&self) -> &E {
        &self.cipher
    }
}

impl<E, const N: usize> ChainingMode<N> for Cbc<E, N>
where
    E: BlockEncrypt<N> + BlockDecrypt<N>,
{
    fn encrypt_chained(&mut self, block: &[u8; N]) -> [u8; N] {
        self.prev.iter_mut().zip(block.iter()).for_each(|(a, b)| *a ^= b);
        self.prev = self.cipher.encrypt_block(&self.prev);
        self.prev
    }

    fn decrypt_chained(&mut self, block: &[u8; N]) -> [u8; N] {
        let mut d = self.cipher.decrypt_block(block);
        d.iter_mut().zip(self.prev.iter()).for_each(|(a, b)| *a ^= b);
        self.prev = *block;
        d
    }
}

#[cfg(feature = "sec-zeroize")]
impl<E, const N: usize> Zeroize for Cbc<E, N>
where
    E: Zeroize,
{
    fn zeroize(&mut self) {
        self.cipher.zeroize();
        self.prev.zeroize();
    }
}

pub type AesCbc<P> = BlockCipherSession<Cbc<Aes, 16>, P, 16>;

impl<P: BlockPadding> BlockCipherSession<Cbc<Aes, 16>, P, 16> {
    /// AES-CBC会话, `iv`需是16字节
    pub fn aes_cbc(op: Operation, key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        let iv = <[u8; 16]>::try_from(iv).map_err(|_| CipherError::InvalidBlockSize {
            target: 16,
            real: iv.len(),
        })?;
        Ok(Self::new(op, Cbc::new(Aes::new(key)?, iv)))
    }
}
