//! ## The Electronic Codebook Mode(ECB)
//!
//! $$
//! C_j = Encrypt(P_j), j = 1...n
//!
//! P_j = Decrypt(C_j), j = 1...n
//! $$
//!
//! 给定的密钥, 每个明文块和密文块一一对应(如果不期待使用这一特性, 不应该使用ECB模式). <br>

use crate::block_cipher::{Aes, BlockDecrypt, BlockEncrypt};
use crate::cipher_mode::{BlockCipherSession, BlockPadding, ChainingMode, Operation};
use crate::CipherError;

/// Electronic Codebook Mode(ECB), 各分组独立变换, 无链接状态.
#[derive(Clone, Debug)]
pub struct Ecb<E> {
    cipher: E,
}

impl<E> Ecb<E> {
    /// 相同明文块总是得到相同密文块, 会泄露数据模式
    pub fn new(cipher: E) -> Self {
        log::warn!("ECB mode leaks plaintext patterns: identical blocks encrypt to identical ciphertext");
        Self { cipher }
    }

    pub fn cipher(&self) -> &E {
        &self.cipher
    }
}

impl<E, const N: usize> ChainingMode<N> for Ecb<E>
where
    E: BlockEncrypt<N> + BlockDecrypt<N>,
{
    fn encrypt_chained(&mut self, block: &[u8; N]) -> [u8; N] {
        self.cipher.encrypt_block(block)
    }

    fn decrypt_chained(&mut self, block: &[u8; N]) -> [u8; N] {
        self.cipher.decrypt_block(block)
    }
}

pub type AesEcb<P> = BlockCipherSession<Ecb<Aes>, P, 16>;

impl<P: BlockPadding> BlockCipherSession<Ecb<Aes>, P, 16> {
    /// AES-ECB会话, 密钥长度决定AES模式
    pub fn aes_ecb(op: Operation, key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self::new(op, Ecb::new(Aes::new(key)?)))
    }
}

#[cfg(test)]
mod tests {
    use crate::cipher_mode::{AesEcb, EmptyPadding, Operation, Pkcs7Padding};

    /// NIST SP 800-38A F.1
    fn cases() -> [(&'static str, &'static str, &'static str); 4] {
        [
            (
                "2b7e151628aed2a6abf7158809cf4f3c",
                "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
                "3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf43b1cd7f598ece23881b00e3ed0306887b0c785e27e8ad3f8223207104725dd4",
            ),
            (
                "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
                "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
                "bd334f1d6e45f25ff712a214571fa5cc974104846d0ad3ad7734ecb3ecee4eefef7afd2270e2e60adce0ba2face6444e9a4b41ba738d6c72fb16691603c18e0e",
            ),
            (
                "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
                "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e5130c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710",
                "f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870b6ed21b99ca6f4f9f153e7b1beafed1d23304b7a39f9f3ff067d8d8f9e24ecc7",
            ),
            // FIPS 197 Appendix B
            (
                "2b7e151628aed2a6abf7158809cf4f3c",
                "3243f6a8885a308d313198a2e0370734",
                "3925841d02dc09fbdc118597196a0b32",
            ),
        ]
    }

    #[test]
    fn ecb_aes_empty_padding() {
        for (i, (key, pt, ct)) in cases().into_iter().enumerate() {
            let (key, pt, ct) = (
                hex::decode(key).unwrap(),
                hex::decode(pt).unwrap(),
                hex::decode(ct).unwrap(),
            );

            let ecb = AesEcb::<EmptyPadding>::aes_ecb(Operation::Encrypt, &key).unwrap();
            assert_eq!(ecb.collect(&pt).unwrap(), ct, "case {i} encrypt failed");

            let ecb = AesEcb::<EmptyPadding>::aes_ecb(Operation::Decrypt, &key).unwrap();
            assert_eq!(ecb.collect(&ct).unwrap(), pt, "case {i} decrypt failed");
        }
    }

    #[test]
    fn ecb_identical_blocks() {
        let key = [7u8; 16];
        let ecb = AesEcb::<Pkcs7Padding>::aes_ecb(Operation::Encrypt, &key).unwrap();
        let ct = ecb.collect(&[0x42u8; 32]).unwrap();
        assert_eq!(ct.len(), 48);
        assert_eq!(ct[..16], ct[16..32]);
        assert_ne!(ct[..16], ct[32..]);

        let ecb = AesEcb::<Pkcs7Padding>::aes_ecb(Operation::Decrypt, &key).unwrap();
        assert_eq!(ecb.collect(&ct).unwrap(), vec![0x42u8; 32]);
    }
}
