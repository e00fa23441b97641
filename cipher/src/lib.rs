mod error;
pub use error::CipherError;

pub mod block_cipher;
pub use block_cipher::{BlockCipher, BlockDecrypt, BlockEncrypt};

pub mod cipher_mode;
pub use cipher_mode::BlockPadding;

pub mod ae;

pub mod asn1;

pub mod mac;
pub use mac::MAC;

pub mod rsa;

pub mod utils;

pub trait Encrypt {
    // 写入ciphertext之前不清空
    fn encrypt(&self, plaintext: &[u8], ciphertext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Decrypt {
    // 写入plaintext之前不清空
    fn decrypt(&self, ciphertext: &[u8], plaintext: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Cipher: Encrypt + Decrypt {}

impl<T> Cipher for T where T: Encrypt + Decrypt {}

pub trait Sign {
    // 写入sign之前不清空
    fn sign(&self, msg: &[u8], sign: &mut Vec<u8>) -> Result<(), CipherError>;
}

pub trait Verify {
    /// 签名不匹配以及验证过程中的任何错误都返回`false`
    fn verify(&self, msg: &[u8], sign: &[u8]) -> bool;
}
