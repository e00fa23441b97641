//! Message Authentication Code <br>
//!
//! 以某个密钥生成指定长度的消息摘要, 用于验证消息的完整性和身份验证(拥有该密钥的身份者才能够生成该摘要)
//!

mod hmac;
pub use self::hmac::Hmac;

use crate::CipherError;

pub trait MAC {
    /// MAC的字节长度
    fn mac_len(&self) -> usize;

    fn mac(&self, msg: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// 常量时间比较
    fn verify_mac(&self, msg: &[u8], tag: &[u8]) -> bool;
}
