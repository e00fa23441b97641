use std::{error::Error, fmt::Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CipherError {
    /// 不合法分组大小
    InvalidBlockSize { target: usize, real: usize },

    /// 不合法的密钥长度
    InvalidKeySize { target: Option<usize>, real: usize },

    /// AES加密轮数只能是10, 12, 14
    InvalidRounds(usize),

    /// State的行列索引需在`[0, 4)`内
    IndexOutOfRange { row: usize, col: usize },

    /// RSA message/signature representative out of range `[0, n)`
    OutOfRange(String),

    /// EMSA-PKCS1-v1_5: the hash output is longer than the declared `hLen`
    MessageTooLong { target: usize, real: usize },

    /// EMSA-PKCS1-v1_5: `emLen < tLen + 11`
    EncodedMessageTooShort { em_len: usize, t_len: usize },

    /// I2OSP: integer too large for the requested octet length
    IntegerTooLarge { len: usize },

    UnsupportedAlgorithm(String),

    InvalidKey(String),

    UnpaddingNotMatch(String),

    /// 不合法的DER编码
    InvalidDer(String),

    AEError(String),

    Other(String),
}

impl Display for CipherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBlockSize { target, real } => f.write_fmt(format_args!(
                "Invalid block data size `{real}` not match to target size `{target}`"
            )),
            Self::InvalidKeySize { target, real } => match target {
                Some(target) => f.write_fmt(format_args!(
                    "Invalid key size `{real}` not match to target size `{target}`"
                )),
                None => f.write_fmt(format_args!("Invalid key size `{real}`")),
            },
            Self::InvalidRounds(nr) => f.write_fmt(format_args!(
                "Invalid number of rounds `{nr}`, it should be one of 10, 12 or 14"
            )),
            Self::IndexOutOfRange { row, col } => f.write_fmt(format_args!(
                "State index `({row}, {col})` out of range `[0, 4)`"
            )),
            Self::OutOfRange(s) => f.write_str(s.as_str()),
            Self::MessageTooLong { target, real } => f.write_fmt(format_args!(
                "message too long: hash length `{real}` great than declared length `{target}`"
            )),
            Self::EncodedMessageTooShort { em_len, t_len } => f.write_fmt(format_args!(
                "intended encoded message length `{em_len}` too short for `tLen={t_len}`"
            )),
            Self::IntegerTooLarge { len } => {
                f.write_fmt(format_args!("integer too large to fit in `{len}` bytes"))
            }
            Self::UnsupportedAlgorithm(s) => {
                f.write_fmt(format_args!("unsupported algorithm `{s}`"))
            }
            Self::InvalidKey(s) => f.write_fmt(format_args!("invalid key: {s}")),
            Self::UnpaddingNotMatch(s) => {
                f.write_fmt(format_args!("unpadding failed with `{s}`"))
            }
            Self::InvalidDer(s) => f.write_fmt(format_args!("invalid DER encoding: {s}")),
            Self::AEError(s) | Self::Other(s) => f.write_str(s.as_str()),
        }
    }
}

impl Error for CipherError {}

impl From<std::io::Error> for CipherError {
    fn from(value: std::io::Error) -> Self {
        Self::Other(format!("{value}"))
    }
}
