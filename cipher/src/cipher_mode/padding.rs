use crate::{BlockCipher, CipherError};

/// 块填充策略: 加密结束时把不足一个分组的剩余数据补齐, 解密结束时去除.
pub trait BlockPadding {
    /// 对齐到`block_size`字节长度
    fn new(block_size: usize) -> Self;

    fn padding(&self, buf: &mut Vec<u8>);

    fn unpadding(&self, buf: &mut Vec<u8>) -> Result<(), CipherError>;

    /// 最长补几个块
    fn max_padding_blocks(&self) -> usize;
}

impl<T> BlockPadding for Box<T>
where
    T: BlockPadding,
{
    fn new(block_size: usize) -> Self {
        Box::new(T::new(block_size))
    }

    fn padding(&self, buf: &mut Vec<u8>) {
        (**self).padding(buf)
    }

    fn unpadding(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        (**self).unpadding(buf)
    }

    fn max_padding_blocks(&self) -> usize {
        (**self).max_padding_blocks()
    }
}

/// ISO/IEC 7816-4: 填充`0x80`, 再补充若干个`0x00`以使得填充后的数据字节长度是分组长度的整数倍. <br>
#[derive(Copy, Clone, Debug)]
pub struct DefaultPadding {
    block_size: usize,
}

impl DefaultPadding {
    pub fn from_block_cipher<E: BlockCipher<N>, const N: usize>(_cipher: &E) -> Self {
        Self::new(N)
    }
}

impl BlockPadding for DefaultPadding {
    /// `block_size`为0时按1处理
    fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    fn padding(&self, buf: &mut Vec<u8>) {
        buf.push(0x80);
        let rem = buf.len() % self.block_size;
        if rem != 0 {
            buf.resize(buf.len() + self.block_size - rem, 0);
        }
    }

    fn unpadding(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        match buf.iter().rposition(|&x| x != 0) {
            Some(idx) if buf[idx] == 0x80 && buf.len() - idx <= self.block_size => {
                buf.truncate(idx);
                Ok(())
            }
            _ => Err(CipherError::UnpaddingNotMatch("DefaultPadding".to_string())),
        }
    }

    fn max_padding_blocks(&self) -> usize {
        1
    }
}

/// RFC 5652 6.3: 填充`k`个值为`k`的字节, `1 <= k <= block_size`. <br>
#[derive(Copy, Clone, Debug)]
pub struct Pkcs7Padding {
    block_size: usize,
}

impl Pkcs7Padding {
    pub fn from_block_cipher<E: BlockCipher<N>, const N: usize>(_cipher: &E) -> Self {
        Self::new(N)
    }
}

impl BlockPadding for Pkcs7Padding {
    /// `block_size`需在`[1, 255]`内
    fn new(block_size: usize) -> Self {
        Self {
            block_size: block_size.clamp(1, u8::MAX as usize),
        }
    }

    fn padding(&self, buf: &mut Vec<u8>) {
        let k = self.block_size - (buf.len() % self.block_size);
        buf.resize(buf.len() + k, k as u8);
    }

    fn unpadding(&self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        let k = buf.last().copied().unwrap_or_default() as usize;
        if k == 0 || k > self.block_size || k > buf.len() {
            return Err(CipherError::UnpaddingNotMatch("Pkcs7Padding".to_string()));
        }

        let start = buf.len() - k;
        if buf[start..].iter().any(|&x| x as usize != k) {
            return Err(CipherError::UnpaddingNotMatch("Pkcs7Padding".to_string()));
        }

        buf.truncate(start);
        Ok(())
    }

    fn max_padding_blocks(&self) -> usize {
        1
    }
}

/// 不填充, 输入数据需是分组长度的整数倍
#[derive(Copy, Clone, Debug)]
pub struct EmptyPadding;

impl BlockPadding for EmptyPadding {
    fn new(_block_size: usize) -> Self {
        Self
    }

    fn padding(&self, _buf: &mut Vec<u8>) {}

    fn unpadding(&self, _buf: &mut Vec<u8>) -> Result<(), CipherError> {
        Ok(())
    }

    fn max_padding_blocks(&self) -> usize {
        0
    }
}
