//! DER(X.690) 长度编码和TLV读写
//!
//! - 短格式: `len < 128`, 一个字节;
//! - 长格式: 首字节`0x80 | count`, 后跟`count`个大端序字节(最小表示);
//!

use crate::CipherError;

/// ASN.1 universal tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Asn1Tag {
    Integer = 0x02,
    OctetString = 0x04,
    Null = 0x05,
    ObjectIdentifier = 0x06,
    Sequence = 0x30,
}

/// 长度字段的解码结果: 内容长度和长度字段本身占用的字节数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerLength {
    pub value: usize,
    pub size: usize,
}

pub fn encode_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        return vec![len as u8];
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let mut out = Vec::with_capacity(1 + bytes.len() - skip);
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
    out
}

impl DerLength {
    /// `bytes`从长度字段的首字节开始
    pub fn decode(bytes: &[u8]) -> Result<Self, CipherError> {
        let first = *bytes
            .first()
            .ok_or_else(|| CipherError::InvalidDer("missing length octet".to_string()))?;

        if first < 0x80 {
            return Ok(Self {
                value: first as usize,
                size: 1,
            });
        }

        let count = (first & 0x7f) as usize;
        if count == 0 {
            return Err(CipherError::InvalidDer(
                "indefinite length is not allowed".to_string(),
            ));
        } else if count > std::mem::size_of::<usize>() {
            return Err(CipherError::InvalidDer(format!(
                "length with `{count}` octets is too large"
            )));
        }

        let octets = bytes.get(1..=count).ok_or_else(|| {
            CipherError::InvalidDer(format!(
                "truncated length, need `{count}` octets but got `{}`",
                bytes.len() - 1
            ))
        })?;

        if octets[0] == 0 {
            return Err(CipherError::InvalidDer(
                "long form length with leading zero octet".to_string(),
            ));
        }

        let value = octets.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
        if value < 0x80 {
            return Err(CipherError::InvalidDer(format!(
                "length `{value}` must use the short form"
            )));
        }

        Ok(Self {
            value,
            size: 1 + count,
        })
    }
}

/// `tag || length || content`
pub fn encode_tlv(tag: Asn1Tag, content: &[u8]) -> Vec<u8> {
    let len = encode_length(content.len());
    let mut out = Vec::with_capacity(1 + len.len() + content.len());
    out.push(tag as u8);
    out.extend(len);
    out.extend_from_slice(content);
    out
}

/// 顺序读取DER元素
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// 已读取的字节数
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// 读取一个`tag`类型的元素, 返回其内容
    pub fn read(&mut self, tag: Asn1Tag) -> Result<&'a [u8], CipherError> {
        let rest = &self.data[self.pos..];
        match rest.first() {
            Some(&t) if t == tag as u8 => {}
            Some(&t) => {
                return Err(CipherError::InvalidDer(format!(
                    "expected tag `{:#04x}` but got `{t:#04x}`",
                    tag as u8
                )))
            }
            None => {
                return Err(CipherError::InvalidDer(format!(
                    "expected tag `{:#04x}` but reached the end",
                    tag as u8
                )))
            }
        }

        let len = DerLength::decode(&rest[1..])?;
        let start = 1 + len.size;
        let content = start
            .checked_add(len.value)
            .and_then(|end| rest.get(start..end))
            .ok_or_else(|| {
                CipherError::InvalidDer(format!(
                    "truncated content, need `{}` bytes but got `{}`",
                    len.value,
                    rest.len() - start
                ))
            })?;

        self.pos += start + len.value;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_length, encode_tlv, Asn1Tag, DerLength, DerReader};
    use crate::CipherError;

    #[test]
    fn length_encoding() {
        let cases: [(usize, &[u8]); 7] = [
            (0, &[0x00]),
            (0x7f, &[0x7f]),
            (0x80, &[0x81, 0x80]),
            (0xff, &[0x81, 0xff]),
            (0x100, &[0x82, 0x01, 0x00]),
            (0xffff, &[0x82, 0xff, 0xff]),
            (0x0123_4567, &[0x84, 0x01, 0x23, 0x45, 0x67]),
        ];

        for (i, (len, der)) in cases.into_iter().enumerate() {
            assert_eq!(encode_length(len), der, "case {i} encode failed");
            assert_eq!(
                DerLength::decode(der),
                Ok(DerLength {
                    value: len,
                    size: der.len()
                }),
                "case {i} decode failed"
            );
        }
    }

    #[test]
    fn invalid_length() {
        let cases: [&[u8]; 7] = [
            &[],
            &[0x80],
            &[0x82, 0x01],
            &[0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9],
            // 非最小编码
            &[0x81, 0x05],
            &[0x81, 0x7f],
            &[0x82, 0x00, 0x80],
        ];
        for bad in cases {
            assert!(
                matches!(DerLength::decode(bad), Err(CipherError::InvalidDer(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn reader() {
        let mut buf = encode_tlv(Asn1Tag::Null, &[]);
        buf.extend(encode_tlv(Asn1Tag::OctetString, &[0xaa; 200]));

        let mut r = DerReader::new(&buf);
        assert_eq!(r.peek_tag(), Some(0x05));
        assert_eq!(r.read(Asn1Tag::Null), Ok(&[][..]));
        assert_eq!(r.position(), 2);
        assert!(r.read(Asn1Tag::Sequence).is_err());
        assert_eq!(r.read(Asn1Tag::OctetString).map(|x| x.len()), Ok(200));
        assert!(r.is_empty());
        assert!(r.read(Asn1Tag::Null).is_err());

        let truncated = [0x04, 0x05, 0x01, 0x02];
        assert!(DerReader::new(&truncated).read(Asn1Tag::OctetString).is_err());
    }
}
