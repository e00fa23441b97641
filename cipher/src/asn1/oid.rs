use std::fmt::Display;
use std::str::FromStr;

use crate::asn1::der::{encode_tlv, Asn1Tag, DerReader};
use crate::CipherError;

/// OBJECT IDENTIFIER, 如`2.16.840.1.101.3.4.2.1` <br>
///
/// DER内容: 前两个分量合并为`40 * v0 + v1`, 之后每个分量按base-128编码, 除最后一个字节外最高位置1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier(pub(crate) Vec<u64>);

impl ObjectIdentifier {
    pub fn new(components: &[u64]) -> Result<Self, CipherError> {
        Self::check(components)?;
        Ok(Self(components.to_vec()))
    }

    pub fn components(&self) -> &[u64] {
        self.0.as_slice()
    }

    fn check(v: &[u64]) -> Result<(), CipherError> {
        match v {
            [v0, v1, ..] if *v0 > 2 => Err(CipherError::InvalidDer(format!(
                "the first OID component `{v0}` great than 2, second `{v1}`"
            ))),
            [v0, v1, ..] if *v0 < 2 && *v1 >= 40 => Err(CipherError::InvalidDer(format!(
                "the second OID component `{v1}` must be less than 40 when first is `{v0}`"
            ))),
            [_, v1, ..] if *v1 > u64::MAX - 80 => Err(CipherError::InvalidDer(format!(
                "the second OID component `{v1}` is too large"
            ))),
            [_, _, ..] => Ok(()),
            _ => Err(CipherError::InvalidDer(
                "OID needs at least two components".to_string(),
            )),
        }
    }

    fn push_base128(out: &mut Vec<u8>, mut x: u64) {
        let mut tmp = [0u8; 10];
        let mut i = tmp.len();
        loop {
            i -= 1;
            tmp[i] = (x & 0x7f) as u8;
            x >>= 7;
            if x == 0 {
                break;
            }
        }

        let last = tmp.len() - 1;
        out.extend(
            tmp[i..]
                .iter()
                .enumerate()
                .map(|(j, &b)| if i + j < last { b | 0x80 } else { b }),
        );
    }

    /// 只编码内容部分, 不含tag和长度
    pub fn encode_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 4);
        Self::push_base128(&mut out, 40 * self.0[0] + self.0[1]);
        for &x in self.0.iter().skip(2) {
            Self::push_base128(&mut out, x);
        }
        out
    }

    /// `0x06 || length || content`
    pub fn encode(&self) -> Vec<u8> {
        encode_tlv(Asn1Tag::ObjectIdentifier, self.encode_content().as_slice())
    }

    pub fn decode_content(content: &[u8]) -> Result<Self, CipherError> {
        if content.last().map_or(true, |&b| b & 0x80 != 0) {
            return Err(CipherError::InvalidDer(
                "empty or unterminated OID content".to_string(),
            ));
        }

        let mut arcs = Vec::with_capacity(content.len() + 1);
        let mut x = 0u64;
        for (i, &b) in content.iter().enumerate() {
            let arc_start = i == 0 || content[i - 1] & 0x80 == 0;
            if arc_start && b == 0x80 {
                return Err(CipherError::InvalidDer(
                    "OID component with leading 0x80 octet".to_string(),
                ));
            }
            if x > (u64::MAX >> 7) {
                return Err(CipherError::InvalidDer(
                    "OID component overflows u64".to_string(),
                ));
            }
            x = (x << 7) | (b & 0x7f) as u64;
            if b & 0x80 == 0 {
                arcs.push(x);
                x = 0;
            }
        }

        let first = arcs[0];
        let (v0, v1) = match first {
            0..=39 => (0, first),
            40..=79 => (1, first - 40),
            _ => (2, first - 80),
        };

        let mut components = Vec::with_capacity(arcs.len() + 1);
        components.push(v0);
        components.push(v1);
        components.extend_from_slice(&arcs[1..]);
        Ok(Self(components))
    }

    /// 从`bytes`起始处解码一个OID, 返回OID和消耗的字节数
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), CipherError> {
        let mut reader = DerReader::new(bytes);
        let content = reader.read(Asn1Tag::ObjectIdentifier)?;
        Ok((Self::decode_content(content)?, reader.position()))
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_fmt(format_args!("{x}"))?;
        }
        Ok(())
    }
}

impl FromStr for ObjectIdentifier {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(|x| {
                x.parse::<u64>()
                    .map_err(|e| CipherError::InvalidDer(format!("invalid OID `{s}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&components)
    }
}
