use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::ops::Deref;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
#[cfg(feature = "sec-zeroize")]
use zeroize::Zeroize;

use super::config::JoseConfig;
use crate::JoseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingType {
    #[value(name = "pkcs7")]
    Pkcs7,
    /// ISO/IEC 7816-4
    #[value(name = "iso")]
    Iso,
    #[value(name = "none")]
    None,
}

/// 十六进制字符串表示的密钥或初始向量
#[derive(Clone)]
pub struct HexBytes {
    bytes: Vec<u8>,
}

impl FromStr for HexBytes {
    type Err = JoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(s)
            .map(|bytes| Self { bytes })
            .map_err(|_| JoseError::InvalidHex(s.to_string()))
    }
}

impl Deref for HexBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.bytes.as_slice()
    }
}

impl std::fmt::Debug for HexBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HexBytes({} bytes)", self.bytes.len())
    }
}

#[cfg(feature = "sec-zeroize")]
impl Drop for HexBytes {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Args, Clone, Default)]
pub struct IOArgs {
    #[arg(short, long = "ifile", value_name = "FILE")]
    #[arg(help = "the input file path")]
    pub ifile: Option<PathBuf>,

    #[arg(short, long = "ofile", value_name = "FILE")]
    #[arg(help = "the output file path, output to stdout as hex string if not specified")]
    pub ofile: Option<PathBuf>,
}

impl IOArgs {
    /// `<PIPE | STRING | ifile>`只能有一个
    pub fn reader(
        &self,
        msg: Option<&str>,
        pipe: Option<&[u8]>,
    ) -> anyhow::Result<Box<dyn Read + '_>> {
        let datasource =
            pipe.is_some() as u8 + self.ifile.is_some() as u8 + msg.is_some() as u8;
        match datasource {
            0 => Err(JoseError::NoDataSource.into()),
            1 => {
                if let Some(f) = self.ifile.as_deref() {
                    let f = File::open(f)
                        .map_err(|e| anyhow::anyhow!("open `{}` failed, {e}", f.display()))?;
                    Ok(Box::new(BufReader::with_capacity(
                        JoseConfig::config().io_buf_size,
                        f,
                    )))
                } else if let Some(m) = msg {
                    Ok(Box::new(Cursor::new(m.to_string().into_bytes())))
                } else {
                    Ok(Box::new(Cursor::new(pipe.unwrap_or_default().to_vec())))
                }
            }
            _ => Err(JoseError::MultipleDataSource.into()),
        }
    }

    pub fn read_all(&self, msg: Option<&str>, pipe: Option<&[u8]>) -> anyhow::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(JoseConfig::config().io_buf_size);
        self.reader(msg, pipe)?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// 指定了输出文件时写入原始字节, 否则返回`None`
    pub fn writer(&self) -> anyhow::Result<Option<BufWriter<File>>> {
        match self.ofile.as_deref() {
            Some(f) => {
                let file = File::create(f)
                    .map_err(|e| anyhow::anyhow!("create `{}` failed, {e}", f.display()))?;
                Ok(Some(BufWriter::with_capacity(
                    JoseConfig::config().io_buf_size,
                    file,
                )))
            }
            None => Ok(None),
        }
    }

    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self.writer()? {
            Some(mut w) => {
                w.write_all(data)?;
                w.flush()?;
            }
            None => println!("{}", hex::encode(data)),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HexBytes, IOArgs};
    use std::io::Read;

    #[test]
    fn hex_bytes() {
        let cases = [
            ("000102", Some(vec![0u8, 1, 2])),
            ("0xff", Some(vec![0xff])),
            (" 2b7E ", Some(vec![0x2b, 0x7e])),
            ("", Some(vec![])),
            ("abc", None),
            ("zz", None),
        ];

        for (i, (s, tgt)) in cases.into_iter().enumerate() {
            let h = s.parse::<HexBytes>().ok().map(|h| h.to_vec());
            assert_eq!(h, tgt, "case {i} failed");
        }
    }

    #[test]
    fn one_data_source() {
        let io = IOArgs::default();
        let mut buf = Vec::new();
        io.reader(Some("abc"), None)
            .unwrap()
            .read_to_end(&mut buf)
            .unwrap();
        assert_eq!(buf, b"abc");

        assert_eq!(io.read_all(None, Some(b"xyz")).unwrap(), b"xyz");
        assert!(io.reader(None, None).is_err());
        assert!(io.reader(Some("abc"), Some(b"xyz")).is_err());

        let f = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(f.path(), b"file data").unwrap();
        let io = IOArgs {
            ifile: Some(f.path().to_path_buf()),
            ofile: None,
        };
        assert_eq!(io.read_all(None, None).unwrap(), b"file data");
        assert!(io.reader(Some("abc"), None).is_err());
    }
}
