use std::io::{Cursor, Read, Write};

use cipher::block_cipher::{decrypt_block, encrypt_block};
use cipher::cipher_mode::{
    AesCbc, AesEcb, BlockCipherSession, ChainingMode, DefaultPadding, EmptyPadding, Operation,
    Pkcs7Padding, WriteSink,
};
use cipher::BlockPadding;
use clap::{Args, ValueEnum};

use super::args::{HexBytes, IOArgs, PaddingType};
use super::config::JoseConfig;
use crate::JoseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum AesModeType {
    /// 单个16字节分组
    #[value(name = "block")]
    Block,
    #[value(name = "ecb")]
    Ecb,
    #[value(name = "cbc")]
    Cbc,
}

#[derive(Args)]
#[command(about = "AES cipher(PIPE | STRING | ifile), the key length selects AES-128/192/256")]
pub struct AesArgs {
    #[arg(value_name = "STRING")]
    msg: Option<String>,

    #[command(flatten)]
    io: IOArgs,

    #[arg(short, long, default_value = "cbc")]
    mode: AesModeType,

    #[arg(long, help = "the padding scheme, default to `default_padding` in the config")]
    padding: Option<PaddingType>,

    #[arg(short, long, value_name = "HEX", help = "the key in hex, 16/24/32 bytes")]
    key: HexBytes,

    #[arg(long, value_name = "HEX", help = "the initial vector in hex for the cbc mode")]
    iv: Option<HexBytes>,

    #[arg(short, long, help = "enable decrypt")]
    decrypt: bool,

    #[arg(short = 'x', long = "hex", help = "the input data is hex encoded")]
    hex_input: bool,
}

fn pump<M, P, R, W>(
    mut session: BlockCipherSession<M, P, 16>,
    mut reader: R,
    writer: W,
) -> anyhow::Result<W>
where
    M: ChainingMode<16>,
    P: BlockPadding,
    R: Read,
    W: Write,
{
    let mut sink = WriteSink::new(writer);
    let mut buf = vec![0u8; JoseConfig::config().io_buf_size];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        session.update(&buf[..n], &mut sink)?;
    }
    session.do_final(&[], &mut sink)?;

    log::debug!("{} bytes output", sink.written());
    Ok(sink.into_inner())
}

impl AesArgs {
    fn operation(&self) -> Operation {
        if self.decrypt {
            Operation::Decrypt
        } else {
            Operation::Encrypt
        }
    }

    fn padding(&self) -> PaddingType {
        self.padding
            .unwrap_or(JoseConfig::config().default_padding)
    }

    fn run_with<P, R, W>(&self, reader: R, writer: W) -> anyhow::Result<W>
    where
        P: BlockPadding,
        R: Read,
        W: Write,
    {
        let op = self.operation();
        match self.mode {
            AesModeType::Ecb => pump(AesEcb::<P>::aes_ecb(op, &self.key)?, reader, writer),
            AesModeType::Cbc => {
                let iv = self
                    .iv
                    .as_deref()
                    .ok_or_else(|| JoseError::MissingIv("cbc".to_string()))?;
                pump(AesCbc::<P>::aes_cbc(op, &self.key, iv)?, reader, writer)
            }
            AesModeType::Block => anyhow::bail!("the block mode has no session"),
        }
    }

    fn run<R: Read, W: Write>(&self, reader: R, writer: W) -> anyhow::Result<W> {
        match self.padding() {
            PaddingType::Pkcs7 => self.run_with::<Pkcs7Padding, R, W>(reader, writer),
            PaddingType::Iso => self.run_with::<DefaultPadding, R, W>(reader, writer),
            PaddingType::None => self.run_with::<EmptyPadding, R, W>(reader, writer),
        }
    }

    fn block(&self, data: &[u8]) -> anyhow::Result<[u8; 16]> {
        anyhow::ensure!(data.len() == 16, JoseError::InvalidBlockData(data.len()));
        Ok(if self.decrypt {
            decrypt_block(&self.key, data)?
        } else {
            encrypt_block(&self.key, data)?
        })
    }

    pub fn exe(self, pipe: Option<&[u8]>) -> anyhow::Result<()> {
        let mut reader = self.io.reader(self.msg.as_deref(), pipe)?;
        if self.hex_input {
            let mut s = String::new();
            reader.read_to_string(&mut s)?;
            let data = hex::decode(s.trim()).map_err(|_| JoseError::InvalidHex(s.clone()))?;
            reader = Box::new(Cursor::new(data));
        }

        if self.mode == AesModeType::Block {
            let mut data = Vec::with_capacity(16);
            reader.read_to_end(&mut data)?;
            let out = self.block(&data)?;
            return self.io.write_all(&out);
        }

        match self.io.writer()? {
            Some(w) => {
                let mut w = self.run(reader, w)?;
                w.flush()?;
            }
            None => {
                let out = self.run(reader, Vec::new())?;
                println!("{}", hex::encode(out));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AesArgs, AesModeType};
    use crate::cmd::args::{IOArgs, PaddingType};

    fn args(mode: AesModeType, padding: PaddingType, decrypt: bool) -> AesArgs {
        AesArgs {
            msg: None,
            io: IOArgs::default(),
            mode,
            padding: Some(padding),
            key: "2b7e151628aed2a6abf7158809cf4f3c".parse().unwrap(),
            iv: Some("000102030405060708090a0b0c0d0e0f".parse().unwrap()),
            decrypt,
            hex_input: false,
        }
    }

    #[test]
    fn cbc_vector() {
        // NIST SP 800-38A F.2.1, 前两个分组
        let pt = hex::decode("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
            .unwrap();
        let ct = "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2";

        let enc = args(AesModeType::Cbc, PaddingType::None, false);
        let out = enc.run(pt.as_slice(), Vec::new()).unwrap();
        assert_eq!(hex::encode(&out), ct);

        let dec = args(AesModeType::Cbc, PaddingType::None, true);
        assert_eq!(dec.run(out.as_slice(), Vec::new()).unwrap(), pt);
    }

    #[test]
    fn padded_round_trip() {
        let msg = b"the quick brown fox jumps over the lazy dog";
        let cases = [
            (AesModeType::Ecb, PaddingType::Pkcs7),
            (AesModeType::Ecb, PaddingType::Iso),
            (AesModeType::Cbc, PaddingType::Pkcs7),
            (AesModeType::Cbc, PaddingType::Iso),
        ];

        for (i, (mode, padding)) in cases.into_iter().enumerate() {
            let ct = args(mode, padding, false)
                .run(msg.as_slice(), Vec::new())
                .unwrap();
            assert_eq!(ct.len(), 48, "case {i} failed");
            let pt = args(mode, padding, true)
                .run(ct.as_slice(), Vec::new())
                .unwrap();
            assert_eq!(pt, msg, "case {i} failed");
        }

        assert!(args(AesModeType::Cbc, PaddingType::None, false)
            .run(msg.as_slice(), Vec::new())
            .is_err());
    }

    #[test]
    fn single_block() {
        // FIPS 197 Appendix B
        let a = args(AesModeType::Block, PaddingType::None, false);
        let pt = hex::decode("3243f6a8885a308d313198a2e0370734").unwrap();
        let ct = a.block(&pt).unwrap();
        assert_eq!(hex::encode(ct), "3925841d02dc09fbdc118597196a0b32");

        let a = args(AesModeType::Block, PaddingType::None, true);
        assert_eq!(a.block(&ct).unwrap().to_vec(), pt);
        assert!(a.block(&pt[..15]).is_err());
    }

    #[test]
    fn missing_iv() {
        let mut a = args(AesModeType::Cbc, PaddingType::Pkcs7, false);
        a.iv = None;
        assert!(a.run(b"abc".as_slice(), Vec::new()).is_err());
    }
}
