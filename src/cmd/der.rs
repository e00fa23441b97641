use cipher::asn1::{AlgorithmIdentifier, DigestInfo};
use clap::Args;

use super::args::HexBytes;

#[derive(Args)]
#[command(about = "DER encoding of the digest AlgorithmIdentifier used by EMSA-PKCS1-v1_5")]
pub struct DerArgs {
    #[arg(value_name = "ALG", required_unless_present = "decode")]
    #[arg(help = "md2, md5, sha1, sha224, sha256, sha384, sha512, sha512/224, sha512/256")]
    alg: Option<AlgorithmIdentifier>,

    #[arg(long, value_name = "STRING", requires = "alg")]
    #[arg(help = "output the DER encoded DigestInfo of the STRING digest")]
    digest: Option<String>,

    #[arg(long, value_name = "HEX", conflicts_with = "alg")]
    #[arg(help = "decode the DER encoded AlgorithmIdentifier or DigestInfo")]
    decode: Option<HexBytes>,
}

impl DerArgs {
    fn encode(alg: AlgorithmIdentifier, msg: Option<&str>) -> String {
        match msg {
            Some(m) => {
                let info = DigestInfo::new(alg, alg.digest(m.as_bytes()));
                hex::encode(info.encode())
            }
            None => format!("{} {}", hex::encode(alg.encode()), alg.oid()),
        }
    }

    fn decode(der: &[u8]) -> anyhow::Result<String> {
        if let Ok((info, size)) = DigestInfo::decode(der) {
            anyhow::ensure!(size == der.len(), "trailing `{}` bytes", der.len() - size);
            return Ok(format!(
                "{} {}",
                info.algorithm,
                hex::encode(info.digest.as_slice())
            ));
        }

        let (alg, size) = AlgorithmIdentifier::decode(der)?;
        anyhow::ensure!(size == der.len(), "trailing `{}` bytes", der.len() - size);
        Ok(format!("{} {}", alg, alg.oid()))
    }

    pub fn exe(self) -> anyhow::Result<()> {
        let out = match (self.alg, self.decode.as_deref()) {
            (_, Some(der)) => Self::decode(der)?,
            (Some(alg), None) => Self::encode(alg, self.digest.as_deref()),
            (None, None) => anyhow::bail!("need the <ALG> or `--decode`"),
        };

        println!("{out}");
        Ok(())
    }
}
