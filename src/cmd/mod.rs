use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod config;
pub use config::JoseConfig;

mod aes;
pub use aes::AesArgs;

mod der;
pub use der::DerArgs;

mod jwt;
pub use jwt::{PublicArgs, SignArgs, ThumbprintArgs, VerifyArgs};

#[derive(Parser)]
#[command(name = "jose", version = env!("JOSE_VERSION_INFO"))]
#[command(about = "JOSE signing and AES cipher toolkit")]
pub struct JoseArgs {
    #[arg(short, long, global = true, help = "read the input data from stdin")]
    pub pipe: bool,

    #[arg(long, global = true, value_name = "FILE")]
    #[arg(help = "the config file(json/json5)")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    c: Option<JoseSubArgs>,
}

#[derive(Subcommand)]
pub enum JoseSubArgs {
    Aes(AesArgs),
    Der(DerArgs),
    Sign(SignArgs),
    Verify(VerifyArgs),
    Thumbprint(ThumbprintArgs),
    Public(PublicArgs),
    /// show the version and git info
    Info,
}

impl JoseArgs {
    /// 返回`false`表示验证未通过
    pub fn exe(self, pipe: Option<&[u8]>) -> anyhow::Result<bool> {
        JoseConfig::init(self.config.as_deref())?;

        match self.c {
            Some(c) => c.exe(pipe),
            None => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("JOSE_VERSION_INFO"));
                Ok(true)
            }
        }
    }
}

impl JoseSubArgs {
    pub fn exe(self, pipe: Option<&[u8]>) -> anyhow::Result<bool> {
        match self {
            JoseSubArgs::Aes(a) => a.exe(pipe)?,
            JoseSubArgs::Der(a) => a.exe()?,
            JoseSubArgs::Sign(a) => a.exe()?,
            JoseSubArgs::Verify(a) => return a.exe(),
            JoseSubArgs::Thumbprint(a) => a.exe()?,
            JoseSubArgs::Public(a) => a.exe()?,
            JoseSubArgs::Info => {
                println!("version: {}", env!("JOSE_VERSION_INFO"));
                println!("git: {}", env!("JOSE_GIT_INFO"));
                println!("config: {:?}", JoseConfig::config());
            }
        }

        Ok(true)
    }
}
