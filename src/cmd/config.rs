use std::path::Path;
use std::sync::OnceLock;

use config::Config;
use jws::SignatureAlgorithm;
use serde::{Deserialize, Serialize};

use super::args::PaddingType;
use crate::JoseError;

static CONFIG: OnceLock<JoseConfig> = OnceLock::new();

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct JoseConfig {
    // `jose sign`未指定`--alg`且JWK中没有`alg`时使用
    pub default_algorithm: SignatureAlgorithm,

    pub default_padding: PaddingType,

    // byte size
    pub io_buf_size: usize,
}

impl Default for JoseConfig {
    fn default() -> Self {
        Self {
            default_algorithm: SignatureAlgorithm::HS256,
            default_padding: PaddingType::Pkcs7,
            io_buf_size: 8 * 1024,
        }
    }
}

impl JoseConfig {
    /// 默认配置 < 配置文件 < `JOSE__`前缀的环境变量(如`JOSE__IO_BUF_SIZE`)
    pub fn load(f: Option<&Path>) -> Result<Self, JoseError> {
        let default_config = Config::try_from(&JoseConfig::default())?;

        let mut config = Config::builder().add_source(default_config);
        if let Some(f) = f {
            config = config.add_source(config::File::from(f).required(false));
        }
        config = config.add_source(
            config::Environment::with_prefix("JOSE")
                .try_parsing(true)
                .separator("__"),
        );

        let mut jconfig: JoseConfig = config.build()?.try_deserialize()?;
        jconfig.io_buf_size = jconfig.io_buf_size.clamp(16, 1 << 24);

        log::trace!("{:?}", jconfig);

        Ok(jconfig)
    }

    /// 只有第一次调用时加载配置
    pub fn init(f: Option<&Path>) -> Result<&'static Self, JoseError> {
        if let Some(c) = CONFIG.get() {
            return Ok(c);
        }

        let c = Self::load(f)?;
        Ok(CONFIG.get_or_init(|| c))
    }

    pub fn config() -> &'static Self {
        CONFIG.get_or_init(|| {
            Self::load(None).unwrap_or_else(|e| {
                log::warn!("{e}, use the default config");
                Self::default()
            })
        })
    }
}
