use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoseError {
    #[error("invalid hex string `{0}`")]
    InvalidHex(String),

    #[error("only input the one input data source of <PIPE | STRING | ifile>")]
    MultipleDataSource,

    #[error("no input data, specify one of <PIPE | STRING | ifile>")]
    NoDataSource,

    #[error("the {0} mode need the initial vector `--iv`")]
    MissingIv(String),

    #[error("the block mode need exactly 16 bytes data, but got `{0}` bytes")]
    InvalidBlockData(usize),

    #[error("claims must be a JSON object: {0}")]
    InvalidClaims(String),

    #[error("the token expired at `{0}`")]
    Expired(i64),

    #[error("the token is not valid before `{0}`")]
    NotYetValid(i64),

    #[error("time claim overflows: {0}")]
    TimeOverflow(String),

    #[error("load config failed: {0}")]
    Config(#[from] config::ConfigError),
}
