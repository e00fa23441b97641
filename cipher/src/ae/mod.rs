//! # Authenticated Encryption (AE)
//!
//! 认证加密: Authentication + Confidentiality. <br>
//! 目前只有GCM的组成部件(`GHASH`, `GCTR`, `J0`等), 没有完整的认证加密接口.
//!

pub mod gcm;
pub use gcm::{block_mul, ghash, inc32, Gcm};
