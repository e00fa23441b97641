mod bigint_ext;
pub use bigint_ext::{BigIntExt, BigUintExt};
