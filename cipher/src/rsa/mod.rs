//! RSA
//!
//! - 随机选择两个质数$p$和$q$($p\neq q$), 则模数$n=p*q$. 模数的字节长度$k$满足: $2^{((k-1)*8}\le n \lt 2^{k*8}$;
//! - 在$[1,n]$之中, 随机选择一个整数$e$作为公钥的指数部分. 其中, $e$满足和$p-1$及$q-1$都是互质关系(公共因子是1);
//! - 那么私钥的指数部分$d$满足: $d*e-1$能被$q-1$和$p-1$整除;
//!
//! 签名: $s = m^d \mod n$;
//!
//! 验证: $m = s^e \mod n$;
//!
//! 多素数私钥($n = r_1 r_2 \cdots r_u$)使用CRT和Garner算法计算$m^d$. <br>
//! 这里只实现RSASSA-PKCS1-v1_5签名方案, 不生成密钥.
//!

mod key;
pub use key::{OtherPrime, PrivateKey, PublicKey};

pub mod primitives;
pub use primitives::{emsa_pkcs1_v15_encode, emsa_pkcs1_v15_encode_digest, i2osp, os2ip};

mod pkcs1;
pub use pkcs1::{Pkcs1v15Sign, Pkcs1v15Verify};
