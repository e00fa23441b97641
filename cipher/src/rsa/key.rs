//! RSA公私钥及RSASP1/RSAVP1原语, RFC 8017 Section 3 / 5.2
use crate::utils::BigUintExt;
use crate::CipherError;
use num_bigint::{BigInt, BigUint};
use num_traits::{Euclid, One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    // n = r_1 * r_2 * ... * r_u
    n: BigUint,
    // public exponent
    e: BigUint,
}

/// 第3个及之后的素因子`r_i`的CRT三元组
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPrime {
    pub r: BigUint,
    /// `e * d_i = 1 mod (r_i - 1)`
    pub d: BigUint,
    /// `R_i * t_i = 1 mod r_i`, `R_i = r_1 * r_2 * ... * r_{i-1}`
    pub t: BigUint,
}

/// RSA私钥的两种表示(RFC 8017 3.2)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateKey {
    /// `(n, d)`
    Pair { n: BigUint, d: BigUint },
    /// `(p, q, dP, dQ, qInv)`以及`(r_i, d_i, t_i), i = 3...u`
    MultiPrime {
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
        others: Vec<OtherPrime>,
    },
}

/// 字节长度`k`, `2^{8(k-1)} <= n < 2^{8k}`
fn byte_len(n: &BigUint) -> usize {
    (n.bits() as usize + 7) >> 3
}

impl PublicKey {
    /// note: not to check the `n` and `e` are right RSA parameters
    pub fn new_uncheck(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }

    /// note: not to check the `n` and `e` are right RSA parameters
    pub fn from_be_bytes(n: &[u8], e: &[u8]) -> Self {
        Self {
            n: BigUint::from_bytes_be(n),
            e: BigUint::from_bytes_be(e),
        }
    }

    /// n
    pub fn modulus(&self) -> &BigUint {
        &self.n
    }

    /// e
    pub fn exponent(&self) -> &BigUint {
        &self.e
    }

    pub fn key_bits(&self) -> usize {
        self.n.bits() as usize
    }

    /// 模数的字节长度`k`
    pub fn key_len(&self) -> usize {
        byte_len(&self.n)
    }

    /// RSAVP1: `m = s^e mod n`, `0 <= s < n`
    pub fn rsavp1(&self, s: &BigUint) -> Result<BigUint, CipherError> {
        if s < &self.n {
            Ok(s.modpow(&self.e, &self.n))
        } else {
            Err(CipherError::OutOfRange(
                "signature representative out of range".to_string(),
            ))
        }
    }

    pub fn is_valid(&self) -> Result<(), CipherError> {
        if self.n.is_zero() || !self.n.bit(0) {
            Err(CipherError::InvalidKey(format!(
                "rsa: modulus {:#x} must be a positive odd integer",
                self.n
            )))
        } else if self.e < BigUint::from(3u8) || !self.e.bit(0) {
            Err(CipherError::InvalidKey(format!(
                "rsa: public exponent {:#x} must be an odd integer great than 2",
                self.e
            )))
        } else if self.e >= self.n {
            Err(CipherError::InvalidKey(
                "rsa: public exponent must be less than modulus".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{n={:#x}, e={:#x}}}", self.n, self.e)
    }
}

impl PrivateKey {
    pub fn new_pair(n: BigUint, d: BigUint) -> Self {
        Self::Pair { n, d }
    }

    /// 由私钥指数`d`和素因子`p, q, r_3, ...`计算CRT参数
    pub fn from_primes(
        d: &BigUint,
        p: BigUint,
        q: BigUint,
        others: &[BigUint],
    ) -> Result<Self, CipherError> {
        let one = BigUint::one();
        for prime in [&p, &q].into_iter().chain(others.iter()) {
            if prime <= &one {
                return Err(CipherError::InvalidKey(
                    "rsa: invalid prime value".to_string(),
                ));
            }
        }

        let qinv = BigUintExt(&q)
            .modinv(&p)
            .ok_or_else(|| CipherError::InvalidKey("rsa: q is not invertible mod p".to_string()))?;
        let (dp, dq) = (d % (&p - &one), d % (&q - &one));

        let mut rm = &p * &q;
        let mut crt = Vec::with_capacity(others.len());
        for r in others {
            let t = BigUintExt(&rm).modinv(r).ok_or_else(|| {
                CipherError::InvalidKey(format!("rsa: prime {r:#x} is not coprime to the others"))
            })?;
            crt.push(OtherPrime {
                r: r.clone(),
                d: d % (r - &one),
                t,
            });
            rm *= r;
        }

        Ok(Self::MultiPrime {
            p,
            q,
            dp,
            dq,
            qinv,
            others: crt,
        })
    }

    /// `n`, 多素数形式下为所有素因子的乘积
    pub fn modulus(&self) -> BigUint {
        match self {
            Self::Pair { n, .. } => n.clone(),
            Self::MultiPrime { p, q, others, .. } => {
                others.iter().fold(p * q, |acc, x| acc * &x.r)
            }
        }
    }

    pub fn key_len(&self) -> usize {
        byte_len(&self.modulus())
    }

    /// RSASP1: `s = m^d mod n`, `0 <= m < n` <br>
    ///
    /// 多素数形式使用Garner算法:
    /// - `s_1 = m^{dP} mod p`, `s_2 = m^{dQ} mod q`, `s_i = m^{d_i} mod r_i`;
    /// - `h = (s_1 - s_2) * qInv mod p`, `s = s_2 + q * h`;
    /// - `R = p * q`, 对`i = 3...u`: `h = (s_i - s) * t_i mod r_i`, `s = s + R * h`, `R = R * r_i`;
    pub fn rsasp1(&self, m: &BigUint) -> Result<BigUint, CipherError> {
        let n = self.modulus();
        if m >= &n {
            return Err(CipherError::OutOfRange(
                "message representative out of range".to_string(),
            ));
        }

        match self {
            Self::Pair { n, d } => Ok(m.modpow(d, n)),
            Self::MultiPrime {
                p,
                q,
                dp,
                dq,
                qinv,
                others,
            } => {
                let (s1, s2) = (m.modpow(dp, p), m.modpow(dq, q));
                let (p, q) = (BigInt::from(p.clone()), BigInt::from(q.clone()));

                let mut h = BigInt::from(s1) - BigInt::from(s2.clone());
                h *= BigInt::from(qinv.clone());
                let mut s = BigInt::from(s2) + &q * h.rem_euclid(&p);

                let mut rm = &p * &q;
                for other in others {
                    let si = BigInt::from(m.modpow(&other.d, &other.r));
                    let ri = BigInt::from(other.r.clone());
                    let mut h = si - &s;
                    h *= BigInt::from(other.t.clone());
                    s += &rm * h.rem_euclid(&ri);
                    rm *= ri;
                }

                s.to_biguint().ok_or_else(|| {
                    CipherError::Other("rsa: negative signature representative".to_string())
                })
            }
        }
    }

    /// 校验私钥和公钥`pk`是否匹配: 模数一致, 各素因子上的CRT指数和系数正确.
    pub fn is_valid(&self, pk: &PublicKey) -> Result<(), CipherError> {
        let one = BigUint::one();
        let invalid = |s: &str| Err(CipherError::InvalidKey(format!("rsa: {s}")));

        if self.modulus() != *pk.modulus() {
            return invalid("private key modulus not match to public key");
        }

        match self {
            Self::Pair { n, d } => {
                if d.is_zero() || d >= n {
                    return invalid("private exponent out of range");
                }
            }
            Self::MultiPrime {
                p,
                q,
                dp,
                dq,
                qinv,
                others,
            } => {
                let e = pk.exponent();
                let mut primes = vec![(p, dp), (q, dq)];
                primes.extend(others.iter().map(|x| (&x.r, &x.d)));
                for (prime, di) in primes {
                    if prime <= &one {
                        return invalid("invalid prime value");
                    }
                    if (e * di) % (prime - &one) != one {
                        return invalid("invalid CRT exponent");
                    }
                }

                if (q * qinv) % p != one {
                    return invalid("invalid CRT coefficient");
                }

                let mut rm = p * q;
                for other in others {
                    if (&rm * &other.t) % &other.r != one {
                        return invalid("invalid CRT coefficient");
                    }
                    rm *= &other.r;
                }
            }
        }

        Ok(())
    }
}
