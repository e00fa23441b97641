use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{Euclid, One, Signed};
use std::borrow::Borrow;
use std::ops::Deref;

pub struct BigIntExt<T: Borrow<BigInt>>(pub T);

impl<T: Borrow<BigInt>> Deref for BigIntExt<T> {
    type Target = BigInt;
    fn deref(&self) -> &Self::Target {
        self.0.borrow()
    }
}

impl<T: Borrow<BigInt>> BigIntExt<T> {
    /// `self * inv = 1 mod |modulus|`, 由扩展欧几里得算法求得: `gcd(a, n) = ax + ny`, 当`gcd = 1`时`x`即为逆元.
    pub fn modinv(&self, modulus: &BigInt) -> Option<BigInt> {
        let n = modulus.abs();
        let a = self.rem_euclid(&n);
        let g = a.extended_gcd(&n);
        g.gcd.is_one().then_some(g.x.rem_euclid(&n))
    }
}

pub struct BigUintExt<T: Borrow<BigUint>>(pub T);

impl<T: Borrow<BigUint>> BigUintExt<T> {
    /// `self * inv = 1 mod modulus`
    pub fn modinv(&self, modulus: &BigUint) -> Option<BigUint> {
        BigIntExt(BigInt::from(self.0.borrow().clone()))
            .modinv(&BigInt::from(modulus.clone()))
            .and_then(|x| x.to_biguint())
    }
}
