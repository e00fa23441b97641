//! GF(2^8) arithmetic used by MixColumns.
//!
//! 元素是系数在GF(2)上的多项式, 模不可约多项式$m(x) = x^8 + x^4 + x^3 + x + 1$(0x11b).<br>
//! 加法是按位异或, 乘法是多项式乘法后模$m(x)$.<br>

/// `x^8 = x^4 + x^3 + x + 1 mod m(x)`
const REDUCTION: u8 = 0x1b;

/// 有限域加法
#[inline]
pub const fn plus_gf256(a: u8, b: u8) -> u8 {
    a ^ b
}

/// 有限域乘法: peasant multiplication, 每轮根据`b`的最低位累加`a`, 然后`a = xtime(a)`, `b >>= 1`.
pub const fn multiply_gf256(a: u8, b: u8) -> u8 {
    let (mut a, mut b, mut p) = (a, b, 0u8);
    let mut i = 0;
    while i < 8 {
        if b & 1 != 0 {
            p ^= a;
        }

        let carry = a & 0x80;
        a <<= 1;
        if carry != 0 {
            a ^= REDUCTION;
        }

        b >>= 1;
        i += 1;
    }

    p
}

#[cfg(test)]
mod tests {
    use super::{multiply_gf256, plus_gf256};

    #[test]
    fn fips197_multiplication() {
        // FIPS 197 4.2: {57} * {83} = {c1}, {57} * {13} = {fe}
        let cases = [
            (0x57, 0x83, 0xc1),
            (0x57, 0x13, 0xfe),
            (0x57, 0x02, 0xae),
            (0x57, 0x04, 0x47),
            (0x57, 0x08, 0x8e),
            (0x57, 0x10, 0x07),
            (0x01, 0xab, 0xab),
            (0x00, 0xff, 0x00),
        ];

        for (i, (a, b, p)) in cases.into_iter().enumerate() {
            assert_eq!(multiply_gf256(a, b), p, "case {i} failed");
        }
    }

    #[test]
    fn commutative_and_distributive() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(
                    multiply_gf256(a, b),
                    multiply_gf256(b, a),
                    "{a:#x} * {b:#x} not commutative"
                );
            }
        }

        for a in (0..=255u8).step_by(7) {
            for b in (0..=255u8).step_by(5) {
                for c in (0..=255u8).step_by(3) {
                    assert_eq!(
                        multiply_gf256(a, plus_gf256(b, c)),
                        plus_gf256(multiply_gf256(a, b), multiply_gf256(a, c)),
                        "{a:#x} * ({b:#x} + {c:#x}) not distributive"
                    );
                }
            }
        }
    }

    #[test]
    fn every_nonzero_element_has_inverse() {
        for a in 1..=255u8 {
            assert!(
                (1..=255u8).any(|b| multiply_gf256(a, b) == 1),
                "{a:#x} has no inverse"
            );
        }
    }
}
