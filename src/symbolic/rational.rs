use std::fmt;

/// Exact rational literal, always stored reduced with a positive denominator.
///
/// Arithmetic is checked: every operation returns `None` on overflow or on a
/// zero divisor, and callers decide whether that means "keep the expression
/// unfolded" or "report a division by zero".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    num: i64,
    den: i64,
}

impl Rational {
    /// Build `num/den` in lowest terms. Returns `None` when `den` is zero.
    pub fn new(num: i64, den: i64) -> Option<Self> {
        Self::from_i128(num as i128, den as i128)
    }

    pub fn integer(value: i64) -> Self {
        Rational { num: value, den: 1 }
    }

    pub fn numer(&self) -> i64 {
        self.num
    }

    pub fn denom(&self) -> i64 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    pub fn checked_neg(self) -> Option<Self> {
        Some(Rational {
            num: self.num.checked_neg()?,
            den: self.den,
        })
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let num = self.num as i128 * rhs.den as i128 + rhs.num as i128 * self.den as i128;
        Self::from_i128(num, self.den as i128 * rhs.den as i128)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.checked_add(rhs.checked_neg()?)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        Self::from_i128(
            self.num as i128 * rhs.num as i128,
            self.den as i128 * rhs.den as i128,
        )
    }

    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        Self::from_i128(
            self.num as i128 * rhs.den as i128,
            self.den as i128 * rhs.num as i128,
        )
    }

    /// Raise to an integer power. `0` to a negative power yields `None`.
    pub fn checked_pow(self, exp: i64) -> Option<Self> {
        let base = if exp < 0 {
            Rational::integer(1).checked_div(self)?
        } else {
            self
        };
        let mut acc = Rational::integer(1);
        let mut square = base;
        let mut e = exp.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.checked_mul(square)?;
            }
            e >>= 1;
            if e > 0 {
                square = square.checked_mul(square)?;
            }
        }
        Some(acc)
    }

    fn from_i128(num: i128, den: i128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i128;
        let (mut num, mut den) = (num / g, den / g);
        if den < 0 {
            num = -num;
            den = -den;
        }
        Some(Rational {
            num: i64::try_from(num).ok()?,
            den: i64::try_from(den).ok()?,
        })
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn reduces_and_normalises_sign() {
        assert_eq!(r(2, 4), r(1, 2));
        assert_eq!(r(3, -6), r(-1, 2));
        assert_eq!(r(0, -5), Rational::integer(0));
        assert!(Rational::new(1, 0).is_none());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(r(1, 2).checked_add(r(1, 3)), Some(r(5, 6)));
        assert_eq!(r(1, 2).checked_sub(r(1, 3)), Some(r(1, 6)));
        assert_eq!(r(2, 3).checked_mul(r(3, 4)), Some(r(1, 2)));
        assert_eq!(r(1, 1).checked_div(r(137, 1)), Some(r(1, 137)));
        assert_eq!(r(1, 2).checked_div(Rational::integer(0)), None);
    }

    #[test]
    fn integer_powers() {
        assert_eq!(r(2, 3).checked_pow(2), Some(r(4, 9)));
        assert_eq!(r(2, 1).checked_pow(-2), Some(r(1, 4)));
        assert_eq!(r(5, 7).checked_pow(0), Some(Rational::integer(1)));
        assert_eq!(Rational::integer(0).checked_pow(-1), None);
    }

    #[test]
    fn overflow_is_reported() {
        assert_eq!(Rational::integer(i64::MAX).checked_add(Rational::integer(1)), None);
        assert_eq!(Rational::integer(10).checked_pow(30), None);
    }

    #[test]
    fn display() {
        assert_eq!(r(1, 137).to_string(), "1/137");
        assert_eq!(r(-4, 2).to_string(), "-2");
    }
}
