use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Money amount represented as **integer minor units** (cents).
///
/// Use this type for **all** monetary values in the engine (budgets,
/// expenditure totals, ledger balances, obligations) to avoid floating-point
/// drift. Floating point only appears at two boundaries:
///
/// - multiplying by an exchange rate ([`mul_rate`]), rounded half-to-even
///   straight back to minor units;
/// - the final report, where [`to_major`] produces the `f64` the API exposes.
///
/// Fractional shares are computed exactly in 128-bit arithmetic
/// ([`mul_div`]), with the same half-to-even rule on the remainder.
///
/// [`mul_rate`]: MoneyMinor::mul_rate
/// [`mul_div`]: MoneyMinor::mul_div
/// [`to_major`]: MoneyMinor::to_major
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyMinor(i64);

impl MoneyMinor {
    pub const ZERO: MoneyMinor = MoneyMinor(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Multiplies by an exchange rate and rounds half-to-even back to minor
    /// units.
    #[must_use]
    pub fn mul_rate(self, rate: f64) -> MoneyMinor {
        MoneyMinor((self.0 as f64 * rate).round_ties_even() as i64)
    }

    /// Computes `self * num / den` exactly in 128-bit arithmetic, rounding the
    /// remainder half-to-even.
    ///
    /// `den` must be positive; callers validate it when loading shares.
    #[must_use]
    pub fn mul_div(self, num: i64, den: i64) -> MoneyMinor {
        debug_assert!(den > 0);
        let scaled = self.0 as i128 * num as i128;
        let den = den as i128;
        let mut quotient = scaled.div_euclid(den);
        let remainder = scaled.rem_euclid(den);
        let twice = remainder * 2;
        if twice > den || (twice == den && quotient % 2 != 0) {
            quotient += 1;
        }
        MoneyMinor(quotient as i64)
    }

    /// Major-unit value for the report boundary (2 fraction digits).
    #[must_use]
    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for MoneyMinor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyMinor {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyMinor> for i64 {
    fn from(value: MoneyMinor) -> Self {
        value.0
    }
}

impl Add for MoneyMinor {
    type Output = MoneyMinor;

    fn add(self, rhs: MoneyMinor) -> Self::Output {
        MoneyMinor(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyMinor {
    fn add_assign(&mut self, rhs: MoneyMinor) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyMinor {
    type Output = MoneyMinor;

    fn sub(self, rhs: MoneyMinor) -> Self::Output {
        MoneyMinor(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyMinor {
    fn sub_assign(&mut self, rhs: MoneyMinor) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyMinor {
    type Output = MoneyMinor;

    fn neg(self) -> Self::Output {
        MoneyMinor(-self.0)
    }
}
