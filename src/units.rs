use std::{
    fmt,
    ops::{Add, AddAssign},
};

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use thiserror::Error;

lazy_static! {
    /// Hastings are the indivisible base unit of the currency, 10^24 per siacoin.
    pub static ref HASTINGS_PER_SIACOIN: BigUint = BigUint::from(10u32).pow(24);
    pub static ref BYTES_PER_GIGABYTE: BigUint = BigUint::from(1_000_000_000u64);
}

/// An amount of the currency's base unit. Per-block contract costs are large
/// enough that summing a block-week of them overflows u64, so the amount is
/// kept unbounded and only scaled display values ever leave the big domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hastings(BigUint);

impl Hastings {
    pub fn new(amount: BigUint) -> Self {
        Self(amount)
    }

    /// Decode from the big-endian magnitude bytes the store encoding uses.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    pub fn amount(&self) -> &BigUint {
        &self.0
    }
}

impl fmt::Display for Hastings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} H", self.0)
    }
}

impl From<u64> for Hastings {
    fn from(amount: u64) -> Self {
        Self(BigUint::from(amount))
    }
}

impl Add<Hastings> for Hastings {
    type Output = Self;

    fn add(self, Hastings(rhs): Self) -> Self::Output {
        let Hastings(lhs) = self;
        Hastings(lhs + rhs)
    }
}

impl AddAssign<Hastings> for Hastings {
    fn add_assign(&mut self, Hastings(rhs): Hastings) {
        self.0 += rhs;
    }
}

#[derive(Debug, Error)]
#[error("aggregate {amount} does not fit a finite f64 after scaling")]
pub struct ConversionError {
    amount: BigUint,
}

/// Scale a base-unit aggregate into display units as a float.
///
/// The division happens in the big domain so an amount that is an exact
/// multiple of the scale converts without any floating point drift; only
/// the sub-unit remainder is approximated.
pub fn scale_to_f64(amount: &BigUint, scale: &BigUint) -> Result<f64, ConversionError> {
    let whole = (amount / scale).to_f64().filter(|f| f.is_finite());
    let fraction = (amount % scale)
        .to_f64()
        .zip(scale.to_f64())
        .map(|(remainder, scale)| remainder / scale)
        .unwrap_or(0.0);

    match whole {
        Some(whole) if (whole + fraction).is_finite() => Ok(whole + fraction),
        _ => Err(ConversionError {
            amount: amount.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_exact_multiple_has_no_drift() {
        // 5 SC in hastings scales to exactly 5.0.
        let amount = BigUint::from(5u32) * &*HASTINGS_PER_SIACOIN;
        assert_eq!(scale_to_f64(&amount, &HASTINGS_PER_SIACOIN).unwrap(), 5.0);
    }

    #[test]
    fn scale_sub_unit_amount() {
        // 10^18 hastings is 10^-6 SC.
        let amount = BigUint::from(10u32).pow(18);
        let scaled = scale_to_f64(&amount, &HASTINGS_PER_SIACOIN).unwrap();
        assert!((scaled - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn scale_zero_is_zero() {
        let amount = BigUint::from(0u32);
        assert_eq!(scale_to_f64(&amount, &HASTINGS_PER_SIACOIN).unwrap(), 0.0);
    }

    #[test]
    fn scale_overflowing_amount_errors() {
        // Far past f64::MAX even after scaling.
        let amount = BigUint::from(10u32).pow(400);
        assert!(scale_to_f64(&amount, &HASTINGS_PER_SIACOIN).is_err());
    }

    #[test]
    fn bytes_scale_to_gigabytes() {
        let amount = BigUint::from(3_500_000_000u64);
        assert_eq!(scale_to_f64(&amount, &BYTES_PER_GIGABYTE).unwrap(), 3.5);
    }

    #[test]
    fn hastings_add() {
        assert_eq!(Hastings::from(2u64) + Hastings::from(3u64), Hastings::from(5u64));
    }

    #[test]
    fn hastings_display() {
        assert_eq!(Hastings::from(1_000u64).to_string(), "1000 H");
    }
}
