//! Dyadic phase arithmetic.
//!
//! Spider phases are rational multiples of π with power-of-two denominators,
//! so phases live on a dyadic grid in `[0, 2π)`. Addition keeps the grid
//! closed: the common denominator of two powers of two is their maximum, and
//! GCD reduction divides the denominator by another power of two.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, ZxError};

/// A spider phase `numer/denom · π` in canonical residue form.
///
/// Invariants: `denom` is a power of two and `0 <= numer < 2·denom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Phase {
    numer: u64,
    denom: u64,
}

impl Phase {
    /// Builds a phase from a (possibly unreduced, possibly negative)
    /// numerator over a power-of-two denominator.
    pub fn new(numer: i64, denom: u64) -> Result<Self, ZxError> {
        let (numer, denom) = normalize_phase(numer, denom)?;
        Ok(Self { numer, denom })
    }

    /// The zero phase.
    pub const fn zero() -> Self {
        Self { numer: 0, denom: 1 }
    }

    /// Canonical numerator, in `[0, 2·denom)`.
    pub fn numer(&self) -> u64 {
        self.numer
    }

    /// Canonical denominator, always a power of two.
    pub fn denom(&self) -> u64 {
        self.denom
    }

    /// Phase angle in radians, in `[0, 2π)`.
    pub fn radians(&self) -> f64 {
        std::f64::consts::PI * self.numer as f64 / self.denom as f64
    }

    /// Whether the phase is in canonical residue form.
    ///
    /// Constructed phases always are; deserialized payloads may not be, so
    /// [`crate::ZxDiagram::validate`] re-checks this invariant.
    pub fn is_canonical(&self) -> bool {
        if !is_power_of_two(self.denom) || self.numer >= 2 * self.denom {
            return false;
        }
        if self.numer == 0 {
            self.denom == 1
        } else {
            gcd(self.numer, self.denom) == 1
        }
    }

    /// Sum of two phases, reduced modulo 2π.
    pub fn add(&self, other: &Phase) -> Phase {
        let (numer, denom) = add_phases(
            self.numer as i64,
            self.denom,
            other.numer as i64,
            other.denom,
        )
        .expect("canonical phases have power-of-two denominators");
        Phase { numer, denom }
    }
}

fn is_power_of_two(n: u64) -> bool {
    n > 0 && n & (n - 1) == 0
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

fn check_denominator(denom: u64) -> Result<(), ZxError> {
    if !is_power_of_two(denom) {
        return Err(ZxError::Phase(
            ErrorInfo::new("bad-denominator", "phase denominator must be a power of two")
                .with_context("denom", denom),
        ));
    }
    Ok(())
}

/// Reduces a phase to its canonical residue: numerator in `[0, 2·denom)`,
/// fraction reduced by GCD. The denominator stays a power of two.
pub fn normalize_phase(numer: i64, denom: u64) -> Result<(u64, u64), ZxError> {
    check_denominator(denom)?;
    let modulus = 2 * denom as i64;
    let numer_mod = numer.rem_euclid(modulus) as u64;
    if numer_mod == 0 {
        return Ok((0, 1));
    }
    let g = gcd(numer_mod, denom);
    Ok((numer_mod / g, denom / g))
}

/// Adds two dyadic phases and returns the reduced sum.
///
/// The common denominator of two powers of two is their maximum, so the
/// result stays on the dyadic grid.
pub fn add_phases(
    numer1: i64,
    denom1: u64,
    numer2: i64,
    denom2: u64,
) -> Result<(u64, u64), ZxError> {
    check_denominator(denom1)?;
    check_denominator(denom2)?;
    let common = denom1.max(denom2);
    let lifted1 = numer1 * (common / denom1) as i64;
    let lifted2 = numer2 * (common / denom2) as i64;
    normalize_phase(lifted1 + lifted2, common)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_canonical() {
        assert_eq!(Phase::zero(), Phase::new(0, 8).unwrap());
        assert_eq!(Phase::zero().radians(), 0.0);
    }

    #[test]
    fn negative_numerators_wrap() {
        // -π/4 == 7π/4
        let phase = Phase::new(-1, 4).unwrap();
        assert_eq!((phase.numer(), phase.denom()), (7, 4));
    }

    #[test]
    fn non_power_of_two_denominator_rejected() {
        let err = Phase::new(1, 3).unwrap_err();
        assert_eq!(err.info().code, "bad-denominator");
    }
}
