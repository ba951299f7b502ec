use proptest::prelude::*;
use zx_core::{add_phases, normalize_phase, Phase};

#[test]
fn zero_plus_quarter_pi() {
    assert_eq!(add_phases(0, 1, 1, 4).unwrap(), (1, 4));
}

#[test]
fn quarter_plus_quarter_reduces() {
    // π/4 + π/4 = π/2
    assert_eq!(add_phases(1, 4, 1, 4).unwrap(), (1, 2));
}

#[test]
fn mixed_denominators_stay_dyadic() {
    let (numer, denom) = add_phases(1, 2, 1, 4).unwrap();
    assert_eq!((numer, denom), (3, 4));
    assert!(denom.is_power_of_two());
}

#[test]
fn full_turn_wraps_to_zero() {
    // π + π = 2π ≡ 0
    assert_eq!(add_phases(1, 1, 1, 1).unwrap(), (0, 1));
}

#[test]
fn normalization_handles_negatives() {
    assert_eq!(normalize_phase(-3, 8).unwrap(), (13, 8));
}

#[test]
fn phase_type_matches_free_functions() {
    let a = Phase::new(3, 8).unwrap();
    let b = Phase::new(5, 8).unwrap();
    let sum = a.add(&b);
    assert_eq!((sum.numer(), sum.denom()), add_phases(3, 8, 5, 8).unwrap());
}

proptest! {
    #[test]
    fn sums_are_canonical(n1 in -64i64..64, n2 in -64i64..64, d1 in 0u32..6, d2 in 0u32..6) {
        let (numer, denom) = add_phases(n1, 1 << d1, n2, 1 << d2).unwrap();
        prop_assert!(denom.is_power_of_two());
        prop_assert!(numer < 2 * denom);
        let rebuilt = Phase::new(numer as i64, denom).unwrap();
        prop_assert!(rebuilt.is_canonical());
        prop_assert_eq!((rebuilt.numer(), rebuilt.denom()), (numer, denom));
    }

    #[test]
    fn addition_commutes(n1 in -32i64..32, n2 in -32i64..32, d1 in 0u32..5, d2 in 0u32..5) {
        let forward = add_phases(n1, 1 << d1, n2, 1 << d2).unwrap();
        let backward = add_phases(n2, 1 << d2, n1, 1 << d1).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
