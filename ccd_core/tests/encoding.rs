use ccd_core::timing::{MAX_DURATION_US, NEAREST_FIT_LIMIT_NS};
use ccd_core::{TimingUnit, encode, encode_checked};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
// 163000 ns, big unit: 509 needs 9 bits, the 0x80 OR is a no-op.
#[case(163.0, 0x01FD_0000)]
// 4000 ns: big remainder 160 is not reduced, little remainder 0 wins.
#[case(4.0, 0x0064_0000)]
// 500 ns: big remainder 180 -> 140, little remainder 20 stays; little wins.
#[case(0.5, 0x000C_0000)]
// 4001 ns is past the nearest-fit window: big unit, 12 * 320.
#[case(4.001_5, 0x008C_0000)]
// 640 ns is a tie at distance 0; big wins.
#[case(0.64, 0x0082_0000)]
// 40 ns: one little unit.
#[case(0.04, 0x0001_0000)]
// 0 ns ties at 0 and takes the big unit with multiplier 0.
#[case(0.0, 0x0080_0000)]
fn literal_words(#[case] us: f64, #[case] expected: u32) {
    assert_eq!(encode(us).raw(), expected, "encode({us})");
}

#[test]
fn clamp_is_reported() {
    let e = encode_checked(200.0);
    let clamped = e.clamped.expect("200 us must be clamped");
    assert_eq!(clamped.requested_us, 200.0);
    assert_eq!(clamped.applied_us, MAX_DURATION_US);
    assert_eq!(e.word, encode(MAX_DURATION_US));
    assert!(e.multiplier_overflows());

    let e = encode_checked(-3.0);
    assert_eq!(e.clamped.map(|c| c.applied_us), Some(0.0));
    assert_eq!(e.word, encode(0.0));

    assert!(encode_checked(MAX_DURATION_US).clamped.is_none());
    assert!(encode_checked(4.0).clamped.is_none());
}

#[test]
fn non_finite_inputs_clamp() {
    assert_eq!(encode(f64::INFINITY), encode(MAX_DURATION_US));
    assert_eq!(encode(f64::NAN), encode(0.0));
    assert!(encode_checked(f64::NAN).clamped.is_some());
}

#[test]
fn only_bits_16_to_24_are_ever_set() {
    for ns in (0..=163_000u32).step_by(7) {
        let w = encode(f64::from(ns) / 1000.0).raw();
        assert_eq!(w & 0xFE00_FFFF, 0, "ns={ns} word={w:#010x}");
    }
}

proptest! {
    #[test]
    fn clamps_everything_above_max(t in 163.000_001f64..1.0e12) {
        prop_assert_eq!(encode(t), encode(163.0));
    }

    #[test]
    fn deterministic(t in -10.0f64..200.0) {
        prop_assert_eq!(encode(t), encode(t));
        prop_assert_eq!(encode_checked(t), encode_checked(t));
    }

    #[test]
    fn unit_flag_set_above_nearest_fit_window(t in 4.002f64..163.0) {
        let e = encode_checked(t);
        prop_assert!(e.duration_ns > NEAREST_FIT_LIMIT_NS);
        prop_assert_eq!(e.unit, TimingUnit::Big);
        prop_assert!(e.word.field() & 0x80 != 0);
    }

    #[test]
    fn small_durations_fit_seven_bits(t in 0.0f64..40.9) {
        let e = encode_checked(t);
        prop_assert!(!e.multiplier_overflows());
        prop_assert_eq!(e.word.multiplier(), e.multiplier);
        prop_assert_eq!(e.word.unit(), e.unit);
        // Truncation never encodes more than was asked for.
        prop_assert!(e.word.effective_ns() <= e.duration_ns);
    }
}
