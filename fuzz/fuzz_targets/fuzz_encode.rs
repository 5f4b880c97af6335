#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bits: u64| {
    let us = f64::from_bits(bits);
    let enc = ccd_core::encode_checked(us);
    assert!((0.0..=163.0).contains(&enc.applied_us));
    // Only bits 16..=24 may ever be set.
    assert_eq!(enc.word.raw() & !0x01FF_0000, 0);
    assert_eq!(enc.word, ccd_core::encode(us));
});
