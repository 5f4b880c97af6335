use ccd_config::{load_file, load_toml};
use rstest::rstest;
use std::fs;

fn timing_toml(gain: u32, pedestal_wait_us: &str) -> String {
    format!(
        r#"
[timing]
integration_time_us = 10.0
gain = {gain}
pedestal_wait_us = {pedestal_wait_us}
signal_wait_us = 1.0
dump_gate_width_us = 0.5
output_gate_width_us = 0.5
rg_width_us = 0.2
summing_well_width_us = 0.5
"#
    )
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(10)]
fn accepts_device_gains(#[case] gain: u32) {
    let cfg = load_toml(&timing_toml(gain, "1.0")).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.board.target, 2);
    assert_eq!(cfg.timing.reset_gate_width_us, Some(0.2));
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(4)]
#[case(100)]
fn rejects_other_gains(#[case] gain: u32) {
    let cfg = load_toml(&timing_toml(gain, "1.0")).expect("parse TOML");
    let err = cfg.validate().expect_err("gain should be rejected");
    assert!(format!("{err}").contains("timing.gain must be one of 1, 2, 5 or 10"));
}

#[rstest]
#[case("-0.5", "pedestal_wait_us must be >= 0")]
#[case("nan", "pedestal_wait_us must be finite")]
#[case("inf", "pedestal_wait_us must be finite")]
fn rejects_bad_durations(#[case] value: &str, #[case] needle: &str) {
    let cfg = load_toml(&timing_toml(2, value)).expect("parse TOML");
    let err = cfg.validate().expect_err("duration should be rejected");
    assert!(format!("{err}").contains(needle), "{err}");
}

#[test]
fn accepts_long_durations_for_clamping() {
    let cfg = load_toml(&timing_toml(2, "500.0")).expect("parse TOML");
    cfg.validate().expect("out-of-range durations are clamped later");
}

#[test]
fn optional_parameters_may_be_omitted() {
    let toml = r#"
[board]
target = 2

[timing]
integration_time_us = 4.0
gain = 1
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert!(
        cfg.timing
            .optional_durations()
            .iter()
            .all(|(_, v)| v.is_none())
    );
}

#[test]
fn rejects_unknown_rotation() {
    let toml = format!("{}\n[logging]\nrotation = \"weekly\"\n", timing_toml(2, "1.0"));
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("weekly rotation is not supported");
    assert!(format!("{err}").contains("logging.rotation"));
}

#[test]
fn missing_timing_section_fails_to_parse() {
    assert!(load_toml("[logging]\nlevel = \"debug\"\n").is_err());
}

#[test]
fn load_file_parses_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, timing_toml(5, "2.0")).unwrap();
    let cfg = load_file(&good).expect("load good config");
    assert_eq!(cfg.timing.gain, 5);

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, timing_toml(7, "2.0")).unwrap();
    assert!(load_file(&bad).is_err());

    assert!(load_file(&dir.path().join("missing.toml")).is_err());
}
