//! Subcommand bodies: backend assembly and the four operations.

use ccd_config::Config;
use ccd_core::{
    Gain, Opcode, TimingController, TimingSettings, TimingUnit, encode, encode_checked,
};
use ccd_hardware::SimulatedTimingBoard;
use eyre::Result;
use serde_json::json;

use crate::cli::Setting;

/// Echo value used by `self-check`.
const LINK_CHECK_PATTERN: u32 = 0x0012_3456;

fn unit_name(unit: TimingUnit) -> &'static str {
    match unit {
        TimingUnit::Little => "little",
        TimingUnit::Big => "big",
    }
}

/// Build the simulated timing board, honoring the test hooks
/// `CCD_TEST_SIM_FAIL=<OPCODE>` and `CCD_TEST_SIM_TIMEOUT=1`.
pub fn simulated_board() -> Result<SimulatedTimingBoard> {
    let mut board = SimulatedTimingBoard::new();
    if let Ok(mnemonic) = std::env::var("CCD_TEST_SIM_FAIL") {
        let Some(opcode) = Opcode::from_mnemonic(mnemonic.trim()) else {
            eyre::bail!("CCD_TEST_SIM_FAIL: unknown opcode {mnemonic:?}");
        };
        tracing::warn!(%opcode, "simulator will reject opcode");
        board = board.fail_on(opcode.code());
    }
    if std::env::var("CCD_TEST_SIM_TIMEOUT").is_ok_and(|v| v == "1") {
        tracing::warn!("simulator will time out every command");
        board = board.with_timeout(true);
    }
    Ok(board)
}

fn controller(cfg: &Config) -> Result<TimingController<SimulatedTimingBoard>> {
    Ok(TimingController::new(simulated_board()?).with_target(cfg.board.target))
}

pub fn run_encode(us: f64, json: bool) -> Result<()> {
    let enc = encode_checked(us);
    if json {
        println!(
            "{}",
            json!({
                "requested_us": enc.requested_us,
                "applied_us": enc.applied_us,
                "word": enc.word.to_string(),
                "raw": enc.word.raw(),
                "unit": unit_name(enc.unit),
                "multiplier": enc.multiplier,
                "effective_ns": enc.word.effective_ns(),
                "clamped": enc.clamped.is_some(),
                "multiplier_overflow": enc.multiplier_overflows(),
            })
        );
        return Ok(());
    }
    if let Some(clamp) = enc.clamped {
        println!("note: {clamp}");
    }
    println!("word        {}", enc.word);
    println!("field       {:#04x}", enc.word.field());
    println!("unit        {} ({} ns)", unit_name(enc.unit), enc.unit.ns());
    println!("multiplier  {}", enc.multiplier);
    println!("effective   {} ns", enc.word.effective_ns());
    if enc.multiplier_overflows() {
        println!("note: multiplier {} does not fit in 7 bits", enc.multiplier);
    }
    Ok(())
}

pub fn run_apply(cfg: &Config, json: bool) -> Result<()> {
    let settings = TimingSettings::try_from(&cfg.timing)?;
    let mut ctl = controller(cfg)?;
    let acknowledged = ctl.apply_settings(&settings)?;
    if json {
        println!(
            "{}",
            json!({ "applied": true, "acknowledged": acknowledged })
        );
    } else {
        println!("Timing settings applied ({acknowledged} commands acknowledged).");
    }
    Ok(())
}

pub fn run_set(cfg: &Config, setting: Setting, us: f64, gain: Option<u32>, json: bool) -> Result<()> {
    let mut ctl = controller(cfg)?;
    let (label, applied_us) = match setting.parameter() {
        Some(parameter) => {
            ctl.apply_parameter(parameter, us)?;
            (parameter.label(), ctl.params().get(parameter))
        }
        None => {
            let Some(gain) = gain else {
                eyre::bail!("--gain is required when setting the integration time");
            };
            let gain = Gain::try_from(gain)?;
            ctl.apply_integral_time_and_gain(us, gain)?;
            ("integration time", ctl.params().integration_time_us)
        }
    };
    // The recorded value is already in range, so re-encoding it is silent.
    let applied_us = applied_us.unwrap_or(us);
    let word = encode(applied_us);
    if json {
        println!(
            "{}",
            json!({
                "setting": label,
                "applied_us": applied_us,
                "word": word.to_string(),
                "speed": ctl.integration_state().speed().map(|s| format!("{s:?}").to_lowercase()),
            })
        );
    } else {
        println!("{label} set to {applied_us} us (word {word})");
    }
    Ok(())
}

pub fn run_self_check(cfg: &Config, json: bool) -> Result<()> {
    TimingSettings::try_from(&cfg.timing)?;
    let mut ctl = controller(cfg)?;
    ctl.test_data_link(LINK_CHECK_PATTERN)?;
    if json {
        println!("{}", json!({ "ok": true, "target": cfg.board.target }));
    } else {
        println!("OK");
    }
    Ok(())
}
