#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the CCD timing controller.
//!
//! `Config` and its sections are deserialized from TOML and validated.
//! Durations are in microseconds. Values above 163 us are accepted here; the
//! encoder clamps them and logs a warning.
use serde::Deserialize;

/// Gains the dual-slope integrator accepts.
pub const VALID_GAINS: [u32; 4] = [1, 2, 5, 10];

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Board {
    /// Board id on the command bus (2 = timing board)
    pub target: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self { target: 2 }
    }
}

#[derive(Debug, Deserialize)]
pub struct TimingCfg {
    pub integration_time_us: f64,
    /// Dual-slope integrator gain: 1, 2, 5 or 10
    pub gain: u32,
    /// Settle wait before the pedestal is integrated
    #[serde(default)]
    pub pedestal_wait_us: Option<f64>,
    /// Settle wait before the signal is integrated
    #[serde(default)]
    pub signal_wait_us: Option<f64>,
    #[serde(default)]
    pub dump_gate_width_us: Option<f64>,
    #[serde(default)]
    pub output_gate_width_us: Option<f64>,
    /// Reset-gate width while skipping. Also accepts alias "rg_width_us".
    #[serde(default, alias = "rg_width_us")]
    pub reset_gate_width_us: Option<f64>,
    #[serde(default)]
    pub summing_well_width_us: Option<f64>,
}

impl TimingCfg {
    /// Optional durations with their config keys, in upload order.
    pub fn optional_durations(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("pedestal_wait_us", self.pedestal_wait_us),
            ("signal_wait_us", self.signal_wait_us),
            ("dump_gate_width_us", self.dump_gate_width_us),
            ("output_gate_width_us", self.output_gate_width_us),
            ("reset_gate_width_us", self.reset_gate_width_us),
            ("summing_well_width_us", self.summing_well_width_us),
        ]
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: Board,
    pub timing: TimingCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    cfg.validate()?;
    Ok(cfg)
}

fn check_duration(key: &str, us: f64) -> eyre::Result<()> {
    if !us.is_finite() {
        eyre::bail!("timing.{key} must be finite");
    }
    if us < 0.0 {
        eyre::bail!("timing.{key} must be >= 0");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Timing
        if !VALID_GAINS.contains(&self.timing.gain) {
            eyre::bail!(
                "timing.gain must be one of 1, 2, 5 or 10 (got {})",
                self.timing.gain
            );
        }
        check_duration("integration_time_us", self.timing.integration_time_us)?;
        for (key, value) in self.timing.optional_durations() {
            if let Some(us) = value {
                check_duration(key, us)?;
            }
        }

        // Logging
        if let Some(rotation) = self.logging.rotation.as_deref()
            && !matches!(rotation, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never, daily, hourly");
        }

        Ok(())
    }
}
