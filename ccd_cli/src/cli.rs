//! CLI argument definitions and shared statics.

use ccd_core::TimingParameter;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "ccdtiming", version, about = "CCD timing-board control")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/ccd_timing.toml")]
    pub config: PathBuf,

    /// Log and report as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Log level (error|warn|info|debug|trace); defaults to [logging] level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// One timing-dependent setting, as named on the command line.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Setting {
    /// Integration time (sends SGN then CIT; needs --gain)
    Integration,
    PedestalWait,
    SignalWait,
    DumpGate,
    OutputGate,
    ResetGate,
    SummingWell,
}

impl Setting {
    /// The clock-width / settle-wait parameter, or `None` for integration.
    pub fn parameter(self) -> Option<TimingParameter> {
        match self {
            Setting::Integration => None,
            Setting::PedestalWait => Some(TimingParameter::PedestalWait),
            Setting::SignalWait => Some(TimingParameter::SignalWait),
            Setting::DumpGate => Some(TimingParameter::DumpGateWidth),
            Setting::OutputGate => Some(TimingParameter::OutputGateWidth),
            Setting::ResetGate => Some(TimingParameter::ResetGateWidth),
            Setting::SummingWell => Some(TimingParameter::SummingWellWidth),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the timing word for a duration without touching the board
    Encode {
        /// Duration in microseconds (clamped to 0..=163)
        #[arg(long, allow_negative_numbers = true)]
        us: f64,
    },
    /// Upload the [timing] section of the config to the timing board
    Apply,
    /// Apply a single setting
    Set {
        #[arg(value_enum)]
        setting: Setting,
        /// Duration in microseconds
        #[arg(long, allow_negative_numbers = true)]
        us: f64,
        /// Integrator gain (1, 2, 5 or 10); required for `integration`
        #[arg(long)]
        gain: Option<u32>,
    },
    /// Validate the config and check the command link with an echo
    SelfCheck,
}

impl Commands {
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Encode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn every_parameter_has_a_setting_name() {
        let mapped: Vec<_> = Setting::value_variants()
            .iter()
            .filter_map(|s| s.parameter())
            .collect();
        assert_eq!(mapped, TimingParameter::ALL.to_vec());
    }
}
