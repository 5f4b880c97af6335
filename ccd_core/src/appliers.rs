//! Clock widths and settle waits: one encoded duration, one command each.

use core::fmt;

use ccd_traits::CommandChannel;

use crate::controller::TimingController;
use crate::error::Result;
use crate::protocol::Opcode;
use crate::timing::encode_checked;

/// Timing settings that are a single duration sent under their own opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingParameter {
    /// Settle wait before the CDS pedestal is integrated.
    PedestalWait,
    /// Settle wait before the CDS signal is integrated.
    SignalWait,
    DumpGateWidth,
    OutputGateWidth,
    /// Reset-gate width used while skipping.
    ResetGateWidth,
    SummingWellWidth,
}

impl TimingParameter {
    /// All parameters in the order a full settings upload applies them.
    pub const ALL: [TimingParameter; 6] = [
        TimingParameter::PedestalWait,
        TimingParameter::SignalWait,
        TimingParameter::DumpGateWidth,
        TimingParameter::OutputGateWidth,
        TimingParameter::ResetGateWidth,
        TimingParameter::SummingWellWidth,
    ];

    pub const fn opcode(self) -> Opcode {
        match self {
            TimingParameter::PedestalWait => Opcode::Cpr,
            TimingParameter::SignalWait => Opcode::Cpo,
            TimingParameter::DumpGateWidth => Opcode::Dgw,
            TimingParameter::OutputGateWidth => Opcode::Ogw,
            TimingParameter::ResetGateWidth => Opcode::Rsw,
            TimingParameter::SummingWellWidth => Opcode::Sww,
        }
    }

    /// Human-readable name used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            TimingParameter::PedestalWait => "pedestal wait time",
            TimingParameter::SignalWait => "signal wait time",
            TimingParameter::DumpGateWidth => "DG width",
            TimingParameter::OutputGateWidth => "OG width",
            TimingParameter::ResetGateWidth => "RG width",
            TimingParameter::SummingWellWidth => "SW width",
        }
    }
}

impl fmt::Display for TimingParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<C: CommandChannel> TimingController<C> {
    /// Encode `duration_us` and send it under the parameter's opcode.
    pub fn apply_parameter(&mut self, parameter: TimingParameter, duration_us: f64) -> Result<()> {
        let encoding = encode_checked(duration_us);
        if let Err(e) = self
            .dispatcher
            .dispatch(parameter.opcode(), &[encoding.word.raw()])
        {
            tracing::debug!(%parameter, error = %e, "error setting the {parameter}");
            return Err(e);
        }
        self.params.set(parameter, encoding.applied_us);
        tracing::info!(
            %parameter,
            duration_us = encoding.applied_us,
            word = %encoding.word,
            "timing parameter applied"
        );
        Ok(())
    }

    pub fn apply_pedestal_integral_wait(&mut self, wait_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::PedestalWait, wait_us)
    }

    pub fn apply_signal_integral_wait(&mut self, wait_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::SignalWait, wait_us)
    }

    pub fn apply_dump_gate_width(&mut self, width_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::DumpGateWidth, width_us)
    }

    pub fn apply_output_gate_width(&mut self, width_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::OutputGateWidth, width_us)
    }

    pub fn apply_skipping_reset_gate_width(&mut self, width_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::ResetGateWidth, width_us)
    }

    pub fn apply_summing_well_width(&mut self, width_us: f64) -> Result<()> {
        self.apply_parameter(TimingParameter::SummingWellWidth, width_us)
    }
}
