//! A complete timing set and its ordered upload.

use ccd_traits::CommandChannel;

use crate::appliers::TimingParameter;
use crate::controller::TimingController;
use crate::error::Result;
use crate::integration::Gain;

/// Desired timing configuration for one readout.
///
/// Integration time and gain are always applied; each clock width or
/// settle wait is applied only when present.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSettings {
    pub integration_time_us: f64,
    pub gain: Gain,
    pub pedestal_wait_us: Option<f64>,
    pub signal_wait_us: Option<f64>,
    pub dump_gate_width_us: Option<f64>,
    pub output_gate_width_us: Option<f64>,
    pub reset_gate_width_us: Option<f64>,
    pub summing_well_width_us: Option<f64>,
}

impl TimingSettings {
    pub fn new(integration_time_us: f64, gain: Gain) -> Self {
        Self {
            integration_time_us,
            gain,
            pedestal_wait_us: None,
            signal_wait_us: None,
            dump_gate_width_us: None,
            output_gate_width_us: None,
            reset_gate_width_us: None,
            summing_well_width_us: None,
        }
    }

    pub fn with(mut self, parameter: TimingParameter, us: f64) -> Self {
        *self.slot_mut(parameter) = Some(us);
        self
    }

    pub fn get(&self, parameter: TimingParameter) -> Option<f64> {
        match parameter {
            TimingParameter::PedestalWait => self.pedestal_wait_us,
            TimingParameter::SignalWait => self.signal_wait_us,
            TimingParameter::DumpGateWidth => self.dump_gate_width_us,
            TimingParameter::OutputGateWidth => self.output_gate_width_us,
            TimingParameter::ResetGateWidth => self.reset_gate_width_us,
            TimingParameter::SummingWellWidth => self.summing_well_width_us,
        }
    }

    /// Present parameters in upload order.
    pub fn parameters(&self) -> impl Iterator<Item = (TimingParameter, f64)> + '_ {
        TimingParameter::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|us| (p, us)))
    }

    fn slot_mut(&mut self, parameter: TimingParameter) -> &mut Option<f64> {
        match parameter {
            TimingParameter::PedestalWait => &mut self.pedestal_wait_us,
            TimingParameter::SignalWait => &mut self.signal_wait_us,
            TimingParameter::DumpGateWidth => &mut self.dump_gate_width_us,
            TimingParameter::OutputGateWidth => &mut self.output_gate_width_us,
            TimingParameter::ResetGateWidth => &mut self.reset_gate_width_us,
            TimingParameter::SummingWellWidth => &mut self.summing_well_width_us,
        }
    }
}

impl<C: CommandChannel> TimingController<C> {
    /// Upload a full timing set: the integration channel first, then every
    /// present parameter in [`TimingParameter::ALL`] order.
    ///
    /// Stops at the first failure. Returns the number of commands the board
    /// acknowledged (`SGN` and `CIT` count separately).
    pub fn apply_settings(&mut self, settings: &TimingSettings) -> Result<usize> {
        self.apply_integral_time_and_gain(settings.integration_time_us, settings.gain)?;
        let mut acknowledged = 2;
        for (parameter, us) in settings.parameters() {
            self.apply_parameter(parameter, us)?;
            acknowledged += 1;
        }
        tracing::info!(acknowledged, "timing settings applied");
        Ok(acknowledged)
    }
}
