//! `TimingController`: the single owner of the dispatcher and of the
//! controller-side record of what the board has accepted.

use ccd_traits::CommandChannel;

use crate::appliers::TimingParameter;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::integration::{Gain, IntegrationChannelState};

/// Last value the board acknowledged for each timing-dependent setting.
///
/// Durations are stored as applied, i.e. after clamping. A field stays
/// `None` until its first successful command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceParams {
    pub integration_time_us: Option<f64>,
    pub gain: Option<Gain>,
    pub pedestal_wait_us: Option<f64>,
    pub signal_wait_us: Option<f64>,
    pub dump_gate_width_us: Option<f64>,
    pub output_gate_width_us: Option<f64>,
    pub reset_gate_width_us: Option<f64>,
    pub summing_well_width_us: Option<f64>,
}

impl DeviceParams {
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

    pub(crate) fn set(&mut self, parameter: TimingParameter, us: f64) {
        let slot = match parameter {
            TimingParameter::PedestalWait => &mut self.pedestal_wait_us,
            TimingParameter::SignalWait => &mut self.signal_wait_us,
            TimingParameter::DumpGateWidth => &mut self.dump_gate_width_us,
            TimingParameter::OutputGateWidth => &mut self.output_gate_width_us,
            TimingParameter::ResetGateWidth => &mut self.reset_gate_width_us,
            TimingParameter::SummingWellWidth => &mut self.summing_well_width_us,
        };
        *slot = Some(us);
    }
}

/// Applies timing settings to one timing board over a `CommandChannel`.
///
/// All operations take `&mut self`; one controller never has two commands in
/// flight. Share a board between controllers with
/// [`SharedChannel`](crate::shared::SharedChannel).
#[derive(Debug)]
pub struct TimingController<C> {
    pub(crate) dispatcher: Dispatcher<C>,
    pub(crate) integration: IntegrationChannelState,
    pub(crate) params: DeviceParams,
}

impl<C: CommandChannel> TimingController<C> {
    pub fn new(channel: C) -> Self {
        Self {
            dispatcher: Dispatcher::new(channel),
            integration: IntegrationChannelState::default(),
            params: DeviceParams::default(),
        }
    }

    /// Address a board id other than the timing board.
    pub fn with_target(mut self, target: u32) -> Self {
        self.dispatcher = self.dispatcher.with_target(target);
        self
    }

    pub fn params(&self) -> &DeviceParams {
        &self.params
    }

    pub fn integration_state(&self) -> &IntegrationChannelState {
        &self.integration
    }

    pub fn channel(&self) -> &C {
        self.dispatcher.channel()
    }

    pub fn channel_mut(&mut self) -> &mut C {
        self.dispatcher.channel_mut()
    }

    pub fn into_channel(self) -> C {
        self.dispatcher.into_channel()
    }

    /// Check the command path with an echo round trip.
    pub fn test_data_link(&mut self, value: u32) -> Result<()> {
        self.dispatcher.test_data_link(value)
    }
}
