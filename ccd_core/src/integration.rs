//! Integration channel: integration time with its dependent gain and speed.
//!
//! The dual-slope integrator's analog bandwidth follows the integration
//! window, so the board must see `SGN` (gain, speed) before `CIT` (time).
//! [`TimingController::apply_integral_time_and_gain`] is the only public way
//! to send `CIT`, and it always sends `SGN` first.

use ccd_traits::CommandChannel;

use crate::controller::TimingController;
use crate::error::{Result, SettingsError, TimingError};
use crate::protocol::Opcode;
use crate::timing::encode_checked;

/// Integration times strictly below this select the fast integrator.
pub const FAST_INTEGRATOR_BELOW_US: f64 = 4.5;

/// Dual-slope integrator gain. The board accepts only these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gain {
    X1,
    X2,
    X5,
    X10,
}

impl Gain {
    pub const fn value(self) -> u32 {
        match self {
            Gain::X1 => 1,
            Gain::X2 => 2,
            Gain::X5 => 5,
            Gain::X10 => 10,
        }
    }
}

impl TryFrom<u32> for Gain {
    type Error = SettingsError;

    fn try_from(v: u32) -> std::result::Result<Self, Self::Error> {
        match v {
            1 => Ok(Gain::X1),
            2 => Ok(Gain::X2),
            5 => Ok(Gain::X5),
            10 => Ok(Gain::X10),
            other => Err(SettingsError::InvalidGain(other)),
        }
    }
}

impl core::fmt::Display for Gain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "x{}", self.value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegratorSpeed {
    Slow,
    Fast,
}

impl IntegratorSpeed {
    /// Fast below 4.5 us, slow at and above (and for NaN).
    pub fn for_integration_time(time_us: f64) -> Self {
        if time_us < FAST_INTEGRATOR_BELOW_US {
            IntegratorSpeed::Fast
        } else {
            IntegratorSpeed::Slow
        }
    }

    /// `SGN` speed argument: 0 slow, 1 fast.
    pub const fn wire(self) -> u32 {
        match self {
            IntegratorSpeed::Slow => 0,
            IntegratorSpeed::Fast => 1,
        }
    }
}

/// Integrator speed currently programmed on the board, as far as this
/// controller knows. `None` until the first successful `SGN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationChannelState {
    speed: Option<IntegratorSpeed>,
}

impl IntegrationChannelState {
    pub fn speed(&self) -> Option<IntegratorSpeed> {
        self.speed
    }
}

impl<C: CommandChannel> TimingController<C> {
    /// Apply a new integration time together with `gain`.
    ///
    /// Selects the integrator speed from `time_us`, sends `SGN` and then
    /// `CIT`. If `SGN` fails, `CIT` is not sent and the failure comes back
    /// wrapped in [`TimingError::DependencyAborted`]. If `CIT` fails, the gain
    /// and speed already accepted by the board stay recorded.
    pub fn apply_integral_time_and_gain(&mut self, time_us: f64, gain: Gain) -> Result<()> {
        let encoding = encode_checked(time_us);
        let speed = IntegratorSpeed::for_integration_time(time_us);

        self.apply_gain_and_speed(gain, speed)
            .map_err(|e| TimingError::DependencyAborted {
                opcode: Opcode::Cit,
                source: Box::new(e),
            })?;
        self.integration.speed = Some(speed);
        self.params.gain = Some(gain);

        self.dispatcher
            .dispatch(Opcode::Cit, &[encoding.word.raw()])?;
        self.params.integration_time_us = Some(encoding.applied_us);
        tracing::info!(
            time_us = encoding.applied_us,
            %gain,
            ?speed,
            word = %encoding.word,
            "integration time applied"
        );
        Ok(())
    }

    /// Send `SGN` with `gain` and `speed`. Does not touch controller state;
    /// [`apply_integral_time_and_gain`](Self::apply_integral_time_and_gain)
    /// records the speed once the board accepts it.
    pub fn apply_gain_and_speed(&mut self, gain: Gain, speed: IntegratorSpeed) -> Result<()> {
        self.dispatcher
            .dispatch(Opcode::Sgn, &[gain.value(), speed.wire()])
    }
}
