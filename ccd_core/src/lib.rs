#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Timing-generator control core (hardware-agnostic).
//!
//! Converts microsecond durations into the timing board's 24-bit timing
//! words and applies them, with the integrator gain and speed, through a
//! `ccd_traits::CommandChannel`.
//!
//! ## Architecture
//!
//! - **Encoding**: duration → timing word (`timing` module)
//! - **Dispatch**: one command, one reply, `DON` or failure (`dispatch` module)
//! - **Integration channel**: `SGN` then `CIT`, speed derived from time (`integration` module)
//! - **Clock widths / settle waits**: `CPR CPO DGW OGW RSW SWW` (`appliers` module)
//! - **Batch upload**: full timing set in a fixed order (`settings` module)
//! - **Shared bus**: mutex-serialized channel handle (`shared` module)

pub mod appliers;
pub mod controller;
pub mod conversions;
pub mod dispatch;
pub mod error;
pub mod hw_error;
pub mod integration;
pub mod mocks;
pub mod protocol;
pub mod settings;
pub mod shared;
pub mod timing;

pub use appliers::TimingParameter;
pub use controller::{DeviceParams, TimingController};
pub use dispatch::{Dispatcher, check_reply};
pub use error::{Result, SettingsError, TimingError};
pub use integration::{Gain, IntegrationChannelState, IntegratorSpeed};
pub use protocol::Opcode;
pub use settings::TimingSettings;
pub use shared::SharedChannel;
pub use timing::{Encoding, RangeClamped, TimingUnit, TimingWord, encode, encode_checked};
