//! Maps `Box<dyn Error>` from the channel boundary to typed `TimingError`.
//!
//! `ccd_traits::CommandChannel` reports transport failures as
//! `Box<dyn Error + Send + Sync>`; this module converts them to our typed error
//! enum, with an optional feature-gated path for `ccd_hardware::HwError`
//! downcasting.

use crate::error::TimingError;
use crate::protocol::Opcode;

/// Map a channel-boundary error for `opcode` to a typed `TimingError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_channel_error(opcode: Opcode, e: &(dyn std::error::Error + 'static)) -> TimingError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<ccd_hardware::error::HwError>() {
            return match hw {
                ccd_hardware::error::HwError::Timeout => TimingError::Timeout { opcode },
                other => TimingError::Channel {
                    opcode,
                    message: other.to_string(),
                },
            };
        }
    }

    let message = e.to_string();
    if message.to_lowercase().contains("timeout") {
        TimingError::Timeout { opcode }
    } else {
        TimingError::Channel { opcode, message }
    }
}
