use thiserror::Error;

use crate::protocol::Opcode;

/// Failure of a hardware-facing timing operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// The board answered with something other than `DON`.
    #[error("{opcode} rejected by the timing board (reply {reply:#010x})")]
    CommandFailed { opcode: Opcode, reply: u32 },
    /// A prerequisite command failed, so `opcode` was never sent.
    #[error("{opcode} not sent: {source}")]
    DependencyAborted {
        opcode: Opcode,
        source: Box<TimingError>,
    },
    /// The command channel itself failed before a reply arrived.
    #[error("{opcode}: command channel error: {message}")]
    Channel { opcode: Opcode, message: String },
    #[error("{opcode}: timeout waiting for reply")]
    Timeout { opcode: Opcode },
}

impl TimingError {
    /// Opcode of the command this error is reported against.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::CommandFailed { opcode, .. }
            | Self::DependencyAborted { opcode, .. }
            | Self::Channel { opcode, .. }
            | Self::Timeout { opcode } => *opcode,
        }
    }

    /// Raw device reply, when the failure was a rejected command.
    pub fn reply(&self) -> Option<u32> {
        match self {
            Self::CommandFailed { reply, .. } => Some(*reply),
            Self::DependencyAborted { source, .. } => source.reply(),
            _ => None,
        }
    }
}

/// Rejected input while building settings from untyped values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("gain must be one of 1, 2, 5 or 10, got {0}")]
    InvalidGain(u32),
    #[error("{field} must be a finite, non-negative duration in us, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, TimingError>;
