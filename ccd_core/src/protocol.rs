//! Timing-board opcodes and reply interpretation.

use core::fmt;

use ccd_traits::protocol::{DON, ascii_code, ascii_letters};

/// Commands addressed to the timing board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Set integration time.
    Cit,
    /// Set gain and integrator speed.
    Sgn,
    /// Pre-pedestal settle wait.
    Cpr,
    /// Pre-signal settle wait.
    Cpo,
    /// Dump-gate width.
    Dgw,
    /// Output-gate width.
    Ogw,
    /// Reset-gate width (skipping readout).
    Rsw,
    /// Summing-well width.
    Sww,
    /// Test data link; the board echoes the argument.
    Tdl,
}

impl Opcode {
    pub const ALL: [Opcode; 9] = [
        Opcode::Cit,
        Opcode::Sgn,
        Opcode::Cpr,
        Opcode::Cpo,
        Opcode::Dgw,
        Opcode::Ogw,
        Opcode::Rsw,
        Opcode::Sww,
        Opcode::Tdl,
    ];

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Cit => "CIT",
            Opcode::Sgn => "SGN",
            Opcode::Cpr => "CPR",
            Opcode::Cpo => "CPO",
            Opcode::Dgw => "DGW",
            Opcode::Ogw => "OGW",
            Opcode::Rsw => "RSW",
            Opcode::Sww => "SWW",
            Opcode::Tdl => "TDL",
        }
    }

    /// Wire value: the mnemonic packed as three ASCII bytes.
    pub const fn code(self) -> u32 {
        let m = self.mnemonic().as_bytes();
        ascii_code([m[0], m[1], m[2]])
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// True only for the exact `DON` sentinel.
#[inline]
pub const fn is_done(reply: u32) -> bool {
    reply == DON
}

/// Render a reply for diagnostics: its ASCII mnemonic when it has one.
pub fn describe_reply(reply: u32) -> String {
    match ascii_letters(reply) {
        Some(letters) => format!(
            "{reply:#010x} ({})",
            String::from_utf8_lossy(&letters)
        ),
        None => format!("{reply:#010x}"),
    }
}
