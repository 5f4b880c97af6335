pub mod error;

use ccd_traits::CommandChannel;
use ccd_traits::protocol::{DON, ERR, TIM_ID, ascii_code};
use std::collections::BTreeMap;

use crate::error::HwError;

/// Test data link: the board echoes the single argument back as the reply.
pub const TDL: u32 = ascii_code(*b"TDL");

/// Timing-board opcodes the simulator accepts, with their argument counts.
const TIMING_OPCODES: [([u8; 3], usize); 8] = [
    (*b"CIT", 1),
    (*b"SGN", 2),
    (*b"CPR", 1),
    (*b"CPO", 1),
    (*b"DGW", 1),
    (*b"OGW", 1),
    (*b"RSW", 1),
    (*b"SWW", 1),
];

const VALID_GAINS: [u32; 4] = [1, 2, 5, 10];

/// In-process stand-in for the timing-generator board.
///
/// Accepts the timing opcodes, stores the last arguments per opcode in a
/// register file and answers `DON`. Malformed commands (unknown opcode, wrong
/// argument count, gain outside {1, 2, 5, 10}, speed outside {0, 1}) are
/// answered with `ERR` and leave the register file untouched, like the DSP
/// firmware does.
#[derive(Debug, Default)]
pub struct SimulatedTimingBoard {
    registers: BTreeMap<u32, Vec<u32>>,
    history: Vec<(u32, Vec<u32>)>,
    fail_opcodes: Vec<u32>,
    timeout: bool,
}

impl SimulatedTimingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `ERR` to every future command carrying `opcode`.
    pub fn fail_on(mut self, opcode: u32) -> Self {
        self.fail_opcodes.push(opcode);
        self
    }

    /// Make every future command time out at the transport level.
    pub fn with_timeout(mut self, timeout: bool) -> Self {
        self.timeout = timeout;
        self
    }

    /// Last arguments accepted for `opcode`, if any.
    pub fn register(&self, opcode: u32) -> Option<&[u32]> {
        self.registers.get(&opcode).map(Vec::as_slice)
    }

    /// Every command that reached the board, in arrival order.
    pub fn history(&self) -> &[(u32, Vec<u32>)] {
        &self.history
    }

    fn accepts(opcode: u32, args: &[u32]) -> bool {
        let Some(&(_, argc)) = TIMING_OPCODES
            .iter()
            .find(|(letters, _)| ascii_code(*letters) == opcode)
        else {
            return false;
        };
        if args.len() != argc {
            return false;
        }
        if opcode == ascii_code(*b"SGN") {
            return VALID_GAINS.contains(&args[0]) && args[1] <= 1;
        }
        true
    }
}

impl CommandChannel for SimulatedTimingBoard {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>> {
        if self.timeout {
            tracing::warn!(opcode = %format!("{opcode:#08x}"), "simulated reply timeout");
            return Err(Box::new(HwError::Timeout));
        }
        if target != TIM_ID {
            return Err(Box::new(HwError::NoSuchBoard(target)));
        }
        self.history.push((opcode, args.to_vec()));

        if opcode == TDL {
            return Ok(args.first().copied().unwrap_or(0));
        }
        if self.fail_opcodes.contains(&opcode) || !Self::accepts(opcode, args) {
            tracing::debug!(opcode = %format!("{opcode:#08x}"), ?args, "simulated ERR");
            return Ok(ERR);
        }
        tracing::debug!(opcode = %format!("{opcode:#08x}"), ?args, "simulated DON");
        self.registers.insert(opcode, args.to_vec());
        Ok(DON)
    }
}
