//! Test and helper mocks for ccd_core

use std::collections::HashMap;

use ccd_traits::CommandChannel;
use ccd_traits::protocol::DON;

use crate::protocol::Opcode;

/// One command as observed by [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    pub target: u32,
    pub opcode: u32,
    pub args: Vec<u32>,
}

impl SentCommand {
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_code(self.opcode)
    }
}

/// A channel that records every command and answers from a script.
///
/// Unscripted opcodes get `DON`, except `TDL`, which echoes its argument.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Vec<SentCommand>,
    replies: HashMap<u32, u32>,
    transport_errors: HashMap<u32, String>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `opcode` command with `reply`.
    pub fn reply_to(mut self, opcode: Opcode, reply: u32) -> Self {
        self.set_reply(opcode, reply);
        self
    }

    /// Change the scripted reply mid-test.
    pub fn set_reply(&mut self, opcode: Opcode, reply: u32) {
        self.replies.insert(opcode.code(), reply);
    }

    /// Fail every `opcode` command at the transport level with `message`.
    pub fn transport_error_on(mut self, opcode: Opcode, message: &str) -> Self {
        self.transport_errors
            .insert(opcode.code(), message.to_string());
        self
    }

    pub fn sent(&self) -> &[SentCommand] {
        &self.sent
    }

    /// Opcodes sent so far, in order. Unknown codes are skipped.
    pub fn opcodes(&self) -> Vec<Opcode> {
        self.sent.iter().filter_map(SentCommand::opcode).collect()
    }
}

impl CommandChannel for RecordingChannel {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>> {
        self.sent.push(SentCommand {
            target,
            opcode,
            args: args.to_vec(),
        });
        if let Some(message) = self.transport_errors.get(&opcode) {
            return Err(message.clone().into());
        }
        if let Some(reply) = self.replies.get(&opcode) {
            return Ok(*reply);
        }
        if opcode == Opcode::Tdl.code() {
            return Ok(args.first().copied().unwrap_or(0));
        }
        Ok(DON)
    }
}
