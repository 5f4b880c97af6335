//! Single-shot command dispatch with uniform reply checking.

use ccd_traits::CommandChannel;
use ccd_traits::protocol::TIM_ID;

use crate::error::{Result, TimingError};
use crate::hw_error::map_channel_error;
use crate::protocol::{Opcode, describe_reply, is_done};

/// Sends commands to one board and turns replies into `Result`s.
///
/// Every call is exactly one `send`: no retry, no batching. The caller blocks
/// until the channel returns.
#[derive(Debug)]
pub struct Dispatcher<C> {
    channel: C,
    target: u32,
}

impl<C: CommandChannel> Dispatcher<C> {
    /// Dispatcher addressing the timing board.
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            target: TIM_ID,
        }
    }

    /// Address a different board id.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Send `opcode` with `args`; succeed only on the `DON` reply.
    pub fn dispatch(&mut self, opcode: Opcode, args: &[u32]) -> Result<()> {
        let reply = self.send(opcode, args)?;
        check_reply(opcode, reply)
    }

    /// Send a test-data-link command and require the value echoed back.
    pub fn test_data_link(&mut self, value: u32) -> Result<()> {
        let reply = self.send(Opcode::Tdl, &[value])?;
        if reply == value {
            Ok(())
        } else {
            tracing::error!(
                expected = %format!("{value:#010x}"),
                reply = %describe_reply(reply),
                "test data link mismatch"
            );
            Err(TimingError::CommandFailed {
                opcode: Opcode::Tdl,
                reply,
            })
        }
    }

    fn send(&mut self, opcode: Opcode, args: &[u32]) -> Result<u32> {
        tracing::debug!(target_board = self.target, %opcode, ?args, "send");
        self.channel
            .send(self.target, opcode.code(), args)
            .map_err(|e| {
                let err = map_channel_error(opcode, e.as_ref());
                tracing::error!(%opcode, error = %err, "command channel failure");
                err
            })
    }
}

/// Interpret a reply to `opcode`. Anything other than the exact `DON`
/// sentinel is a failure carrying the raw reply.
pub fn check_reply(opcode: Opcode, reply: u32) -> Result<()> {
    if is_done(reply) {
        Ok(())
    } else {
        tracing::error!(%opcode, reply = %describe_reply(reply), "command rejected");
        Err(TimingError::CommandFailed { opcode, reply })
    }
}
