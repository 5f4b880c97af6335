pub mod protocol;

pub use protocol::{DON, ERR, TIM_ID};

/// Synchronous request/reply primitive to a controller board.
///
/// One call sends one command and blocks until the board replies. The reply
/// is returned verbatim; interpreting it is the caller's job. Transport
/// failures (driver errors, bus timeouts) are reported through `Err`.
pub trait CommandChannel {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).send(target, opcode, args)
    }
}

impl<C: CommandChannel + ?Sized> CommandChannel for &mut C {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).send(target, opcode, args)
    }
}
