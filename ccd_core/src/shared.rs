//! Serialized access to one command bus from several owners.

use std::sync::{Arc, Mutex};

use ccd_traits::CommandChannel;

/// Cloneable handle to a channel behind a mutex.
///
/// The lock is held for exactly one `send`, i.e. one command and its reply.
/// The board handles one command at a time, so finer locking buys nothing.
#[derive(Debug)]
pub struct SharedChannel<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedChannel<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: CommandChannel> SharedChannel<C> {
    pub fn new(channel: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(channel)),
        }
    }

    /// Run `f` with the channel locked, e.g. to inspect a simulator.
    pub fn with_channel<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        self.inner.lock().ok().map(|guard| f(&guard))
    }
}

impl<C: CommandChannel> CommandChannel for SharedChannel<C> {
    fn send(
        &mut self,
        target: u32,
        opcode: u32,
        args: &[u32],
    ) -> Result<u32, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| std::io::Error::other("command channel lock poisoned"))?;
        guard.send(target, opcode, args)
    }
}
