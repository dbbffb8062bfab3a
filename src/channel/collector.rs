use super::arena::{BlockHandle, BufferArena};
use super::request::Response;
use crate::error::ChannelError;
use tracing::warn;

/// Accumulates one transfer's body into a claimed arena block.
///
/// The block is claimed on the first chunk. If the collector is dropped
/// without being turned into a [`Response`], the block is relinquished.
pub struct ResponseCollector<'a> {
    arena: &'a BufferArena,
    handle: Option<BlockHandle>,
    len: usize,
}

impl<'a> ResponseCollector<'a> {
    pub fn new(arena: &'a BufferArena) -> Self {
        ResponseCollector {
            arena,
            handle: None,
            len: 0,
        }
    }

    /// Appends one chunk. Any error aborts the transfer as a whole.
    pub fn receive(&mut self, chunk: &[u8]) -> Result<(), ChannelError> {
        if chunk.is_empty() {
            return Ok(());
        }

        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = self
                    .arena
                    .claim()
                    .ok_or(ChannelError::TooManyConcurrent(self.arena.capacity()))?;
                self.handle = Some(handle);
                handle
            }
        };

        if let Err(e) = self.arena.write(handle, self.len, chunk) {
            warn!(
                received = self.len + chunk.len(),
                block_size = self.arena.block_size(),
                "Response does not fit in its block"
            );
            return Err(e);
        }
        self.len += chunk.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn into_response(mut self, status: u16) -> Response<'a> {
        let handle = self.handle.take();
        Response::new(self.arena, handle, self.len, status)
    }
}

impl Drop for ResponseCollector<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.arena.relinquish(handle);
        }
        self.len = 0;
    }
}
