//! Fixed pool of equally sized response blocks.
//!
//! The whole pool is reserved once as a single contiguous region. Blocks are
//! claimed and relinquished per request through a bitmap; memory is only
//! returned to the allocator when the arena is dropped. The block count is a
//! hard ceiling on in-flight responses.

use crate::error::ChannelError;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Upper bound on blocks, one per bit of the status word.
pub const MAX_BLOCKS: usize = u64::BITS as usize;

/// Opaque claim on one block. A handle goes stale once relinquished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    index: usize,
    generation: u32,
}

impl BlockHandle {
    pub fn index(&self) -> usize {
        self.index
    }
}

struct ArenaState {
    status: u64,
    generations: Vec<u32>,
    region: Vec<u8>,
}

pub struct BufferArena {
    blocks: usize,
    block_size: usize,
    state: Mutex<ArenaState>,
}

impl BufferArena {
    /// Reserves `blocks * block_size` bytes up front.
    pub fn allocate(blocks: usize, block_size: usize) -> Result<Self, ChannelError> {
        if blocks == 0 || blocks > MAX_BLOCKS || block_size == 0 {
            return Err(ChannelError::ConfigError(format!(
                "invalid arena geometry: {} blocks of {} bytes",
                blocks, block_size
            )));
        }

        let total = blocks
            .checked_mul(block_size)
            .ok_or(ChannelError::ArenaAllocation(usize::MAX))?;

        let mut region = Vec::new();
        region
            .try_reserve_exact(total)
            .map_err(|_| ChannelError::ArenaAllocation(total))?;
        region.resize(total, 0);

        debug!(blocks, block_size, total, "Response arena allocated");

        Ok(BufferArena {
            blocks,
            block_size,
            state: Mutex::new(ArenaState {
                status: 0,
                generations: vec![0; blocks],
                region,
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.blocks
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Claims the lowest free block, or `None` when every block is in use.
    pub fn claim(&self) -> Option<BlockHandle> {
        let mut state = self.state.lock();
        let index = (!state.status).trailing_zeros() as usize;
        if index >= self.blocks {
            warn!(capacity = self.blocks, "Response arena exhausted");
            return None;
        }

        state.status |= 1 << index;
        let generation = state.generations[index];
        debug!(index, generation, "Claimed response block");
        Some(BlockHandle { index, generation })
    }

    /// Frees the block behind `handle`. Stale handles are ignored and return false.
    pub fn relinquish(&self, handle: BlockHandle) -> bool {
        let mut state = self.state.lock();
        if !Self::is_live(&state, handle) {
            debug!(index = handle.index, "Ignoring stale block handle");
            return false;
        }

        state.status &= !(1 << handle.index);
        state.generations[handle.index] = state.generations[handle.index].wrapping_add(1);
        debug!(index = handle.index, "Relinquished response block");
        true
    }

    /// Copies `bytes` into the block at `offset`, refusing to cross the block boundary.
    pub fn write(&self, handle: BlockHandle, offset: usize, bytes: &[u8]) -> Result<(), ChannelError> {
        let end = offset
            .checked_add(bytes.len())
            .filter(|end| *end <= self.block_size)
            .ok_or(ChannelError::ResponseTooLarge(self.block_size))?;

        let mut state = self.state.lock();
        if !Self::is_live(&state, handle) {
            return Err(ChannelError::HttpError(format!(
                "write to unclaimed response block {}",
                handle.index
            )));
        }

        let base = handle.index * self.block_size;
        state.region[base + offset..base + end].copy_from_slice(bytes);
        Ok(())
    }

    /// Copies the first `len` bytes of the block out, if the handle is still live.
    ///
    /// The lock is held only for the copy; callers parse the returned buffer.
    pub fn copy_out(&self, handle: BlockHandle, len: usize) -> Option<Vec<u8>> {
        let state = self.state.lock();
        if !Self::is_live(&state, handle) || len > self.block_size {
            return None;
        }
        let base = handle.index * self.block_size;
        Some(state.region[base..base + len].to_vec())
    }

    pub fn is_claimed(&self, index: usize) -> bool {
        index < self.blocks && self.state.lock().status & (1 << index) != 0
    }

    pub fn in_use(&self) -> usize {
        self.state.lock().status.count_ones() as usize
    }

    /// Raw status word: bit `i` set means block `i` is claimed.
    pub fn status(&self) -> u64 {
        self.state.lock().status
    }

    fn is_live(state: &ArenaState, handle: BlockHandle) -> bool {
        handle.index < state.generations.len()
            && state.status & (1 << handle.index) != 0
            && state.generations[handle.index] == handle.generation
    }
}
