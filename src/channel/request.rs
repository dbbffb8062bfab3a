use super::arena::{BlockHandle, BufferArena};
use super::args::ArgumentList;
use crate::api::endpoints::{ApiCategory, Region};
use crate::error::ChannelError;
use serde::de::DeserializeOwned;

/// Everything needed to address one API call.
#[derive(Debug, Clone)]
pub struct Request {
    pub region: Region,
    pub api: ApiCategory,
    pub path: ArgumentList,
    pub query: ArgumentList,
    status: Option<u16>,
}

impl Request {
    pub fn new(region: Region, api: ApiCategory) -> Self {
        Request {
            region,
            api,
            path: ArgumentList::new(),
            query: ArgumentList::new(),
            status: None,
        }
    }

    pub fn path(mut self, value: impl Into<String>) -> Self {
        self.path.add_path(value);
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.add_query(key, value);
        self
    }

    /// Status of the last completed transfer for this request.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    pub(crate) fn free_arguments(&mut self) {
        self.path.free_all();
        self.query.free_all();
    }
}

/// A successful response body held in its arena block.
///
/// The block is relinquished when the response is dropped.
pub struct Response<'a> {
    arena: &'a BufferArena,
    handle: Option<BlockHandle>,
    len: usize,
    status: u16,
}

impl<'a> Response<'a> {
    pub(crate) fn new(arena: &'a BufferArena, handle: Option<BlockHandle>, len: usize, status: u16) -> Self {
        Response {
            arena,
            handle,
            len,
            status,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block(&self) -> Option<BlockHandle> {
        self.handle
    }

    /// Copy of the body. The arena is only locked for the copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.handle
            .and_then(|handle| self.arena.copy_out(handle, self.len))
            .unwrap_or_default()
    }

    pub fn text(&self) -> Result<String, ChannelError> {
        String::from_utf8(self.bytes()).map_err(|e| ChannelError::DecodeError(e.to_string()))
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ChannelError> {
        serde_json::from_slice(&self.bytes()).map_err(|e| ChannelError::JsonError(e.to_string()))
    }
}

impl Drop for Response<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.arena.relinquish(handle);
        }
        self.len = 0;
    }
}
