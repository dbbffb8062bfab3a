//! The request channel: arena, token header, throttle and transport behind one
//! dispatch entry point.

pub mod arena;
pub mod args;
pub mod collector;
pub mod request;
pub mod token;
pub mod transport;
pub mod url;

use crate::config::Config;
use crate::error::{ChannelError, ErrorKind};
use crate::rate_limit::{RateLimits, Throttle};
use arena::BufferArena;
use collector::ResponseCollector;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use request::{Request, Response};
use token::TokenManager;
use tracing::{debug, info, warn};
use transport::{Transport, UreqTransport};

pub struct Channel<T: Transport = UreqTransport> {
    scheme: String,
    host: String,
    arena: BufferArena,
    tokens: RwLock<TokenManager>,
    rate_limits: RwLock<RateLimits>,
    throttle: RwLock<Option<Arc<Throttle>>>,
    transport: T,
    last_error: Mutex<ErrorKind>,
}

impl Channel<UreqTransport> {
    /// Builds a channel backed by `ureq`.
    pub fn new(config: Config) -> Result<Self, ChannelError> {
        let transport = UreqTransport::new(&config)?;
        Channel::with_transport(config, transport)
    }
}

impl<T: Transport> Channel<T> {
    pub fn with_transport(config: Config, transport: T) -> Result<Self, ChannelError> {
        config.validate()?;

        let arena = BufferArena::allocate(config.arena.blocks, config.arena.block_size)?;
        let throttle = if config.enforce_rate_limits {
            Some(Arc::new(Throttle::new(config.rate_limits)?))
        } else {
            None
        };

        let mut tokens = TokenManager::new();
        if let Some(key) = config.api_key.as_deref() {
            tokens.update(key)?;
        }

        info!(
            host = %config.host,
            blocks = config.arena.blocks,
            block_size = config.arena.block_size,
            enforce_rate_limits = config.enforce_rate_limits,
            "Request channel ready"
        );

        Ok(Channel {
            scheme: config.scheme,
            host: config.host,
            arena,
            tokens: RwLock::new(tokens),
            rate_limits: RwLock::new(config.rate_limits),
            throttle: RwLock::new(throttle),
            transport,
            last_error: Mutex::new(ErrorKind::None),
        })
    }

    /// Installs a new API key. A key of the wrong length leaves the current one in place.
    pub fn set_api_key(&self, key: &str) -> Result<(), ChannelError> {
        self.tokens.write().update(key)
    }

    pub fn has_credential(&self) -> bool {
        self.tokens.read().is_set()
    }

    pub fn set_max_requests(&self, per_second: u16, per_two_minutes: u16) -> Result<(), ChannelError> {
        let limits = RateLimits::new(per_second, per_two_minutes)?;
        let mut throttle = self.throttle.write();
        if throttle.is_some() {
            *throttle = Some(Arc::new(Throttle::new(limits)?));
        }
        *self.rate_limits.write() = limits;
        Ok(())
    }

    pub fn rate_limits(&self) -> RateLimits {
        *self.rate_limits.read()
    }

    /// Outcome of the most recent dispatch.
    pub fn last_error(&self) -> ErrorKind {
        *self.last_error.lock()
    }

    pub fn arena(&self) -> &BufferArena {
        &self.arena
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url_for(&self, request: &Request) -> String {
        url::format_url(&self.scheme, &self.host, request)
    }

    /// Sends `request` and returns its body on HTTP 200.
    ///
    /// The request's arguments are released on every path. On failure the
    /// response block is released before returning.
    pub fn dispatch(&self, request: &mut Request) -> Result<Response<'_>, ChannelError> {
        let result = self.perform(request);
        request.free_arguments();

        let kind = match &result {
            Ok(_) => ErrorKind::None,
            Err(e) => e.kind(),
        };
        *self.last_error.lock() = kind;
        result
    }

    fn perform(&self, request: &mut Request) -> Result<Response<'_>, ChannelError> {
        let header = self.tokens.read().header()?.clone();

        // Never sleep while holding the throttle lock.
        let throttle = self.throttle.read().clone();
        if let Some(throttle) = throttle {
            throttle.acquire();
        }

        let url = self.url_for(request);
        debug!(region = %request.region, api = %request.api, %url, "Dispatching request");

        let mut collector = ResponseCollector::new(&self.arena);
        let status = self
            .transport
            .perform(&url, &header, &mut |chunk: &[u8]| collector.receive(chunk))?;
        request.set_status(status);

        match ChannelError::from_status(status, &url) {
            None => {
                debug!(status, bytes = collector.len(), "Request succeeded");
                Ok(collector.into_response(status))
            }
            Some(e) => {
                warn!(status, %url, "Request failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints::{ApiCategory, Region};
    use crate::channel::token::{Header, API_KEY_LENGTH};
    use crate::channel::transport::ChunkSink;
    use crate::config::ArenaConfig;

    struct Canned {
        status: u16,
        body: &'static [u8],
    }

    impl Transport for Canned {
        fn perform(&self, _url: &str, _header: &Header, sink: &mut ChunkSink<'_>) -> Result<u16, ChannelError> {
            for chunk in self.body.chunks(3) {
                sink(chunk)?;
            }
            Ok(self.status)
        }
    }

    fn key() -> String {
        "k".repeat(API_KEY_LENGTH)
    }

    fn channel(status: u16, body: &'static [u8]) -> Channel<Canned> {
        let config = Config {
            arena: ArenaConfig { blocks: 2, block_size: 64 },
            ..Config::default()
        }
        .with_api_key(key());
        Channel::with_transport(config, Canned { status, body }).unwrap()
    }

    #[test]
    fn success_keeps_block_until_response_dropped() {
        let channel = channel(200, b"{\"id\":7}");
        let mut request = Request::new(Region::Na, ApiCategory::Summoner).path("summoners").path("7");

        let response = channel.dispatch(&mut request).unwrap();
        assert_eq!(response.text().unwrap(), "{\"id\":7}");
        assert_eq!(channel.arena().in_use(), 1);
        assert_eq!(channel.last_error(), ErrorKind::None);
        assert_eq!(request.status(), Some(200));
        assert!(request.path.is_empty());

        drop(response);
        assert_eq!(channel.arena().in_use(), 0);
    }

    #[test]
    fn error_status_releases_everything() {
        let channel = channel(404, b"{\"status\":404}");
        let mut request = Request::new(Region::Na, ApiCategory::Summoner)
            .path("summoners")
            .query("a", "b");

        let err = channel.dispatch(&mut request).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(channel.last_error(), ErrorKind::NotFound);
        assert_eq!(channel.arena().in_use(), 0);
        assert!(request.path.is_empty() && request.query.is_empty());
    }

    #[test]
    fn last_error_is_overwritten_each_dispatch() {
        let failing = channel(429, b"");
        assert!(failing.dispatch(&mut Request::new(Region::Na, ApiCategory::League)).is_err());
        assert_eq!(failing.last_error(), ErrorKind::RateLimited);

        let ok = channel(200, b"[]");
        assert!(ok.dispatch(&mut Request::new(Region::Na, ApiCategory::League)).is_ok());
        assert_eq!(ok.last_error(), ErrorKind::None);
    }

    #[test]
    fn rate_limit_setter_validates() {
        let channel = channel(200, b"");
        channel.set_max_requests(10, 50).unwrap();
        assert_eq!(channel.rate_limits(), RateLimits::new(10, 50).unwrap());
        assert!(channel.set_max_requests(0, 50).is_err());
        assert_eq!(channel.rate_limits().per_second, 10);
    }

    #[test]
    fn invalid_utf8_body_is_decode_error() {
        let channel = channel(200, &[0xff, 0xfe, 0xfd]);
        let response = channel.dispatch(&mut Request::new(Region::Na, ApiCategory::Status)).unwrap();
        assert!(matches!(response.text(), Err(ChannelError::DecodeError(_))));
        assert_eq!(response.bytes(), [0xffu8, 0xfe, 0xfd]);
    }

    #[test]
    fn limit_update_does_not_wait_for_throttled_dispatch() {
        let config = Config {
            enforce_rate_limits: true,
            ..Config::default()
        }
        .with_api_key(key());
        let channel = Channel::with_transport(config, Canned { status: 200, body: b"" }).unwrap();
        channel.set_max_requests(1, 100).unwrap();
        channel.dispatch(&mut Request::new(Region::Na, ApiCategory::Status)).unwrap();

        std::thread::scope(|scope| {
            // Second call within the same second sleeps in the throttle.
            scope.spawn(|| {
                channel.dispatch(&mut Request::new(Region::Na, ApiCategory::Status)).unwrap();
            });
            std::thread::sleep(std::time::Duration::from_millis(100));

            let start = std::time::Instant::now();
            channel.set_max_requests(5, 100).unwrap();
            assert!(start.elapsed() < std::time::Duration::from_millis(300));
        });
        assert_eq!(channel.rate_limits().per_second, 5);
    }

    #[test]
    fn url_uses_configured_host() {
        let channel = channel(200, b"");
        let request = Request::new(Region::Na, ApiCategory::Summoner).path("21748566");
        assert_eq!(
            channel.url_for(&request),
            "https://na1.api.riotgames.com/lol/summoner/v3/21748566"
        );
    }
}
