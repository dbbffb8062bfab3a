//! Blocking client for the region-partitioned League of Legends REST API.
//!
//! Every call goes through a [`Channel`]: it renders the request URL, attaches
//! the `X-Riot-Token` header, streams the body into a fixed pool of response
//! blocks and classifies the HTTP status. The pool size caps how many
//! responses can be held at once.

pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod rate_limit;

pub use api::client::RiotApiClient;
pub use api::endpoints::{ApiCategory, Region};
pub use api::models::Summoner;
pub use channel::request::{Request, Response};
pub use channel::transport::{Transport, UreqTransport};
pub use channel::Channel;
pub use config::{ArenaConfig, Config};
pub use error::{classify, ChannelError, ErrorKind};
pub use rate_limit::RateLimits;
