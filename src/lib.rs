pub mod cache;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fetcher;
pub mod proto;
pub mod resolver;
pub mod server;
pub mod upstream;

pub use cache::{CacheKey, TtlCache};
pub use config::{CacheTtls, Config, HostTemplate};
pub use dispatcher::Dispatcher;
pub use error::{ResolveError, UpstreamError};
