//! hrefkit Core
//!
//! Configuration, logging setup and the [`Linker`], which applies one
//! configuration (charset, base URL, normalization policy) to URL work.

mod config;
mod error;
mod linker;

pub use config::Config;
pub use error::CoreError;
pub use linker::{Linker, UrlReport};

// Re-export the URL layer
pub use hrefkit_uri::{
    Charset, Codec, ErrorKind, Parts, QueryMap, QueryValue, Uri, UriError,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with `level` as the default filter; `RUST_LOG` wins.
///
/// Events go to stderr so they never mix with command output.
pub fn init_logging_with_level(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
