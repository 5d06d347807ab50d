//! hrefkit URL parsing, building and manipulation
//!
//! [`Uri`] is a mutable URL value: components are read and written through
//! accessors, the string form is rebuilt lazily, and normalization,
//! resolution and comparison work on whole values. [`parse`] and [`build`]
//! expose the underlying split/join on plain [`Parts`].

mod codec;
mod error;
mod find;
pub mod host;
mod parts;
pub mod path;
mod query;
mod resolve;
mod uri;

pub use codec::{Charset, Codec};
pub use error::{ErrorKind, UriError};
pub use find::{urls_in, within_string};
pub use host::ensure_valid_hostname;
pub use parts::{build, parse, Parts};
pub use path::{common_path, remove_dot_segments};
pub use query::{QueryMap, QueryValue};
pub use uri::Uri;

/// Result type for URL operations
pub type Result<T> = std::result::Result<T, UriError>;
