//! Feedlinks core: the feed collection model and its JSON rendering. No IO.
mod feeds;
mod json;

pub use feeds::{FeedCollection, FeedKind};
pub use json::{AsciiFormatter, JsonStyle};
