//! Encoding and decoding of feed activities for the feed service's JSON API.
//!
//! The wire format differs from a plain serde mapping in a few ways:
//!
//! * fields without a counterpart on [`Activity`] are collected into
//!   [`Activity::metadata`], matching known names case-insensitively;
//! * destination feeds are written as `slug:id` or `slug:id token` strings and
//!   read from either a flat list of those or a list of `[feed, token]` pairs;
//! * `time` uses `YYYY-MM-DDTHH:MM:SS.ffffff` without an offset and defaults
//!   to the current time when an activity has none.

mod clock;
mod error;
mod model;
mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DecodeError, EncodeError, FeedParseError};
pub use model::{Activity, ActivityData, Feed, FeedId, FeedReference};
pub use wire::{Encoder, decode, decode_many, encode};
