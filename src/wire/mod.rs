//! JSON wire format of the feed service.

mod decode;
mod encode;
mod time;

pub use decode::{decode, decode_many};
pub use encode::{Encoder, encode};
