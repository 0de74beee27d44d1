mod activity;
mod feed;

pub use activity::{Activity, ActivityData};
pub use feed::{Feed, FeedId, FeedReference};

pub(crate) use feed::to_wire_string;
