//! One feed event as exchanged with the feed service.

use jiff::Timestamp;
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use super::feed::{FeedId, FeedReference};

/// Opaque JSON payload carried under `data`.
///
/// Kept as the exact JSON text it was read from or built with, so it is
/// written back byte for byte and never folded into metadata.
#[derive(Debug, Clone)]
pub struct ActivityData(Box<RawValue>);

impl ActivityData {
    pub fn from_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<ActivityData> {
        Ok(ActivityData(serde_json::value::to_raw_value(value)?))
    }
    pub fn from_json(json: impl Into<String>) -> serde_json::Result<ActivityData> {
        Ok(ActivityData(RawValue::from_string(json.into())?))
    }
    pub fn get(&self) -> &str {
        self.0.get()
    }
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::from_str(self.0.get())
    }
    pub(crate) fn as_raw(&self) -> &RawValue {
        &self.0
    }
}

impl From<Box<RawValue>> for ActivityData {
    fn from(value: Box<RawValue>) -> Self {
        ActivityData(value)
    }
}

impl PartialEq for ActivityData {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl Eq for ActivityData {}

/// A feed activity.
///
/// `actor`, `verb` and `object` are expected by the service but not enforced
/// here. Every wire field that is not one of the named fields lands in
/// `metadata`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activity {
    /// Assigned by the service, empty until then.
    pub id: String,
    pub actor: String,
    pub verb: String,
    pub object: String,
    pub target: String,
    /// Feed the activity was read from. Only meaningful on read.
    pub origin: FeedId,
    /// `None` is stamped with the current time when encoded.
    pub timestamp: Option<Timestamp>,
    /// Caller supplied key used to correlate or deduplicate writes.
    pub foreign_id: String,
    pub data: Option<ActivityData>,
    pub metadata: Map<String, Value>,
    pub to: Vec<FeedReference>,
}

impl Activity {
    pub fn new(
        actor: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Activity {
        Activity {
            actor: actor.into(),
            verb: verb.into(),
            object: object.into(),
            ..Default::default()
        }
    }
    pub fn with_id(self, id: impl Into<String>) -> Activity {
        Activity {
            id: id.into(),
            ..self
        }
    }
    pub fn with_target(self, target: impl Into<String>) -> Activity {
        Activity {
            target: target.into(),
            ..self
        }
    }
    pub fn with_origin(self, origin: impl Into<FeedId>) -> Activity {
        Activity {
            origin: origin.into(),
            ..self
        }
    }
    pub fn with_timestamp(self, timestamp: Timestamp) -> Activity {
        Activity {
            timestamp: Some(timestamp),
            ..self
        }
    }
    pub fn with_foreign_id(self, foreign_id: impl Into<String>) -> Activity {
        Activity {
            foreign_id: foreign_id.into(),
            ..self
        }
    }
    pub fn with_data(self, data: ActivityData) -> Activity {
        Activity {
            data: Some(data),
            ..self
        }
    }
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Activity {
        self.metadata.insert(key.into(), value.into());
        self
    }
    /// Adds a destination feed.
    pub fn send_to(mut self, feed: impl Into<FeedReference>) -> Activity {
        self.to.push(feed.into());
        self
    }
}
