use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DecodeError;
use crate::model::{Activity, ActivityData, FeedId, FeedReference};

use super::time::parse_time;

/// Reads one activity from its wire form.
///
/// Only an unreadable envelope is an error. Malformed fields fall back to
/// their defaults.
pub fn decode(bytes: &[u8]) -> Result<Activity, DecodeError> {
    serde_json::from_slice(bytes).map_err(DecodeError::Json)
}

/// Reads the activities of a `{"results": [...]}` response.
pub fn decode_many(bytes: &[u8]) -> Result<Vec<Activity>, DecodeError> {
    #[derive(Deserialize)]
    struct Results {
        #[serde(default)]
        results: Vec<Activity>,
    }
    let Results { results } = serde_json::from_slice(bytes).map_err(DecodeError::Json)?;
    Ok(results)
}

/// Only JSON deserializers are supported, `data` is kept as raw JSON text.
impl<'de> Deserialize<'de> for Activity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = BTreeMap::<String, Box<RawValue>>::deserialize(deserializer)?;
        Ok(from_wire_fields(fields))
    }
}

fn from_wire_fields(fields: BTreeMap<String, Box<RawValue>>) -> Activity {
    let mut activity = Activity::default();
    let mut metadata = Map::new();

    for (key, raw) in fields {
        if raw.get().trim() == "null" {
            continue;
        }
        match fold_key(&key).as_str() {
            "id" => activity.id = string_field(&raw),
            "actor" => activity.actor = string_field(&raw),
            "verb" => activity.verb = string_field(&raw),
            "foreign_id" => activity.foreign_id = string_field(&raw),
            "object" => activity.object = string_field(&raw),
            "origin" => activity.origin = FeedId::new(string_field(&raw)),
            "target" => activity.target = string_field(&raw),
            "time" => activity.timestamp = time_field(&raw),
            "data" => activity.data = Some(ActivityData::from(raw)),
            "to" => activity.to = to_field(&raw),
            _ => match serde_json::from_str::<Value>(raw.get()) {
                Ok(value) => {
                    metadata.insert(key, value);
                }
                Err(error) => {
                    debug!(target: "wire", %key, %error, "dropping unreadable metadata value");
                }
            },
        }
    }

    activity.metadata = metadata;
    activity
}

/// Lower-cases one char at a time, so `İ` folds to `i` rather than to `i`
/// followed by a combining dot.
fn fold_key(key: &str) -> String {
    key.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Anything but a JSON string reads as the empty string.
fn string_field(raw: &RawValue) -> String {
    serde_json::from_str(raw.get()).unwrap_or_default()
}

fn time_field(raw: &RawValue) -> Option<Timestamp> {
    let time: String = serde_json::from_str(raw.get()).ok()?;
    let timestamp = parse_time(&time);
    if timestamp.is_none() {
        debug!(target: "wire", %time, "ignoring unparseable activity time");
    }
    timestamp
}

/// Accepts `["slug:id", "slug:id token"]` as well as
/// `[["slug:id", "token"], ["slug:id"]]`.
fn to_field(raw: &RawValue) -> Vec<FeedReference> {
    let flat = match serde_json::from_str::<Vec<String>>(raw.get()) {
        Ok(flat) => flat,
        Err(_) => match serde_json::from_str::<Vec<Vec<String>>>(raw.get()) {
            Ok(nested) => nested
                .into_iter()
                .filter_map(|to| match to.as_slice() {
                    [feed, token] => Some(format!("{feed} {token}")),
                    [feed] => Some(feed.clone()),
                    _ => None,
                })
                .collect(),
            Err(error) => {
                debug!(target: "wire", %error, "ignoring unrecognized to field");
                vec![]
            }
        },
    };

    let mut feeds = vec![];
    for to in &flat {
        let matched = FeedReference::parse_all(to);
        if matched.is_empty() {
            debug!(target: "wire", %to, "dropping unmatched destination");
        }
        feeds.extend(matched);
    }
    feeds
}
