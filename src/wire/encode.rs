use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::error::EncodeError;
use crate::model::{Activity, to_wire_string};

use super::time::format_time;

/// Writes activities in the feed service's wire format.
///
/// Activities without a timestamp are stamped with the clock's current time.
#[derive(Debug, Clone, Default)]
pub struct Encoder<C = SystemClock> {
    clock: C,
}

impl Encoder<SystemClock> {
    pub fn new() -> Encoder<SystemClock> {
        Encoder { clock: SystemClock }
    }
}

impl<C: Clock> Encoder<C> {
    pub fn with_clock(clock: C) -> Encoder<C> {
        Encoder { clock }
    }
    pub fn encode(&self, activity: &Activity) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(&self.wire(activity)).map_err(EncodeError::Serialize)
    }
    pub fn to_value(&self, activity: &Activity) -> Result<Value, EncodeError> {
        serde_json::to_value(self.wire(activity)).map_err(EncodeError::Serialize)
    }
    fn wire<'a>(&self, activity: &'a Activity) -> WireActivity<'a> {
        let timestamp = activity.timestamp.unwrap_or_else(|| self.clock.now());
        WireActivity {
            activity,
            time: format_time(timestamp),
            to: activity.to.iter().map(|feed| to_wire_string(feed)).collect(),
        }
    }
}

/// Encodes `activity`, stamping it with the system time if it has none.
pub fn encode(activity: &Activity) -> Result<Vec<u8>, EncodeError> {
    Encoder::new().encode(activity)
}

struct WireActivity<'a> {
    activity: &'a Activity,
    time: String,
    to: Vec<String>,
}

impl Serialize for WireActivity<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let activity = self.activity;
        let has_id = !activity.id.is_empty();
        let has_target = !activity.target.is_empty();
        let has_foreign_id = !activity.foreign_id.is_empty();
        let has_to = !self.to.is_empty();

        let mut written = vec!["actor", "verb", "object", "origin", "time"];
        for (present, key) in [
            (has_id, "id"),
            (has_target, "target"),
            (has_foreign_id, "foreign_id"),
            (activity.data.is_some(), "data"),
            (has_to, "to"),
        ] {
            if present {
                written.push(key);
            }
        }

        let mut map = serializer.serialize_map(None)?;
        // Metadata is the base; named fields replace same-keyed entries.
        for (key, value) in &activity.metadata {
            if !written.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry("actor", &activity.actor)?;
        map.serialize_entry("verb", &activity.verb)?;
        map.serialize_entry("object", &activity.object)?;
        map.serialize_entry("origin", activity.origin.value())?;
        if has_id {
            map.serialize_entry("id", &activity.id)?;
        }
        if has_target {
            map.serialize_entry("target", &activity.target)?;
        }
        if let Some(data) = &activity.data {
            map.serialize_entry("data", data.as_raw())?;
        }
        if has_foreign_id {
            map.serialize_entry("foreign_id", &activity.foreign_id)?;
        }
        map.serialize_entry("time", &self.time)?;
        if has_to {
            map.serialize_entry("to", &self.to)?;
        }
        map.end()
    }
}

impl Serialize for Activity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Encoder::new().wire(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use jiff::Timestamp;
    use serde_json::{Value, json};

    use crate::clock::FixedClock;
    use crate::model::{Activity, ActivityData, FeedReference};
    use crate::wire::time::parse_time;

    use super::{Encoder, encode};

    fn fixed_encoder() -> Result<Encoder<FixedClock>> {
        let now: Timestamp = "2024-05-01T12:00:00.25Z".parse()?;
        Ok(Encoder::with_clock(FixedClock(now)))
    }

    #[test]
    fn encode_minimal_activity() -> Result<()> {
        let activity = Activity::new("user:eric", "post", "tweet:1");
        let value = fixed_encoder()?.to_value(&activity)?;
        assert_eq!(
            value,
            json!({
                "actor": "user:eric",
                "verb": "post",
                "object": "tweet:1",
                "origin": "",
                "time": "2024-05-01T12:00:00.25"
            })
        );
        Ok(())
    }

    #[test]
    fn encode_full_activity() -> Result<()> {
        let activity = Activity::new("user:eric", "like", "tweet:1")
            .with_id("ef696c12-69ab-11e4-8080-80003644b625")
            .with_target("board:7")
            .with_origin("user:jessica")
            .with_foreign_id("like:1")
            .with_timestamp("2015-02-10T15:04:55.5Z".parse()?)
            .with_data(ActivityData::from_json(r#"{"score":3}"#)?)
            .with_metadata("popularity", 9)
            .send_to(FeedReference::new("notification", "jessica"))
            .send_to(FeedReference::new("timeline", "jessica").with_token("tok"));
        let value = fixed_encoder()?.to_value(&activity)?;
        assert_eq!(
            value,
            json!({
                "id": "ef696c12-69ab-11e4-8080-80003644b625",
                "actor": "user:eric",
                "verb": "like",
                "object": "tweet:1",
                "target": "board:7",
                "origin": "user:jessica",
                "foreign_id": "like:1",
                "time": "2015-02-10T15:04:55.5",
                "data": {"score": 3},
                "popularity": 9,
                "to": ["notification:jessica", "timeline:jessica tok"]
            })
        );
        Ok(())
    }

    #[test]
    fn named_fields_replace_metadata() -> Result<()> {
        let activity = Activity::new("A", "post", "O")
            .with_metadata("actor", "shadow")
            .with_metadata("time", "yesterday")
            .with_metadata("target", "kept");
        let bytes = fixed_encoder()?.encode(&activity)?;
        let text = String::from_utf8(bytes)?;
        assert_eq!(text.matches("\"actor\"").count(), 1);
        let value: Value = serde_json::from_str(&text)?;
        assert_eq!(value["actor"], "A");
        assert_eq!(value["time"], "2024-05-01T12:00:00.25");
        // Not overwritten while the target field itself is empty.
        assert_eq!(value["target"], "kept");
        Ok(())
    }

    #[test]
    fn data_is_embedded_verbatim() -> Result<()> {
        let activity = Activity::new("A", "post", "O")
            .with_data(ActivityData::from_json(r#"{"z":1,"a":"x"}"#)?);
        let text = String::from_utf8(fixed_encoder()?.encode(&activity)?)?;
        assert!(text.contains(r#""data":{"z":1,"a":"x"}"#), "{text}");
        Ok(())
    }

    #[test]
    fn empty_to_is_omitted() -> Result<()> {
        let value = fixed_encoder()?.to_value(&Activity::new("A", "post", "O"))?;
        assert!(value.get("to").is_none());
        assert!(value.get("id").is_none());
        assert!(value.get("foreign_id").is_none());
        assert!(value.get("data").is_none());
        Ok(())
    }

    #[test]
    fn unset_timestamp_uses_now() -> Result<()> {
        let before = Timestamp::now();
        let bytes = encode(&Activity::new("A", "post", "O"))?;
        let value: Value = serde_json::from_slice(&bytes)?;
        let time = value["time"].as_str().and_then(parse_time).unwrap();
        let delta = time.duration_since(before).abs();
        assert!(delta.as_secs() < 1, "{delta:?}");
        Ok(())
    }

    #[test]
    fn borrowed_clock() -> Result<()> {
        let clock = FixedClock("2024-05-01T12:00:00Z".parse()?);
        let encoder = Encoder::with_clock(&clock);
        let value = encoder.to_value(&Activity::new("A", "post", "O"))?;
        assert_eq!(value["time"], "2024-05-01T12:00:00");
        Ok(())
    }

    #[test]
    fn serde_serialize_matches_encode() -> Result<()> {
        let activity =
            Activity::new("A", "post", "O").with_timestamp("2024-01-01T00:00:00Z".parse()?);
        assert_eq!(serde_json::to_vec(&activity)?, encode(&activity)?);
        Ok(())
    }
}
