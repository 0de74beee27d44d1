use thiserror::Error;

/// Failure to produce the wire form of an activity.
///
/// Nothing is partially written when this is returned; callers must not send
/// the request.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("unable to serialize activity payload: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// The envelope could not be read as a JSON object.
///
/// Field level anomalies never surface here, they decode to defaults.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("activity is not a valid JSON object: {0}")]
    Json(#[source] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a feed reference: {0:?}")]
pub struct FeedParseError(pub String);
