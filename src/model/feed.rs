//! Feed identifiers and the `slug:id[ token]` destination grammar.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FeedParseError;

static FEED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_]+:[0-9A-Za-z_]+$").unwrap());
static FEED_WITH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_]+:[0-9A-Za-z_]+ .*$").unwrap());

/// Identifies a feed as `slug:user_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    pub fn new(value: impl Into<String>) -> FeedId {
        FeedId(value.into())
    }
    pub fn value(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Reads the id back as a token-less reference, if it is well formed.
    pub fn to_reference(&self) -> Option<FeedReference> {
        FeedReference::match_feed(&self.0)
    }
}

impl From<String> for FeedId {
    fn from(value: String) -> Self {
        FeedId(value)
    }
}

impl From<&str> for FeedId {
    fn from(value: &str) -> Self {
        FeedId(value.to_string())
    }
}

impl Display for FeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something an activity can be delivered to.
pub trait Feed {
    fn feed_id(&self) -> FeedId;
    /// Access token sent along with the feed id; empty when there is none.
    fn token(&self) -> &str;
}

/// Wire form of a destination: `slug:user_id`, plus ` token` when present.
pub(crate) fn to_wire_string(feed: &(impl Feed + ?Sized)) -> String {
    let mut to = feed.feed_id().value().to_string();
    if !feed.token().is_empty() {
        to.push(' ');
        to.push_str(feed.token());
    }
    to
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedReference {
    slug: String,
    user_id: String,
    token: String,
}

impl FeedReference {
    pub fn new(slug: impl Into<String>, user_id: impl Into<String>) -> FeedReference {
        FeedReference {
            slug: slug.into(),
            user_id: user_id.into(),
            token: String::new(),
        }
    }
    pub fn with_token(self, token: impl Into<String>) -> FeedReference {
        FeedReference {
            token: token.into(),
            ..self
        }
    }
    pub fn slug(&self) -> &str {
        &self.slug
    }
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Tries both grammars against `to` and returns every match.
    ///
    /// The two grammars are attempted independently, so a string matching
    /// both yields two references. Callers rely on the exact count, do not
    /// deduplicate here.
    pub fn parse_all(to: &str) -> Vec<FeedReference> {
        let mut feeds = vec![];
        if let Some(feed) = FeedReference::match_feed(to) {
            feeds.push(feed);
        }
        if let Some(feed) = FeedReference::match_feed_with_token(to) {
            feeds.push(feed);
        }
        feeds
    }

    fn match_feed(to: &str) -> Option<FeedReference> {
        if !FEED.is_match(to) {
            return None;
        }
        let (slug, user_id) = to.split_once(':')?;
        Some(FeedReference::new(slug, user_id))
    }

    fn match_feed_with_token(to: &str) -> Option<FeedReference> {
        if !FEED_WITH_TOKEN.is_match(to) {
            return None;
        }
        let (slug, rest) = to.split_once(':')?;
        // Only the segment up to the next colon carries the id and token.
        let segment = rest.split(':').next()?;
        let mut parts = segment.split(' ');
        let user_id = parts.next()?;
        let token = parts.next().unwrap_or_default();
        Some(FeedReference::new(slug, user_id).with_token(token))
    }
}

impl Feed for FeedReference {
    fn feed_id(&self) -> FeedId {
        FeedId(format!("{}:{}", self.slug, self.user_id))
    }
    fn token(&self) -> &str {
        &self.token
    }
}

impl Display for FeedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_wire_string(self))
    }
}

impl FromStr for FeedReference {
    type Err = FeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedReference::parse_all(s)
            .into_iter()
            .next()
            .ok_or_else(|| FeedParseError(s.to_string()))
    }
}
