// src/feed/model.rs
//! RSS 2.0 records. Items are an ordered list, newest first. Elements outside
//! the modelled subset ride along as [`RawElement`]s and are written back.

use quick_xml::events::Event;

/// An element this crate does not interpret (`<image>`, `<atom:link>`,
/// `<enclosure>`, ...), kept as its full event sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElement(pub(crate) Vec<Event<'static>>);

impl RawElement {
    /// Qualified tag name, prefix included.
    pub fn name(&self) -> String {
        match self.0.first() {
            Some(Event::Start(e)) | Some(Event::Empty(e)) => {
                String::from_utf8_lossy(e.name().as_ref()).into_owned()
            }
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Guid {
    pub is_perma_link: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub categories: Vec<String>,
    pub guid: Option<Guid>,
    pub pub_date: Option<String>,
    pub extra: Vec<RawElement>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Channel {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub last_build_date: Option<String>,
    pub extra: Vec<RawElement>,
    pub items: Vec<FeedItem>,
}

/// `rss` root with exactly one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub version: String,
    /// Root attributes other than `version`, e.g. `xmlns:atom`.
    pub attributes: Vec<(String, String)>,
    pub channel: Channel,
    pub extra: Vec<RawElement>,
}

impl Default for FeedDocument {
    fn default() -> Self {
        Self {
            version: "2.0".to_string(),
            attributes: Vec::new(),
            channel: Channel::default(),
            extra: Vec::new(),
        }
    }
}
