// src/topics.rs
//! Topic rotation: parse the configured list and pick one per calendar day.

use chrono::NaiveDate;

use crate::error::{FeedError, Result};

/// Built-in list used when both `TOPICS` and `DEFAULT_TOPICS` yield nothing.
pub const DEFAULT_TOPICS: &str = "Minimalismus,Selbstentwicklung,Frugalismus,Investieren";

/// Reference date for the rotation (day 0 = first topic).
pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid epoch date")
}

/// Ordered topic names; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicList(Vec<String>);

impl TopicList {
    pub fn new(topics: Vec<String>) -> Option<Self> {
        if topics.is_empty() {
            None
        } else {
            Some(Self(topics))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `raw` (or `fallback` when `raw` is empty) into a topic list.
///
/// Falls back to [`DEFAULT_TOPICS`] when the chosen string has no usable entries.
pub fn resolve_topics(raw: &str, fallback: &str) -> Result<TopicList> {
    let source = if raw.is_empty() { fallback } else { raw };
    let mut topics = split_topics(source);
    if topics.is_empty() {
        topics = split_topics(DEFAULT_TOPICS);
    }
    TopicList::new(topics).ok_or_else(|| FeedError::config("built-in topic list is empty"))
}

/// Topic for `today`: `days(today - epoch) mod len`, Euclidean so dates before
/// the epoch still land in range.
pub fn pick_for_today<'a>(topics: &'a TopicList, today: NaiveDate, epoch: NaiveDate) -> &'a str {
    let days = today.signed_duration_since(epoch).num_days();
    let len = topics.len() as i64;
    let index = days.rem_euclid(len) as usize;
    &topics.as_slice()[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_list_is_trimmed_and_filtered() {
        let t = resolve_topics(" Geld , ,Zeit,", "Ignored").unwrap();
        assert_eq!(t.as_slice(), ["Geld", "Zeit"]);
    }

    #[test]
    fn empty_raw_uses_fallback_then_builtin() {
        let t = resolve_topics("", "A,B").unwrap();
        assert_eq!(t.as_slice(), ["A", "B"]);

        let t = resolve_topics("", " , ").unwrap();
        assert_eq!(t.len(), 4);
        assert_eq!(t.as_slice()[0], "Minimalismus");

        // non-empty raw with only separators does not consult the fallback
        let t = resolve_topics(",,", "A,B").unwrap();
        assert_eq!(t.as_slice()[3], "Investieren");
    }

    #[test]
    fn rotation_follows_days_since_epoch() {
        let topics = resolve_topics("A,B,C", "").unwrap();
        let epoch = default_epoch();
        assert_eq!(pick_for_today(&topics, epoch, epoch), "A");
        assert_eq!(pick_for_today(&topics, date(2025, 1, 2), epoch), "B");
        assert_eq!(pick_for_today(&topics, date(2025, 1, 4), epoch), "A");
        // before the epoch: -1 mod 3 == 2
        assert_eq!(pick_for_today(&topics, date(2024, 12, 31), epoch), "C");
    }

    #[test]
    fn same_day_same_topic() {
        let topics = resolve_topics("", DEFAULT_TOPICS).unwrap();
        let day = date(2026, 10, 18);
        let first = pick_for_today(&topics, day, default_epoch()).to_string();
        for _ in 0..5 {
            assert_eq!(pick_for_today(&topics, day, default_epoch()), first);
        }
    }

    #[test]
    fn empty_list_is_rejected_by_type() {
        assert!(TopicList::new(Vec::new()).is_none());
    }
}
