use crate::Pubkey;
use serde::{Deserialize, Serialize};

/// NIP-01 subscription filter
///
/// Only the fields the reader side uses. Builder-style setters keep
/// call sites terse:
///
/// ```
/// use tome_nostr::Filter;
///
/// let filter = Filter::new().kinds([30040]).limit(10);
/// assert_eq!(filter.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Pubkey>>,

    /// `#d` identifier-tag filter
    #[serde(rename = "#d", skip_serializing_if = "Option::is_none")]
    pub dtags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u64>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn authors(mut self, authors: impl IntoIterator<Item = Pubkey>) -> Self {
        self.authors = Some(authors.into_iter().collect());
        self
    }

    pub fn dtags(mut self, dtags: impl IntoIterator<Item = String>) -> Self {
        self.dtags = Some(dtags.into_iter().collect());
        self
    }

    pub fn since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Does `kind` pass this filter's kind list?
    pub fn matches_kind(&self, kind: u64) -> bool {
        self.kinds.as_ref().map_or(true, |ks| ks.contains(&kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dtag_field_serializes_as_hash_d() {
        let filter = Filter::new()
            .kinds([30040])
            .dtags(["my-book".to_string()]);

        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"#d\":[\"my-book\"]"));
        assert!(!json.contains("authors"));

        let back: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn kind_matching() {
        let filter = Filter::new().kinds([30040, 30041]);
        assert!(filter.matches_kind(30041));
        assert!(!filter.matches_kind(1));
        assert!(Filter::new().matches_kind(1));
    }
}
