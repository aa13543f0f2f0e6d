//! Event source boundary
//!
//! The tree core pulls events one address at a time through
//! [`EventSource`]; relay selection, pooling and timeouts all live
//! behind this trait.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tome_nostr::{Filter, Note, Pubkey};

use crate::address::EventAddress;

/// Errors surfaced by an event source
///
/// `Clone` because fetch outcomes are memoized per address; every
/// caller of a failed resolution observes the same error.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("event source closed")]
    Closed,
}

/// Something that can resolve Nostr events
///
/// The publication tree only ever calls [`fetch_event`]
/// (one address, one event). [`fetch_events`] is the batch surface
/// used by non-core collaborators such as feeds and search.
///
/// A `fetch_event` returning `Ok(None)` means "no such event on any
/// reachable relay" - the caller records a gap and continues.
///
/// [`fetch_event`]: EventSource::fetch_event
/// [`fetch_events`]: EventSource::fetch_events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Resolve one address to its most recent event, if any
    async fn fetch_event(&self, address: &EventAddress) -> Result<Option<Note>, SourceError>;

    /// Resolve all events matching a filter
    async fn fetch_events(&self, filter: &Filter) -> Result<Vec<Note>, SourceError>;
}

/// Group addresses into one filter per (kind, author) pair, with the
/// d-tags batched in the `#d` filter field
///
/// For source implementations that want to resolve many addresses in
/// one relay round trip instead of per-address requests.
pub fn batch_filters<'a>(addresses: impl IntoIterator<Item = &'a EventAddress>) -> Vec<Filter> {
    let mut groups: HashMap<(u32, Pubkey), Vec<String>> = HashMap::new();
    for address in addresses {
        groups
            .entry((address.kind, address.pubkey))
            .or_default()
            .push(address.dtag.clone());
    }

    groups
        .into_iter()
        .map(|((kind, pubkey), dtags)| {
            Filter::new()
                .kinds([kind as u64])
                .authors([pubkey])
                .dtags(dtags)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_filters_group_by_kind_and_author() {
        let alice = Pubkey::new([0x01; 32]);
        let bob = Pubkey::new([0x02; 32]);
        let addrs = vec![
            EventAddress::new(30041, alice, "one"),
            EventAddress::new(30041, alice, "two"),
            EventAddress::new(30040, alice, "index"),
            EventAddress::new(30041, bob, "three"),
        ];

        let mut filters = batch_filters(&addrs);
        filters.sort_by_key(|f| {
            (
                f.kinds.clone().unwrap_or_default(),
                f.dtags.clone().unwrap_or_default(),
            )
        });

        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].kinds, Some(vec![30040]));
        assert_eq!(filters[0].dtags, Some(vec!["index".to_string()]));
        assert_eq!(
            filters[1].dtags,
            Some(vec!["one".to_string(), "two".to_string()])
        );
        assert_eq!(filters[2].dtags, Some(vec!["three".to_string()]));
    }
}
