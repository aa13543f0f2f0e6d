//! Table-of-contents projection
//!
//! [`TocProjector`] mirrors a [`PublicationTree`] into a navigable
//! outline. It never mutates tree state: entries are built from the
//! tree's public accessors, driven by node-resolved notifications, so
//! the outline stays current no matter which traversal path (cursor
//! walk, direct jump, push splice) discovered a node first.
//!
//! Flat documents with no tree structure of their own still get a
//! multi-level outline via [`TocProjector::build_from_document`],
//! which scans markdown headings instead of child addresses.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use slab::Slab;
use thiserror::Error;
use tome_nostr::Note;
use tracing::warn;

use crate::address::EventAddress;
use crate::constants::is_index_kind;
use crate::tree::{ObserverId, PublicationTree, TreeError};

#[derive(Debug, Error)]
pub enum TocError {
    /// The projector cannot exist without a resolvable root
    #[error("root address could not be resolved: {0}")]
    RootUnavailable(EventAddress),

    /// Caller referenced an address no entry has been built for
    #[error("no ToC entry for address: {0}")]
    UnknownEntry(EventAddress),

    /// Entry construction ran before the address's event was cached
    #[error("event not yet cached for address: {0}")]
    EventUnavailable(EventAddress),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// One outline node
///
/// `parent` and `children` are indices into the projector's entry
/// arena, resolvable via [`TocProjector::entry_at`]. Once
/// `children_resolved` is set, `children` matches the underlying
/// event's a-tag order. Entries are created when their address is
/// first discovered and never destroyed; they mutate in place as
/// children resolve.
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub address: EventAddress,
    pub title: String,
    pub href: String,
    /// Distance from the tree root (hierarchy length minus one)
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub children_resolved: bool,
}

/// Flattened view of one entry, as delivered to subscribers
#[derive(Debug, Clone)]
pub struct TocItem {
    pub address: EventAddress,
    pub title: String,
    pub href: String,
    pub depth: usize,
    pub children_resolved: bool,
    pub is_leaf: bool,
    pub expanded: bool,
}

/// Depth-first snapshot of every currently known entry
#[derive(Debug, Clone)]
pub struct TocSnapshot {
    pub entries: Vec<TocItem>,
}

/// Handle returned by [`TocProjector::subscribe`]
pub struct TocSubscription {
    shared: Weak<TocShared>,
    key: usize,
}

impl TocSubscription {
    pub fn unsubscribe(self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.subscribers().try_remove(self.key);
        }
    }
}

type SubscriberFn = Box<dyn Fn(&TocSnapshot) + Send + Sync>;

struct TocState {
    /// All entries (arena; indices are stable)
    entries: Vec<TocEntry>,

    /// Tree-addressed entries by address. Document-heading entries
    /// share their parent's address and are not indexed here.
    index: HashMap<EventAddress, usize>,

    /// Addresses known to be terminal content, recorded at entry
    /// creation so a UI can render them non-expandable without a
    /// network round trip
    leaves: HashSet<EventAddress>,

    /// Expand/collapse state (collapsed unless set)
    expanded: HashMap<EventAddress, bool>,

    /// Arena index of the root entry
    root: usize,
}

struct TocShared {
    tree: Arc<PublicationTree>,
    locator: String,
    state: Mutex<TocState>,
    subscribers: Mutex<Slab<SubscriberFn>>,
}

/// An observable outline over a publication tree
///
/// Construction runs in two phases: a catch-up pass over every
/// address the tree has already resolved, then a subscription to the
/// tree's node-resolved notifications for everything after. Without
/// the catch-up, nodes resolved between tree construction and
/// projector construction would be silently missing.
pub struct TocProjector {
    shared: Arc<TocShared>,
    tree_observer: ObserverId,
}

impl TocProjector {
    /// Build a projector over `tree`, rooted at `root_address`
    ///
    /// `locator` is the display-context prefix for entry hrefs (e.g.
    /// `"/publication"`). Fails if the root cannot be resolved.
    pub async fn new(
        root_address: EventAddress,
        tree: Arc<PublicationTree>,
        locator: impl Into<String>,
    ) -> Result<Self, TocError> {
        if tree.event(&root_address).await?.is_none() {
            return Err(TocError::RootUnavailable(root_address));
        }

        let shared = Arc::new(TocShared {
            tree: Arc::clone(&tree),
            locator: locator.into(),
            state: Mutex::new(TocState {
                entries: Vec::new(),
                index: HashMap::new(),
                leaves: HashSet::new(),
                expanded: HashMap::new(),
                root: 0,
            }),
            subscribers: Mutex::new(Slab::new()),
        });

        shared.build_entry(&root_address)?;

        // Catch-up: anything resolved before we subscribe below.
        // Arena order is topological, so parents build before children.
        for address in tree.resolved_addresses() {
            if let Err(e) = shared.build_entry(&address) {
                warn!("toc catch-up skipped {}: {}", address, e);
            }
        }

        let weak = Arc::downgrade(&shared);
        let tree_observer = tree.on_node_resolved(move |address| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            match shared.build_entry(address) {
                Ok(_) => shared.notify(),
                Err(e) => warn!("toc entry for {} failed: {}", address, e),
            }
        });

        Ok(Self {
            shared,
            tree_observer,
        })
    }

    /// The entry for a tree address, if one has been built
    pub fn entry(&self, address: &EventAddress) -> Option<TocEntry> {
        let state = self.shared.state();
        state
            .index
            .get(address)
            .map(|&idx| state.entries[idx].clone())
    }

    /// Entry by arena index (for following `parent`/`children` links)
    pub fn entry_at(&self, idx: usize) -> Option<TocEntry> {
        self.shared.state().entries.get(idx).cloned()
    }

    /// The root entry
    pub fn root_entry(&self) -> TocEntry {
        let state = self.shared.state();
        let root = state.root;
        state.entries[root].clone()
    }

    /// Whether an address was classified terminal at entry creation
    pub fn is_leaf(&self, address: &EventAddress) -> bool {
        self.shared.state().leaves.contains(address)
    }

    /// Resolve an entry's children into the outline
    ///
    /// No-op once resolved. Non-index events get no child entries
    /// (their outline comes from [`build_from_document`]); failed
    /// children are skipped. After all children are built, the entry's
    /// child list is reordered to the parent event's a-tag order,
    /// since concurrent resolution can complete children out of
    /// sequence. `children_resolved` is set only after that reorder.
    ///
    /// [`build_from_document`]: Self::build_from_document
    pub async fn resolve_children(&self, address: &EventAddress) -> Result<(), TocError> {
        {
            let state = self.shared.state();
            let idx = *state
                .index
                .get(address)
                .ok_or_else(|| TocError::UnknownEntry(address.clone()))?;
            if state.entries[idx].children_resolved {
                return Ok(());
            }
        }

        let note = self.shared.tree.event(address).await?;
        let is_index = note
            .as_ref()
            .map(|n| is_index_kind(n.kind as u32))
            .unwrap_or(false);
        if !is_index {
            // Terminal content (or unreachable): nothing to expand.
            let mut state = self.shared.state();
            state.leaves.insert(address.clone());
            if let Some(&idx) = state.index.get(address) {
                state.entries[idx].children_resolved = true;
            }
            drop(state);
            self.shared.notify();
            return Ok(());
        }

        // Forces resolution of every child; the tree's notifications
        // land back in our observer, building entries as they resolve.
        let children = self.shared.tree.child_addresses(address).await?;

        // Redundant with the observer path on purpose: entries can be
        // constructed from either trigger, whichever runs first.
        for child in children.iter().flatten() {
            if let Err(e) = self.shared.build_entry(child) {
                warn!("toc child entry for {} failed: {}", child, e);
            }
        }

        {
            let mut state = self.shared.state();
            let idx = *state
                .index
                .get(address)
                .ok_or_else(|| TocError::UnknownEntry(address.clone()))?;
            if let Some(parent_note) = self.shared.tree.cached_event(address) {
                reorder_children(&mut state, idx, &parent_note);
            }
            state.entries[idx].children_resolved = true;
        }
        self.shared.notify();
        Ok(())
    }

    /// Synthesize outline entries from a flat document's headings
    ///
    /// For leaf content rendered as markdown: each heading with
    /// non-empty text becomes an entry carrying the parent's address
    /// (it is a sub-section of the same content item, not a new tree
    /// node) and a page-local anchor href. Headings nest by level.
    /// Re-running for the same address replaces the previous outline.
    /// Returns the number of entries created.
    pub fn build_from_document(
        &self,
        address: &EventAddress,
        markdown: &str,
    ) -> Result<usize, TocError> {
        let headings = extract_headings(markdown);

        let created = {
            let mut state = self.shared.state();
            let parent_idx = *state
                .index
                .get(address)
                .ok_or_else(|| TocError::UnknownEntry(address.clone()))?;

            // Detach any previously synthesized headings (document
            // re-rendered). Orphaned arena slots stay allocated;
            // nothing reaches them once detached.
            let old_children = std::mem::take(&mut state.entries[parent_idx].children);
            let kept: Vec<usize> = old_children
                .into_iter()
                .filter(|&c| state.entries[c].address != *address)
                .collect();
            state.entries[parent_idx].children = kept;

            let base_depth = state.entries[parent_idx].depth;
            let parent_href = state.entries[parent_idx].href.clone();

            // Heading-level stack for nesting h2 under h1 and so on
            let mut stack: Vec<(u8, usize)> = Vec::new();
            let mut created = 0usize;
            for (level, text, anchor) in headings {
                while let Some(&(l, _)) = stack.last() {
                    if l >= level {
                        stack.pop();
                    } else {
                        break;
                    }
                }
                let (attach_to, depth) = match stack.last() {
                    Some(&(_, pi)) => (pi, state.entries[pi].depth + 1),
                    None => (parent_idx, base_depth + 1),
                };

                let idx = state.entries.len();
                state.entries.push(TocEntry {
                    address: address.clone(),
                    title: text,
                    href: format!("{}#{}", parent_href, anchor),
                    depth,
                    parent: Some(attach_to),
                    children: Vec::new(),
                    children_resolved: true,
                });
                state.entries[attach_to].children.push(idx);
                stack.push((level, idx));
                created += 1;
            }
            created
        };

        if created > 0 {
            self.shared.notify();
        }
        Ok(created)
    }

    /// Store contract: register a callback, replay the current
    /// snapshot immediately, and re-invoke on every mutation
    ///
    /// Callbacks must not mutate the projector (notification runs
    /// while the subscriber registry is borrowed).
    pub fn subscribe<F>(&self, callback: F) -> TocSubscription
    where
        F: Fn(&TocSnapshot) + Send + Sync + 'static,
    {
        let callback: SubscriberFn = Box::new(callback);
        callback(&self.shared.snapshot());
        let key = self.shared.subscribers().insert(callback);
        TocSubscription {
            shared: Arc::downgrade(&self.shared),
            key,
        }
    }

    /// Depth-first iteration over every currently known entry (root
    /// first, then each child subtree)
    ///
    /// Finite and restartable: re-iterating after more resolution has
    /// occurred yields more entries.
    pub fn iter(&self) -> impl Iterator<Item = TocItem> {
        self.shared.snapshot().entries.into_iter()
    }

    pub fn set_expanded(&self, address: &EventAddress, expanded: bool) {
        self.shared
            .state()
            .expanded
            .insert(address.clone(), expanded);
        self.shared.notify();
    }

    pub fn toggle_expanded(&self, address: &EventAddress) {
        let next = !self.is_expanded(address);
        self.set_expanded(address, next);
    }

    pub fn is_expanded(&self, address: &EventAddress) -> bool {
        self.shared
            .state()
            .expanded
            .get(address)
            .copied()
            .unwrap_or(false)
    }
}

impl Drop for TocProjector {
    fn drop(&mut self) {
        self.shared.tree.remove_observer(self.tree_observer);
    }
}

impl TocShared {
    fn state(&self) -> MutexGuard<'_, TocState> {
        self.state.lock().expect("toc state poisoned")
    }

    fn subscribers(&self) -> MutexGuard<'_, Slab<SubscriberFn>> {
        self.subscribers.lock().expect("toc subscribers poisoned")
    }

    /// Build the entry for an address whose event is cached in the
    /// tree; idempotent
    fn build_entry(&self, address: &EventAddress) -> Result<usize, TocError> {
        {
            let state = self.state();
            if let Some(&idx) = state.index.get(address) {
                return Ok(idx);
            }
        }

        let note = self
            .tree
            .cached_event(address)
            .ok_or_else(|| TocError::EventUnavailable(address.clone()))?;
        let hierarchy = self.tree.hierarchy(address)?;
        let depth = hierarchy.len().saturating_sub(1);
        let parent_address = if hierarchy.len() >= 2 {
            EventAddress::from_note(&hierarchy[hierarchy.len() - 2]).ok()
        } else {
            None
        };
        let title = note
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| address.dtag.clone());

        // Redundant with the tree's classification on purpose: this
        // entry may be constructed before the node's children are.
        let is_leaf =
            !is_index_kind(note.kind as u32) || note.tag_values("a").next().is_none();

        let mut state = self.state();
        if let Some(&idx) = state.index.get(address) {
            // Raced with another trigger while we read the tree
            return Ok(idx);
        }

        let idx = state.entries.len();
        state.entries.push(TocEntry {
            address: address.clone(),
            title,
            href: format!("{}/{}", self.locator, address),
            depth,
            parent: None,
            children: Vec::new(),
            children_resolved: false,
        });
        state.index.insert(address.clone(), idx);
        if is_leaf {
            state.leaves.insert(address.clone());
        }

        if let Some(parent_address) = parent_address {
            if let Some(&parent_idx) = state.index.get(&parent_address) {
                state.entries[idx].parent = Some(parent_idx);
                if !state.entries[parent_idx].children.contains(&idx) {
                    state.entries[parent_idx].children.push(idx);
                }
                // Keep a-tag order for parents that already finished
                // their resolve pass
                if state.entries[parent_idx].children_resolved {
                    if let Some(parent_note) = self.tree.cached_event(&parent_address) {
                        reorder_children(&mut state, parent_idx, &parent_note);
                    }
                }
            }
        }

        Ok(idx)
    }

    fn snapshot(&self) -> TocSnapshot {
        let state = self.state();
        let mut entries = Vec::with_capacity(state.entries.len());
        let mut stack = vec![state.root];
        while let Some(idx) = stack.pop() {
            let entry = &state.entries[idx];
            entries.push(TocItem {
                address: entry.address.clone(),
                title: entry.title.clone(),
                href: entry.href.clone(),
                depth: entry.depth,
                children_resolved: entry.children_resolved,
                is_leaf: state.leaves.contains(&entry.address),
                expanded: state
                    .expanded
                    .get(&entry.address)
                    .copied()
                    .unwrap_or(false),
            });
            for &child in entry.children.iter().rev() {
                stack.push(child);
            }
        }
        TocSnapshot { entries }
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        let subscribers = self.subscribers();
        for (_, callback) in subscribers.iter() {
            callback(&snapshot);
        }
    }
}

/// Resort an entry's children to its event's live a-tag order.
/// Children outside the tag list (push splices, document headings)
/// keep their relative order after the tagged ones.
fn reorder_children(state: &mut TocState, parent_idx: usize, parent_note: &Note) {
    let tag_order: Vec<EventAddress> = parent_note
        .tag_values("a")
        .filter_map(|v| EventAddress::from_a_tag(v).ok())
        .collect();

    let mut children = std::mem::take(&mut state.entries[parent_idx].children);
    children.sort_by_key(|&c| {
        let addr = &state.entries[c].address;
        tag_order
            .iter()
            .position(|t| t == addr)
            .unwrap_or(usize::MAX)
    });
    state.entries[parent_idx].children = children;
}

/// Extract `(level, text, anchor)` for every non-empty heading,
/// deduplicating anchors with `-2`, `-3`… suffixes
fn extract_headings(markdown: &str) -> Vec<(u8, String, String)> {
    let parser = Parser::new(markdown);
    let mut out = Vec::new();
    let mut current: Option<(u8, String)> = None;
    let mut seen: HashMap<String, usize> = HashMap::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((heading_level_to_u8(level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let Some((level, text)) = current.take() else {
                    continue;
                };
                let text = text.trim().to_string();
                if text.is_empty() {
                    continue;
                }
                let base = slugify(&text);
                if base.is_empty() {
                    continue;
                }
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let anchor = if *count == 1 {
                    base
                } else {
                    format!("{}-{}", base, count)
                };
                out.push((level, text, anchor));
            }
            _ => {}
        }
    }
    out
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Convert a string to a URL-safe anchor slug
///
/// - Lowercases the string
/// - Replaces non-alphanumeric characters with hyphens
/// - Collapses multiple hyphens
/// - Removes leading/trailing hyphens
pub fn slugify(s: &str) -> String {
    let slug: String = s
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    slug.split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Chapter 1: Introduction"), "chapter-1-introduction");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn headings_nest_and_skip_empty() {
        let md = "# Title\n\ntext\n\n## Part One\n\n### Detail\n\n##   \n\n## Part Two\n";
        let headings = extract_headings(md);
        let levels: Vec<u8> = headings.iter().map(|(l, _, _)| *l).collect();
        let anchors: Vec<&str> = headings.iter().map(|(_, _, a)| a.as_str()).collect();

        assert_eq!(levels, vec![1, 2, 3, 2]);
        assert_eq!(anchors, vec!["title", "part-one", "detail", "part-two"]);
    }

    #[test]
    fn duplicate_heading_anchors_get_suffixes() {
        let md = "## Notes\n\n## Notes\n\n## Notes\n";
        let anchors: Vec<String> = extract_headings(md)
            .into_iter()
            .map(|(_, _, a)| a)
            .collect();
        assert_eq!(anchors, vec!["notes", "notes-2", "notes-3"]);
    }

    #[test]
    fn inline_code_counts_as_heading_text() {
        let md = "## The `Lazy` type\n";
        let headings = extract_headings(md);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].1, "The Lazy type");
        assert_eq!(headings[0].2, "the-lazy-type");
    }
}
