//! Publication Tree data structure
//!
//! A lazily resolved tree for navigating NKBIP-01 publications. The
//! shape of the tree is discovered incrementally: a node's children
//! are registered (in a-tag order) when its index event resolves, and
//! each child's own event is fetched on demand through the
//! [`EventSource`] boundary.
//!
//! All state lives behind short internal mutex sections, never held
//! across an await, so a shared `Arc<PublicationTree>` can serve a
//! cursor walk and a ToC rebuild with fetches in flight concurrently.
//! Per-address fetches are memoized with [`Lazy`], so concurrent
//! resolution of the same address issues one fetch.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::stream::Stream;
use slab::Slab;
use thiserror::Error;
use tome_nostr::Note;
use tracing::{debug, warn};

use crate::address::{AddressError, EventAddress};
use crate::constants::is_index_kind;
use crate::lazy::Lazy;
use crate::node::{NodeStatus, NodeType, TreeNode};
use crate::source::{EventSource, SourceError};

#[derive(Debug, Error)]
pub enum TreeError {
    /// Caller operated on an address the tree has never registered
    #[error("address not registered in tree: {0}")]
    NotRegistered(EventAddress),

    /// Splice target's parent is not part of the tree
    #[error("parent not registered in tree: {0}")]
    ParentNotRegistered(EventAddress),

    /// Splice target's parent has no resolved event yet
    #[error("parent not resolved: {0}")]
    ParentNotResolved(EventAddress),

    /// Hierarchy walk hit a node whose event was never cached
    #[error("ancestor event missing from cache: {0}")]
    MissingAncestor(EventAddress),

    /// Bookmark target cannot be reached by walking a-tags from root
    #[error("address not reachable from root: {0}")]
    Unreachable(EventAddress),

    /// Note carries no kind/pubkey/d-tag address
    #[error("note is not addressable: {0}")]
    InvalidAddress(#[from] AddressError),
}

/// One step of a document-order walk
#[derive(Debug, Clone)]
pub enum TraversalItem {
    /// A readable section (or, for a bookmark on an index node, that
    /// node's own event)
    Section { address: EventAddress, note: Note },

    /// A node whose event could not be fetched; yielded in position
    /// so a UI can show an explicit gap
    Gap { address: EventAddress },
}

impl TraversalItem {
    pub fn address(&self) -> &EventAddress {
        match self {
            TraversalItem::Section { address, .. } => address,
            TraversalItem::Gap { address } => address,
        }
    }

    pub fn note(&self) -> Option<&Note> {
        match self {
            TraversalItem::Section { note, .. } => Some(note),
            TraversalItem::Gap { .. } => None,
        }
    }
}

/// Handle for unregistering a node-resolved observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(usize);

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

type FetchOutcome = Result<Option<Note>, SourceError>;
type ObserverFn = Box<dyn Fn(&EventAddress) + Send + Sync>;

struct TreeState {
    /// All nodes in the tree (arena; indices are stable)
    nodes: Vec<TreeNode>,

    /// Map from address to arena index for fast lookups
    index: HashMap<EventAddress, usize>,

    /// Most recently resolved event per address
    events: HashMap<EventAddress, Note>,

    /// Arena index of the root node
    root: usize,

    /// Current cursor position for next()/previous()
    cursor: Option<usize>,

    /// Address traversal should (re)start from
    bookmark: Option<EventAddress>,
}

/// A lazily resolved NKBIP-01 publication tree with a stateful
/// depth-first traversal cursor
///
/// Nodes start `Pending` and resolve as events are fetched. Failed
/// fetches become `Error`-status leaves rather than halting anything:
/// traversal yields them as [`TraversalItem::Gap`].
pub struct PublicationTree {
    source: Arc<dyn EventSource>,
    state: Mutex<TreeState>,

    /// Per-address memoized fetches; the at-most-once guarantee
    fetches: Mutex<HashMap<EventAddress, Arc<Lazy<FetchOutcome>>>>,

    /// Node-resolved observers, invoked synchronously with the
    /// address once its event lands in the cache
    observers: Mutex<Slab<ObserverFn>>,
}

impl PublicationTree {
    /// Create a publication tree from a root event
    ///
    /// The root is classified (index events with a-tags are branches,
    /// everything else is a leaf), cached, and its children are
    /// registered pending in a-tag order.
    pub fn new(root_note: Note, source: Arc<dyn EventSource>) -> Result<Self, TreeError> {
        let address = EventAddress::from_note(&root_note)?;
        let child_addrs = a_tag_addresses(&root_note);
        let node_type = classify(root_note.kind as u32, !child_addrs.is_empty());
        let title = root_note.title().map(str::to_string);

        let mut state = TreeState {
            nodes: vec![TreeNode::new_root(address.clone(), title, node_type)],
            index: HashMap::new(),
            events: HashMap::new(),
            root: 0,
            cursor: None,
            bookmark: None,
        };
        state.index.insert(address.clone(), 0);
        state.events.insert(address, root_note);
        register_children(&mut state, 0, child_addrs);

        Ok(Self {
            source,
            state: Mutex::new(state),
            fetches: Mutex::new(HashMap::new()),
            observers: Mutex::new(Slab::new()),
        })
    }

    /// Address of the root node
    pub fn root_address(&self) -> EventAddress {
        let state = self.state();
        let root = state.root;
        state.nodes[root].address.clone()
    }

    /// The cached event for an address, if resolution already
    /// completed
    pub fn cached_event(&self, address: &EventAddress) -> Option<Note> {
        self.state().events.get(address).cloned()
    }

    /// Snapshot of a node's current state
    pub fn node(&self, address: &EventAddress) -> Option<TreeNode> {
        let state = self.state();
        state.index.get(address).map(|&idx| state.nodes[idx].clone())
    }

    /// Whether an address has been registered in the tree
    pub fn contains(&self, address: &EventAddress) -> bool {
        self.state().index.contains_key(address)
    }

    /// Addresses of all currently resolved nodes, in registration
    /// order
    pub fn resolved_addresses(&self) -> Vec<EventAddress> {
        self.state()
            .nodes
            .iter()
            .filter(|n| n.is_resolved())
            .map(|n| n.address.clone())
            .collect()
    }

    /// Addresses registered but not yet fetched
    pub fn pending_addresses(&self) -> Vec<EventAddress> {
        self.state()
            .nodes
            .iter()
            .filter(|n| n.is_pending())
            .map(|n| n.address.clone())
            .collect()
    }

    /// Get total node count
    pub fn node_count(&self) -> usize {
        self.state().nodes.len()
    }

    /// Get count of resolved nodes
    pub fn resolved_count(&self) -> usize {
        self.count_status(NodeStatus::Resolved)
    }

    /// Get count of pending nodes
    pub fn pending_count(&self) -> usize {
        self.count_status(NodeStatus::Pending)
    }

    /// Fetch the event for an address, resolving whatever part of the
    /// tree is needed to reach it
    ///
    /// Cached events return immediately. An unregistered address
    /// triggers a depth-first search from the root that resolves every
    /// node it touches and short-circuits the moment the target turns
    /// up. `Ok(None)` means the address is not reachable by walking
    /// a-tags from the root (or its fetch failed) - that is not an
    /// error, just "not in this tree".
    pub async fn event(&self, address: &EventAddress) -> Result<Option<Note>, TreeError> {
        loop {
            let registered = {
                let state = self.state();
                if let Some(note) = state.events.get(address) {
                    return Ok(Some(note.clone()));
                }
                state.index.contains_key(address)
            };

            if registered {
                self.resolve(address).await?;
                return Ok(self.cached_event(address));
            }

            match self.search_step().await? {
                SearchStep::Exhausted => return Ok(None),
                SearchStep::Advanced => {}
            }
        }
    }

    /// Ordered child addresses of a registered node, forcing
    /// resolution of every child
    ///
    /// Resolving children here is always safe: tree resolution is
    /// strictly top-down, so a registered node's parent chain has
    /// already resolved. A `None` entry marks a child whose fetch
    /// failed.
    pub async fn child_addresses(
        &self,
        address: &EventAddress,
    ) -> Result<Vec<Option<EventAddress>>, TreeError> {
        {
            let state = self.state();
            if !state.index.contains_key(address) {
                return Err(TreeError::NotRegistered(address.clone()));
            }
        }
        let idx = self.resolve(address).await?;

        let child_idxs: Vec<usize> = self.state().nodes[idx].children.clone();
        let mut out = Vec::with_capacity(child_idxs.len());
        for child_idx in child_idxs {
            let child_addr = self.address_of(child_idx);
            self.resolve(&child_addr).await?;
            let failed = self.state().nodes[child_idx].is_error();
            out.push(if failed { None } else { Some(child_addr) });
        }
        Ok(out)
    }

    /// Events from root to the addressed node, inclusive
    ///
    /// Callers must have resolved the path first (e.g. via
    /// [`event`](Self::event)); a missing ancestor event is a contract
    /// violation.
    pub fn hierarchy(&self, address: &EventAddress) -> Result<Vec<Note>, TreeError> {
        let state = self.state();
        let mut idx = *state
            .index
            .get(address)
            .ok_or_else(|| TreeError::NotRegistered(address.clone()))?;

        let mut path = Vec::new();
        loop {
            let node = &state.nodes[idx];
            let note = state
                .events
                .get(&node.address)
                .ok_or_else(|| TreeError::MissingAncestor(node.address.clone()))?;
            path.push(note.clone());
            match node.parent {
                Some(parent) => idx = parent,
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Splice a known event under an already-resolved parent
    ///
    /// For content arriving through push channels outside the
    /// pull-based walk. A splice lands after the parent's tag-derived
    /// children; an existing slot just has its cached event refreshed.
    /// The parent must be resolved: every registered node's ancestor
    /// chain has cached events, and observers rely on that.
    pub fn add_event(&self, note: Note, parent: &EventAddress) -> Result<EventAddress, TreeError> {
        let address = EventAddress::from_note(&note)?;
        let child_addrs = a_tag_addresses(&note);
        let node_type = classify(note.kind as u32, !child_addrs.is_empty());
        let title = note.title().map(str::to_string);

        let newly_resolved = {
            let mut state = self.state();
            let parent_idx = *state
                .index
                .get(parent)
                .ok_or_else(|| TreeError::ParentNotRegistered(parent.clone()))?;
            if !state.nodes[parent_idx].is_resolved() {
                return Err(TreeError::ParentNotResolved(parent.clone()));
            }

            let idx = match state.index.get(&address).copied() {
                Some(idx) => idx,
                None => add_pending(&mut state, address.clone(), parent_idx),
            };

            state.events.insert(address.clone(), note);
            if !state.nodes[idx].is_resolved() {
                state.nodes[idx].resolve(title, node_type);
                if node_type == NodeType::Branch {
                    register_children(&mut state, idx, child_addrs);
                }
                true
            } else {
                false
            }
        };

        if newly_resolved {
            self.notify_resolved(&address);
        }
        Ok(address)
    }

    /// Register a not-yet-fetched child under an already-resolved
    /// parent
    pub fn add_event_by_address(
        &self,
        address: EventAddress,
        parent: &EventAddress,
    ) -> Result<(), TreeError> {
        let mut state = self.state();
        let parent_idx = *state
            .index
            .get(parent)
            .ok_or_else(|| TreeError::ParentNotRegistered(parent.clone()))?;
        if !state.nodes[parent_idx].is_resolved() {
            return Err(TreeError::ParentNotResolved(parent.clone()));
        }

        if !state.index.contains_key(&address) {
            add_pending(&mut state, address, parent_idx);
        }
        Ok(())
    }

    /// Relocate the traversal cursor's target
    ///
    /// Forces resolution of the target if needed; the next
    /// [`next`](Self::next) or [`previous`](Self::previous) call
    /// starts at this address regardless of prior cursor state. No
    /// other resolved state is touched.
    pub async fn set_bookmark(&self, address: &EventAddress) -> Result<(), TreeError> {
        self.event(address).await?;

        let mut state = self.state();
        if !state.index.contains_key(address) {
            return Err(TreeError::Unreachable(address.clone()));
        }
        state.bookmark = Some(address.clone());
        state.cursor = None;
        Ok(())
    }

    /// Current bookmark, if any
    pub fn bookmark(&self) -> Option<EventAddress> {
        self.state().bookmark.clone()
    }

    /// Advance the cursor to the next leaf in document order
    ///
    /// The first call (or the first after a bookmark move) establishes
    /// the cursor at the bookmark - or the first document-order leaf -
    /// and yields that node without advancing. `Ok(None)` means the
    /// walk is done.
    pub async fn next(&self) -> Result<Option<TraversalItem>, TreeError> {
        self.step(Direction::Forward).await
    }

    /// Move the cursor to the previous leaf in document order
    pub async fn previous(&self) -> Result<Option<TraversalItem>, TreeError> {
        self.step(Direction::Backward).await
    }

    /// The document-order walk as a stream, driving
    /// [`next`](Self::next) until done
    pub fn sections(self: Arc<Self>) -> impl Stream<Item = Result<TraversalItem, TreeError>> {
        futures_util::stream::unfold(self, |tree| async move {
            match tree.next().await {
                Ok(Some(item)) => Some((Ok(item), tree)),
                Ok(None) => None,
                Err(e) => Some((Err(e), tree)),
            }
        })
    }

    /// Register an observer invoked (synchronously) every time a
    /// node's event resolves
    ///
    /// Callbacks must not register or remove observers from within
    /// the notification.
    pub fn on_node_resolved<F>(&self, callback: F) -> ObserverId
    where
        F: Fn(&EventAddress) + Send + Sync + 'static,
    {
        ObserverId(self.observers().insert(Box::new(callback)))
    }

    /// Remove a previously registered observer
    pub fn remove_observer(&self, id: ObserverId) {
        self.observers().try_remove(id.0);
    }

    // --- Private helpers ---

    fn state(&self) -> MutexGuard<'_, TreeState> {
        self.state.lock().expect("tree state poisoned")
    }

    fn observers(&self) -> MutexGuard<'_, Slab<ObserverFn>> {
        self.observers.lock().expect("observer registry poisoned")
    }

    fn count_status(&self, status: NodeStatus) -> usize {
        self.state()
            .nodes
            .iter()
            .filter(|n| n.status == status)
            .count()
    }

    fn address_of(&self, idx: usize) -> EventAddress {
        self.state().nodes[idx].address.clone()
    }

    /// The memoized fetch for an address, creating it on first use
    fn fetch_lazy(&self, address: &EventAddress) -> Arc<Lazy<FetchOutcome>> {
        let mut fetches = self.fetches.lock().expect("fetch registry poisoned");
        fetches
            .entry(address.clone())
            .or_insert_with(|| {
                let source = Arc::clone(&self.source);
                let address = address.clone();
                Arc::new(Lazy::new(
                    async move { source.fetch_event(&address).await },
                ))
            })
            .clone()
    }

    /// Resolve a registered address: fetch its event (at most once),
    /// classify it, cache it, and register its children in tag order
    ///
    /// Fetch failures and missing events become Error-status leaves;
    /// traversal continues past them. Returns the node's arena index.
    async fn resolve(&self, address: &EventAddress) -> Result<usize, TreeError> {
        let idx = {
            let state = self.state();
            let idx = *state
                .index
                .get(address)
                .ok_or_else(|| TreeError::NotRegistered(address.clone()))?;
            if !state.nodes[idx].is_pending() {
                return Ok(idx);
            }
            idx
        };

        let outcome = self.fetch_lazy(address).get().await;

        let newly_resolved = {
            let mut state = self.state();
            if !state.nodes[idx].is_pending() {
                // Another caller finished registration while we awaited
                false
            } else {
                match outcome {
                    Ok(Some(note)) => {
                        let child_addrs = a_tag_addresses(&note);
                        let node_type = classify(note.kind as u32, !child_addrs.is_empty());
                        let title = note.title().map(str::to_string);
                        state.nodes[idx].resolve(title, node_type);
                        state.events.insert(address.clone(), note);
                        if node_type == NodeType::Branch {
                            register_children(&mut state, idx, child_addrs);
                        }
                        true
                    }
                    Ok(None) => {
                        warn!("no event found for {}", address);
                        state.nodes[idx].mark_error();
                        false
                    }
                    Err(e) => {
                        warn!("fetch failed for {}: {}", address, e);
                        state.nodes[idx].mark_error();
                        false
                    }
                }
            }
        };

        if newly_resolved {
            debug!("resolved {}", address);
            self.notify_resolved(address);
        }
        Ok(idx)
    }

    /// One step of the depth-first search behind [`event`]: resolve
    /// the next pending node in DFS order
    ///
    /// [`event`]: Self::event
    async fn search_step(&self) -> Result<SearchStep, TreeError> {
        let next_pending = {
            let state = self.state();
            let mut stack = vec![state.root];
            let mut visited = HashSet::new();
            let mut found = None;
            while let Some(idx) = stack.pop() {
                if !visited.insert(idx) {
                    continue;
                }
                let node = &state.nodes[idx];
                if node.is_pending() {
                    found = Some(node.address.clone());
                    break;
                }
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
            found
        };

        match next_pending {
            Some(addr) => {
                self.resolve(&addr).await?;
                Ok(SearchStep::Advanced)
            }
            None => Ok(SearchStep::Exhausted),
        }
    }

    /// Establish the cursor for a first traversal call: at the
    /// bookmark if set, else the first document-order leaf
    async fn establish_cursor(&self) -> Result<usize, TreeError> {
        let bookmark = self.bookmark();
        let idx = match bookmark {
            Some(addr) => {
                self.resolve(&addr).await?;
                let state = self.state();
                *state
                    .index
                    .get(&addr)
                    .ok_or_else(|| TreeError::NotRegistered(addr.clone()))?
            }
            None => {
                let root = self.state().root;
                self.descend(root, Direction::Forward).await?
            }
        };
        self.state().cursor = Some(idx);
        Ok(idx)
    }

    /// Raymond Chen's iterative walk: move to the next (or previous)
    /// sibling and descend to its first (or last) leaf; with no
    /// sibling, retry from the parent. At the root, the walk is done.
    async fn step(&self, dir: Direction) -> Result<Option<TraversalItem>, TreeError> {
        let cursor = self.state().cursor;
        let mut at = match cursor {
            Some(idx) => idx,
            None => {
                let idx = self.establish_cursor().await?;
                return Ok(Some(self.item_at(idx)));
            }
        };

        // A cursor sitting on a branch (bookmark jump onto an index
        // node) continues into its own subtree when walking forward
        if matches!(dir, Direction::Forward) {
            let first_child = {
                let state = self.state();
                let node = &state.nodes[at];
                if node.is_branch() {
                    node.children.first().copied()
                } else {
                    None
                }
            };
            if let Some(child) = first_child {
                let leaf = self.descend(child, dir).await?;
                self.state().cursor = Some(leaf);
                return Ok(Some(self.item_at(leaf)));
            }
        }

        loop {
            let sibling = {
                let state = self.state();
                let node = &state.nodes[at];
                match node.parent {
                    None => return Ok(None), // reached the root: done
                    Some(parent) => {
                        let siblings = &state.nodes[parent].children;
                        let pos = siblings
                            .iter()
                            .position(|&c| c == at)
                            .expect("parent/child links out of sync");
                        let next = match dir {
                            Direction::Forward => siblings.get(pos + 1).copied(),
                            Direction::Backward => pos.checked_sub(1).map(|p| siblings[p]),
                        };
                        (parent, next)
                    }
                }
            };

            match sibling {
                (_, Some(next)) => {
                    let leaf = self.descend(next, dir).await?;
                    self.state().cursor = Some(leaf);
                    return Ok(Some(self.item_at(leaf)));
                }
                (parent, None) => at = parent,
            }
        }
    }

    /// Resolve downward from `idx` to its first (forward) or last
    /// (backward) reachable leaf
    async fn descend(&self, start: usize, dir: Direction) -> Result<usize, TreeError> {
        let mut idx = start;
        loop {
            let address = self.address_of(idx);
            self.resolve(&address).await?;

            let next = {
                let state = self.state();
                let node = &state.nodes[idx];
                if node.is_branch() {
                    match dir {
                        Direction::Forward => node.children.first().copied(),
                        Direction::Backward => node.children.last().copied(),
                    }
                } else {
                    None
                }
            };
            match next {
                Some(child) => idx = child,
                None => return Ok(idx),
            }
        }
    }

    fn item_at(&self, idx: usize) -> TraversalItem {
        let state = self.state();
        let node = &state.nodes[idx];
        match state.events.get(&node.address) {
            Some(note) if !node.is_error() => TraversalItem::Section {
                address: node.address.clone(),
                note: note.clone(),
            },
            _ => TraversalItem::Gap {
                address: node.address.clone(),
            },
        }
    }

    fn notify_resolved(&self, address: &EventAddress) {
        let observers = self.observers();
        for (_, callback) in observers.iter() {
            callback(address);
        }
    }
}

enum SearchStep {
    Advanced,
    Exhausted,
}

/// Parse the ordered child addresses out of a note's a-tags,
/// skipping (and logging) malformed entries
fn a_tag_addresses(note: &Note) -> Vec<EventAddress> {
    note.tag_values("a")
        .filter_map(|value| match EventAddress::from_a_tag(value) {
            Ok(addr) => Some(addr),
            Err(e) => {
                warn!("failed to parse a-tag '{}': {}", value, e);
                None
            }
        })
        .collect()
}

fn classify(kind: u32, has_children: bool) -> NodeType {
    if is_index_kind(kind) && has_children {
        NodeType::Branch
    } else {
        NodeType::Leaf
    }
}

/// Add a pending node under a parent
///
/// An address that is already registered keeps its first parent and is
/// not attached again: relay-supplied a-tag graphs can reference one
/// address from several branches, or cycle back to an ancestor, and
/// the arena must stay a tree for the sibling walk to terminate.
fn add_pending(state: &mut TreeState, address: EventAddress, parent_idx: usize) -> usize {
    if let Some(&existing) = state.index.get(&address) {
        return existing;
    }

    let order = state.nodes[parent_idx].children.len();
    let idx = state.nodes.len();
    state
        .nodes
        .push(TreeNode::new_pending(address.clone(), Some(parent_idx), order));
    state.index.insert(address, idx);
    state.nodes[parent_idx].children.push(idx);
    idx
}

/// Register a resolved node's children, preserving a-tag order
fn register_children(state: &mut TreeState, parent_idx: usize, addrs: Vec<EventAddress>) {
    for addr in addrs {
        add_pending(state, addr, parent_idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_nostr::Pubkey;

    fn addr(kind: u32, dtag: &str) -> EventAddress {
        EventAddress::new(kind, Pubkey::new([0xaa; 32]), dtag)
    }

    fn state_with(nodes: Vec<TreeNode>) -> TreeState {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.address.clone(), i))
            .collect();
        TreeState {
            nodes,
            index,
            events: HashMap::new(),
            root: 0,
            cursor: None,
            bookmark: None,
        }
    }

    #[test]
    fn add_pending_preserves_registration_order() {
        let mut state = state_with(vec![TreeNode::new_root(
            addr(30040, "root"),
            None,
            NodeType::Branch,
        )]);

        register_children(
            &mut state,
            0,
            vec![addr(30041, "one"), addr(30041, "two"), addr(30041, "three")],
        );

        let children: Vec<&str> = state.nodes[0]
            .children
            .iter()
            .map(|&i| state.nodes[i].address.dtag.as_str())
            .collect();
        assert_eq!(children, vec!["one", "two", "three"]);
        assert_eq!(state.nodes[2].order, 1);
    }

    #[test]
    fn duplicate_address_reuses_slot() {
        let mut state = state_with(vec![TreeNode::new_root(
            addr(30040, "root"),
            None,
            NodeType::Branch,
        )]);

        let first = add_pending(&mut state, addr(30041, "dup"), 0);
        let second = add_pending(&mut state, addr(30041, "dup"), 0);

        assert_eq!(first, second);
        assert_eq!(state.nodes[0].children, vec![first]);
    }

    #[test]
    fn shared_address_keeps_first_parent() {
        let mut state = state_with(vec![
            TreeNode::new_root(addr(30040, "root"), None, NodeType::Branch),
            TreeNode::new_pending(addr(30040, "left"), Some(0), 0),
            TreeNode::new_pending(addr(30040, "right"), Some(0), 1),
        ]);

        let first = add_pending(&mut state, addr(30041, "shared"), 1);
        let second = add_pending(&mut state, addr(30041, "shared"), 2);

        assert_eq!(first, second);
        assert_eq!(state.nodes[first].parent, Some(1));
        assert_eq!(state.nodes[1].children, vec![first]);
        assert!(state.nodes[2].children.is_empty());
    }

    #[test]
    fn classify_requires_index_kind_and_children() {
        assert_eq!(classify(30040, true), NodeType::Branch);
        assert_eq!(classify(30040, false), NodeType::Leaf);
        assert_eq!(classify(30041, true), NodeType::Leaf);
    }
}
