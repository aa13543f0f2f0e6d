//! Publication tree node types
//!
//! Nodes represent either branch (index) or leaf (content) events in
//! a publication tree. Nodes live in the tree's arena; parent and
//! child references are arena indices and are navigational only.

use crate::address::EventAddress;

/// Type of node in the publication tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Branch node - a 30040 index with children
    Branch,
    /// Leaf node - content (30041, 30818, or 30023)
    Leaf,
}

/// Resolution status of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Registered but not yet fetched
    Pending,
    /// Successfully fetched and classified
    Resolved,
    /// Fetch failed or event not found
    Error,
}

/// A node in the publication tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Whether this is a branch (index) or leaf (content)
    pub node_type: NodeType,

    /// Current resolution status
    pub status: NodeStatus,

    /// Event address (kind:pubkey:dtag)
    pub address: EventAddress,

    /// Arena index of the parent node (None for root)
    pub parent: Option<usize>,

    /// Arena indices of child nodes, in the parent event's a-tag
    /// order (empty for leaf nodes)
    pub children: Vec<usize>,

    /// Title extracted from event tags
    pub title: Option<String>,

    /// Position within parent's child list
    pub order: usize,
}

impl TreeNode {
    /// Create a new pending node
    pub fn new_pending(address: EventAddress, parent: Option<usize>, order: usize) -> Self {
        Self {
            node_type: NodeType::Leaf, // Default, determined on resolve
            status: NodeStatus::Pending,
            address,
            parent,
            children: Vec::new(),
            title: None,
            order,
        }
    }

    /// Create a resolved root node
    pub fn new_root(address: EventAddress, title: Option<String>, node_type: NodeType) -> Self {
        Self {
            node_type,
            status: NodeStatus::Resolved,
            address,
            parent: None,
            children: Vec::new(),
            title,
            order: 0,
        }
    }

    /// Check if this node is the root
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if this node is a leaf (content)
    pub fn is_leaf(&self) -> bool {
        self.node_type == NodeType::Leaf
    }

    /// Check if this node is a branch (index)
    pub fn is_branch(&self) -> bool {
        self.node_type == NodeType::Branch
    }

    /// Check if this node has been resolved
    pub fn is_resolved(&self) -> bool {
        self.status == NodeStatus::Resolved
    }

    /// Check if this node had an error
    pub fn is_error(&self) -> bool {
        self.status == NodeStatus::Error
    }

    /// Check if this node is pending
    pub fn is_pending(&self) -> bool {
        self.status == NodeStatus::Pending
    }

    /// Mark this node as resolved
    pub fn resolve(&mut self, title: Option<String>, node_type: NodeType) {
        self.status = NodeStatus::Resolved;
        self.title = title;
        self.node_type = node_type;
    }

    /// Mark this node as having an error
    ///
    /// Error nodes classify as leaves so traversal yields them as
    /// gaps instead of descending.
    pub fn mark_error(&mut self) {
        self.status = NodeStatus::Error;
        self.node_type = NodeType::Leaf;
    }

    /// Get display title (falls back to d-tag if no title)
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.address.dtag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_nostr::Pubkey;

    fn test_address() -> EventAddress {
        EventAddress::new(30041, Pubkey::new([0xaa; 32]), "test-section")
    }

    #[test]
    fn test_new_pending() {
        let addr = test_address();
        let node = TreeNode::new_pending(addr.clone(), Some(0), 1);

        assert!(node.is_pending());
        assert!(node.is_leaf()); // Default type
        assert!(!node.is_root());
        assert_eq!(node.order, 1);
    }

    #[test]
    fn test_resolve() {
        let addr = test_address();
        let mut node = TreeNode::new_pending(addr, Some(0), 0);

        node.resolve(Some("My Section".to_string()), NodeType::Leaf);

        assert!(node.is_resolved());
        assert!(node.is_leaf());
        assert_eq!(node.display_title(), "My Section");
    }

    #[test]
    fn test_error_nodes_are_leaves() {
        let addr = test_address();
        let mut node = TreeNode::new_pending(addr, Some(0), 0);
        node.node_type = NodeType::Branch;

        node.mark_error();

        assert!(node.is_error());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_display_title_fallback() {
        let addr = test_address();
        let node = TreeNode::new_pending(addr, None, 0);

        assert_eq!(node.display_title(), "test-section");
    }
}
