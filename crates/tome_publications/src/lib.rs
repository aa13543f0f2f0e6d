//! NKBIP-01 Publication Tree Support
//!
//! This crate provides the reader-side core for Nostr curated
//! publications (kinds 30040 and 30041 as defined in NKBIP-01): a
//! lazily resolved tree of addressable events with a stateful
//! depth-first cursor, and a table-of-contents projection that stays
//! in sync with tree resolution.
//!
//! # Event Kinds
//!
//! - `30040`: Publication Index - ordered list of references to content events
//! - `30041`: Publication Content - actual readable text sections
//! - `30818`: Wiki Note - wiki-style content (also supported)
//! - `30023`: Long-form Article - markdown content (also supported)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tome_publications::{PublicationTree, TraversalItem};
//!
//! // Create tree from the root index event, backed by some EventSource
//! let tree = Arc::new(PublicationTree::new(root_note, source)?);
//!
//! // Stream content sections in reading order; unreachable sections
//! // surface as gaps instead of halting the walk
//! while let Some(item) = tree.next().await? {
//!     match item {
//!         TraversalItem::Section { address, note } => println!("{address}: {}", note.content),
//!         TraversalItem::Gap { address } => println!("{address}: unavailable"),
//!     }
//! }
//! ```

pub mod address;
pub mod constants;
pub mod lazy;
pub mod node;
pub mod source;
pub mod toc;
pub mod tree;

pub use address::{AddressError, EventAddress};
pub use constants::*;
pub use lazy::Lazy;
pub use node::{NodeStatus, NodeType, TreeNode};
pub use source::{batch_filters, EventSource, SourceError};
pub use toc::{slugify, TocEntry, TocError, TocItem, TocProjector, TocSnapshot, TocSubscription};
pub use tree::{ObserverId, PublicationTree, TraversalItem, TreeError};
