//! NKBIP-01 event kinds
//!
//! Kind numbers are protocol constants. Classification decides how
//! the tree treats a node: index kinds can branch, content kinds are
//! read as sections.

/// Publication index: its `a` tags list the sections in reading order
pub const KIND_PUBLICATION_INDEX: u32 = 30040;

/// Publication content: one readable section
pub const KIND_PUBLICATION_CONTENT: u32 = 30041;

/// Wiki article (NIP-54), usable as a section
pub const KIND_WIKI_NOTE: u32 = 30818;

/// Long-form article (NIP-23), usable as a section
pub const KIND_LONG_FORM: u32 = 30023;

/// Every kind accepted as a publication section
pub const CONTENT_KINDS: [u32; 3] = [KIND_PUBLICATION_CONTENT, KIND_WIKI_NOTE, KIND_LONG_FORM];

pub fn is_index_kind(kind: u32) -> bool {
    kind == KIND_PUBLICATION_INDEX
}

pub fn is_content_kind(kind: u32) -> bool {
    CONTENT_KINDS.contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_classify_one_way() {
        assert!(is_index_kind(KIND_PUBLICATION_INDEX));
        assert!(!is_content_kind(KIND_PUBLICATION_INDEX));
        for kind in CONTENT_KINDS {
            assert!(is_content_kind(kind));
            assert!(!is_index_kind(kind));
        }
    }
}
