//! Event addressing for NKBIP-01 publications
//!
//! Events are addressed using NIP-33 format: `kind:pubkey:d-tag`

use std::fmt;
use thiserror::Error;
use tome_nostr::{Note, Pubkey};

#[derive(Debug, Clone, Error)]
pub enum AddressError {
    #[error("Invalid address format: expected kind:pubkey:dtag")]
    InvalidFormat,

    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    #[error("Invalid pubkey: {0}")]
    InvalidPubkey(String),

    #[error("Missing d-tag")]
    MissingDTag,
}

/// NIP-33 event address in format `kind:pubkey:dtag`
///
/// The address is the join key across events, tree nodes and ToC
/// entries: two events with the same address occupy the same logical
/// content slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventAddress {
    pub kind: u32,
    pub pubkey: Pubkey,
    pub dtag: String,
}

impl EventAddress {
    /// Create a new event address
    pub fn new(kind: u32, pubkey: Pubkey, dtag: impl Into<String>) -> Self {
        Self {
            kind,
            pubkey,
            dtag: dtag.into(),
        }
    }

    /// Parse an address from an `a` tag value
    ///
    /// Format: `kind:pubkey_hex:dtag`. The d-tag itself may contain
    /// colons, so the value is split at most twice.
    pub fn from_a_tag(tag_value: &str) -> Result<Self, AddressError> {
        let parts: Vec<&str> = tag_value.splitn(3, ':').collect();

        if parts.len() < 3 {
            return Err(AddressError::InvalidFormat);
        }

        let kind = parts[0]
            .parse::<u32>()
            .map_err(|_| AddressError::InvalidKind(parts[0].to_string()))?;

        let pubkey_hex = parts[1];
        if pubkey_hex.len() != 64 {
            return Err(AddressError::InvalidPubkey(pubkey_hex.to_string()));
        }

        let pubkey = Pubkey::from_hex(pubkey_hex)
            .map_err(|_| AddressError::InvalidPubkey(pubkey_hex.to_string()))?;

        let dtag = parts[2].to_string();
        if dtag.is_empty() {
            return Err(AddressError::MissingDTag);
        }

        Ok(Self { kind, pubkey, dtag })
    }

    /// Derive the address of a note from its kind, author and d-tag
    pub fn from_note(note: &Note) -> Result<Self, AddressError> {
        let dtag = note.dtag().ok_or(AddressError::MissingDTag)?;
        Ok(Self::new(note.kind as u32, note.pubkey, dtag))
    }

    /// Convert to `a`-tag string format
    pub fn to_string_format(&self) -> String {
        format!("{}:{}:{}", self.kind, self.pubkey.hex(), self.dtag)
    }

    /// Get the pubkey as hex string
    pub fn pubkey_hex(&self) -> String {
        self.pubkey.hex()
    }
}

impl fmt::Display for EventAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_format())
    }
}

impl TryFrom<&str> for EventAddress {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_a_tag(value)
    }
}
