//! Minimal Nostr event types for tome
//!
//! Plain serde-backed value types for working with Nostr events on the
//! read side: [`Note`], [`NoteId`], [`Pubkey`] and subscription
//! [`Filter`]s. No database, no relay pool, no signing - consumers
//! bring their own transport behind the publication layer's event
//! source boundary.

mod error;
mod filter;
mod note;
mod pubkey;

pub use error::Error;
pub use filter::Filter;
pub use note::{Note, NoteId};
pub use pubkey::Pubkey;

pub type Result<T> = std::result::Result<T, error::Error>;
