use crate::{Error, Pubkey};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct NoteId([u8; 32]);

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

static HRP_NOTE: bech32::Hrp = bech32::Hrp::parse_unchecked("note");

impl NoteId {
    pub fn new(bytes: [u8; 32]) -> Self {
        NoteId(bytes)
    }

    pub fn bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn hex(&self) -> String {
        hex::encode(self.bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, Error> {
        Ok(NoteId(hex::decode(hex_str)?.as_slice().try_into()?))
    }

    pub fn to_bech(&self) -> Option<String> {
        bech32::encode::<bech32::Bech32>(HRP_NOTE, &self.0).ok()
    }
}

/// A Nostr event
///
/// Tag order is preserved as received; for addressable publication
/// events the order of `a` tags carries the reading order.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Note {
    /// 32-bytes sha256 of the serialized event data
    pub id: NoteId,
    /// public key of the event creator
    pub pubkey: Pubkey,
    /// unix timestamp in seconds
    pub created_at: u64,
    /// event kind
    pub kind: u64,
    /// ordered tag list; a tag key may repeat
    pub tags: Vec<Vec<String>>,
    /// arbitrary string
    pub content: String,
}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.0.hash(state);
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Note {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(Into::into)
    }

    /// First value of the first tag named `name`
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.len() >= 2 && t[0] == name)
            .map(|t| t[1].as_str())
    }

    /// Values of every tag named `name`, in tag order
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |t| t.len() >= 2 && t[0] == name)
            .map(|t| t[1].as_str())
    }

    /// Title tag, if any
    pub fn title(&self) -> Option<&str> {
        self.tag_value("title")
    }

    /// NIP-33 d-tag identifier, if any
    pub fn dtag(&self) -> Option<&str> {
        self.tag_value("d")
    }
}

impl std::str::FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Note::from_json(s)
    }
}

impl Serialize for NoteId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NoteId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_note() -> Note {
        Note::from_json(
            r#"{
              "id": "1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a",
              "pubkey": "32e1827635450ebb3c5a7d12c1f8e7b2b514439ac10a67eef3d9fd9c5c68e245",
              "created_at": 1714000000,
              "kind": 30041,
              "tags": [
                ["d", "guide-intro"],
                ["title", "Introduction"],
                ["a", "30041:32e1827635450ebb3c5a7d12c1f8e7b2b514439ac10a67eef3d9fd9c5c68e245:guide-basics"],
                ["a", "30041:32e1827635450ebb3c5a7d12c1f8e7b2b514439ac10a67eef3d9fd9c5c68e245:guide-relays"]
              ],
              "content": "welcome"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn json_decode() {
        let note = section_note();
        assert_eq!(note.kind, 30041);
        assert_eq!(note.content, "welcome");
        assert_eq!(note.title(), Some("Introduction"));
        assert_eq!(note.dtag(), Some("guide-intro"));
    }

    #[test]
    fn repeated_tags_keep_order() {
        let note = section_note();
        let addrs: Vec<&str> = note.tag_values("a").collect();
        assert_eq!(addrs.len(), 2);
        assert!(addrs[0].ends_with("guide-basics"));
        assert!(addrs[1].ends_with("guide-relays"));
    }
}
