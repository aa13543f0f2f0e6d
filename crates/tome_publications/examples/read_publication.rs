//! Example: Walk a publication in reading order
//!
//! Builds a small publication in an in-memory event source, streams
//! its sections through the lazy tree cursor, and prints the table of
//! contents the projector derives along the way.
//!
//! Run with: cargo run --example read_publication -p tome_publications

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tome_nostr::{Filter, Note, NoteId, Pubkey};
use tome_publications::{
    EventAddress, EventSource, PublicationTree, SourceError, TocProjector, TraversalItem,
};

struct MemorySource {
    notes: Mutex<HashMap<EventAddress, Note>>,
}

#[async_trait]
impl EventSource for MemorySource {
    async fn fetch_event(&self, address: &EventAddress) -> Result<Option<Note>, SourceError> {
        println!("  [source] fetching {}", address.dtag);
        Ok(self.notes.lock().unwrap().get(address).cloned())
    }

    async fn fetch_events(&self, filter: &Filter) -> Result<Vec<Note>, SourceError> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .values()
            .filter(|n| filter.matches_kind(n.kind))
            .cloned()
            .collect())
    }
}

fn note(kind: u64, dtag: &str, title: &str, children: &[&EventAddress], content: &str) -> Note {
    let mut id = [0u8; 32];
    for (i, b) in dtag.bytes().take(32).enumerate() {
        id[i] = b;
    }

    let mut tags = vec![
        vec!["d".to_string(), dtag.to_string()],
        vec!["title".to_string(), title.to_string()],
    ];
    for child in children {
        tags.push(vec!["a".to_string(), child.to_string_format()]);
    }

    Note {
        id: NoteId::new(id),
        pubkey: Pubkey::new([0xab; 32]),
        created_at: 1_714_000_000,
        kind,
        tags,
        content: content.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let author = Pubkey::new([0xab; 32]);
    let part = EventAddress::new(30040, author, "fg-part-one");
    let ch1 = EventAddress::new(30041, author, "fg-finding-relays");
    let ch2 = EventAddress::new(30041, author, "fg-reading-notes");
    let epilogue = EventAddress::new(30041, author, "fg-epilogue");

    let root_note = note(
        30040,
        "field-guide",
        "A Field Guide to Nostr",
        &[&part, &epilogue],
        "",
    );
    let source = Arc::new(MemorySource {
        notes: Mutex::new(
            [
                root_note.clone(),
                note(30040, "fg-part-one", "Part One", &[&ch1, &ch2], ""),
                note(
                    30041,
                    "fg-finding-relays",
                    "Finding Relays",
                    &[],
                    "Relays come and go...",
                ),
                note(
                    30041,
                    "fg-reading-notes",
                    "Reading Notes",
                    &[],
                    "Events are signed...",
                ),
                note(
                    30041,
                    "fg-epilogue",
                    "Epilogue",
                    &[],
                    "# Epilogue\n\n## Looking Back\n\nIt was all relays.\n",
                ),
            ]
            .into_iter()
            .map(|n| (EventAddress::from_note(&n).unwrap(), n))
            .collect(),
        ),
    });

    let tree = Arc::new(PublicationTree::new(root_note, source)?);
    let root_address = tree.root_address();

    println!("Reading '{}' in document order:\n", root_address.dtag);
    while let Some(item) = tree.next().await? {
        match item {
            TraversalItem::Section { note, .. } => {
                println!("== {} ==", note.title().unwrap_or("untitled"));
            }
            TraversalItem::Gap { address } => {
                println!("== [content unavailable: {}] ==", address.dtag);
            }
        }
    }

    let toc = TocProjector::new(root_address, tree.clone(), "/publication").await?;
    toc.resolve_children(&tree.root_address()).await?;
    toc.resolve_children(&part).await?;

    // The epilogue has no tree children; its outline comes from the
    // markdown headings
    if let Some(epilogue_note) = tree.cached_event(&epilogue) {
        toc.build_from_document(&epilogue, &epilogue_note.content)?;
    }

    println!("\nTable of contents:");
    for item in toc.iter() {
        println!("{}- {}", "  ".repeat(item.depth), item.title);
    }

    Ok(())
}
