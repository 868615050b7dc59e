//! Ordered playlist of media references.
//!
//! The playlist exclusively owns its `MediaRef`s; other components keep at
//! most a transient clone for the command in flight. Active-index bookkeeping
//! when items move or disappear lives in the transport, not here.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// One playable item and its metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaRef {
    /// Session-unique id: display name + ingestion timestamp. Collision
    /// resistant enough for one session, not meant to be persisted.
    pub id: String,
    pub display_name: String,
    /// Locator resolvable by the stream opener (directory or file path).
    pub source: String,
    /// Optional caption track locator (path or URL).
    pub captions: Option<String>,
}

impl MediaRef {
    pub fn new(display_name: &str, source: &str, captions: Option<String>) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or(0);
        Self {
            id: format!("{}-{}", display_name, stamp),
            display_name: display_name.to_string(),
            source: source.to_string(),
            captions,
        }
    }

    /// Build a reference from an ingested path, picking up a
    /// `<stem>.captions.json` sidecar next to the media when present.
    pub fn from_path(path: &Path) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let sidecar = path
            .file_stem()
            .map(|stem| path.with_file_name(format!("{}.captions.json", stem.to_string_lossy())))
            .filter(|p| p.exists())
            .map(|p| p.to_string_lossy().into_owned());

        Self::new(&display_name, &path.to_string_lossy(), sidecar)
    }
}

/// Ordered collection of media references.
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    items: Vec<MediaRef>,
}

impl Playlist {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaRef> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut MediaRef> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaRef> {
        self.items.iter()
    }

    pub fn push(&mut self, item: MediaRef) {
        self.items.push(item);
    }

    /// Remove and return the item at `index`; None when out of range.
    pub fn remove(&mut self, index: usize) -> Option<MediaRef> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Swap the item at `index` with its predecessor. False when impossible.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index, index - 1);
        true
    }

    /// Swap the item at `index` with its successor. False when impossible.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.items.len() {
            return false;
        }
        self.items.swap(index, index + 1);
        true
    }
}
