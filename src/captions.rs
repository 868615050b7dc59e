//! Timed caption entries: interval lookup and asynchronous track loading.
//!
//! A caption track is a JSON array of `{start, end, text}` objects fetched
//! from a file path or http(s) URL. Any load failure degrades to an empty
//! track (logged, never fatal): playback stays usable without captions.
//!
//! **Used by**: compositor (per-tick `find_active` query), transport
//! (kicks off a load when the active media changes).

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::thread;

/// One timed text interval. Immutable once loaded; the active set is
/// replaced wholesale when the playing media changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionEntry {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (>= start)
    pub end: f64,
    /// Text content
    pub text: String,
}

/// Find the caption active at `at` seconds.
///
/// Returns the **first** entry in the sequence's given order with
/// `at >= start && at <= end` (closed on both ends). No sorting is
/// performed; on overlap the earliest-in-sequence entry wins. Linear scan:
/// caption tracks are tens to low hundreds of entries.
pub fn find_active(entries: &[CaptionEntry], at: f64) -> Option<&CaptionEntry> {
    entries.iter().find(|e| at >= e.start && at <= e.end)
}

/// A resolved caption load, tagged with the media id it was requested for
/// so stale results can be discarded on arrival.
#[derive(Debug)]
pub struct CaptionResult {
    pub media_id: String,
    pub entries: Vec<CaptionEntry>,
}

/// Asynchronous caption track loader.
///
/// Each request spawns a short-lived loader thread; the result comes back
/// over a channel polled by the owner each tick. Loads are never cancelled;
/// a result for a media that is no longer active is dropped by the caller.
#[derive(Debug)]
pub struct CaptionLoader {
    tx: Sender<CaptionResult>,
    rx: Receiver<CaptionResult>,
}

impl CaptionLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Start loading the track at `locator` for `media_id`.
    /// Returns immediately; poll `try_recv` for the result.
    pub fn request(&self, media_id: &str, locator: &str) {
        let tx = self.tx.clone();
        let media_id = media_id.to_string();
        let locator = locator.to_string();
        thread::Builder::new()
            .name("vidget-captions".into())
            .spawn(move || {
                let entries = load_track(&locator);
                debug!("Caption track for {}: {} entries", media_id, entries.len());
                // Receiver may be gone on shutdown
                let _ = tx.send(CaptionResult { media_id, entries });
            })
            .ok();
    }

    /// Non-blocking poll for the next resolved load.
    pub fn try_recv(&self) -> Option<CaptionResult> {
        self.rx.try_recv().ok()
    }
}

impl Default for CaptionLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch and parse a caption track. Failures yield an empty track.
pub fn load_track(locator: &str) -> Vec<CaptionEntry> {
    let parsed = if locator.starts_with("http://") || locator.starts_with("https://") {
        fetch_http(locator)
    } else {
        std::fs::read_to_string(Path::new(locator))
            .map_err(|e| format!("read {}: {}", locator, e))
            .and_then(|body| parse_track(&body))
    };

    match parsed {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Caption load failed ({}), using empty track: {}", locator, e);
            Vec::new()
        }
    }
}

fn fetch_http(url: &str) -> Result<Vec<CaptionEntry>, String> {
    let body = ureq::get(url)
        .call()
        .map_err(|e| format!("fetch {}: {}", url, e))?
        .into_string()
        .map_err(|e| format!("body {}: {}", url, e))?;
    parse_track(&body)
}

fn parse_track(body: &str) -> Result<Vec<CaptionEntry>, String> {
    serde_json::from_str::<Vec<CaptionEntry>>(body).map_err(|e| format!("parse: {}", e))
}
