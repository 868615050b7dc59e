//! Transport controller: logical playback position, volume, and the
//! play/pause/seek commands issued to the media layer.
//!
//! The transport owns the playlist and the primary deck (one `MediaStream`).
//! It records playback intent optimistically: a platform refusal of a play
//! command (autoplay policy) is logged and absorbed, and the play/pause
//! glyph drawn each tick reconciles against the deck's live paused flag,
//! never against the recorded intent.
//!
//! Index invariant: `active < playlist.len()` whenever the playlist is
//! non-empty; violations after a mutation are corrected by clamping, never
//! surfaced. Volume and index persist to the settings store on every
//! mutation.

use crate::captions::{CaptionEntry, CaptionLoader};
use crate::frame::Surface;
use crate::media::{MediaStream, StreamOpener};
use crate::playlist::{MediaRef, Playlist};
use crate::prefs::{self, SettingsStore, KEY_INDEX, KEY_VOLUME};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

/// Fixed step for the volume cycling control.
const VOLUME_STEP: f32 = 0.2;
// 0.8 + 0.2 lands a hair above 1.0 in f32; only real overshoot wraps.
const VOLUME_WRAP_SLACK: f32 = 1e-3;

/// Logical playback state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    /// Playlist is empty; no media commands are issued, no drawing happens.
    NoMedia,
    /// A stream open is in progress for the selected item.
    Loading,
    Playing,
    Paused,
}

/// Playback-state manager over an injected media layer.
pub struct Transport {
    playlist: Playlist,
    state: TransportState,
    /// Valid only while the playlist is non-empty.
    active: usize,
    volume: f32,
    deck: Option<Box<dyn MediaStream>>,
    /// Id of the media the current deck and caption set belong to.
    active_id: Option<String>,
    opener: Arc<dyn StreamOpener>,
    captions: Vec<CaptionEntry>,
    caption_loader: CaptionLoader,
    store: Box<dyn SettingsStore>,
    /// Persisted index, applied once when the playlist first fills.
    restore_index: Option<usize>,
}

impl Transport {
    pub fn new(opener: Arc<dyn StreamOpener>, store: Box<dyn SettingsStore>) -> Self {
        let volume = prefs::load_volume(store.as_ref());
        let restore_index = Some(prefs::load_index(store.as_ref()));
        Self {
            playlist: Playlist::new(),
            state: TransportState::NoMedia,
            active: 0,
            volume,
            deck: None,
            active_id: None,
            opener,
            captions: Vec::new(),
            caption_loader: CaptionLoader::new(),
            store,
            restore_index,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.playlist.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }

    pub fn active_media(&self) -> Option<&MediaRef> {
        self.active_index().and_then(|i| self.playlist.get(i))
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn captions(&self) -> &[CaptionEntry] {
        &self.captions
    }

    /// Live paused flag from the deck, for the play/pause glyph.
    /// No deck reads as paused.
    pub fn deck_paused(&self) -> bool {
        self.deck.as_ref().map(|d| d.paused()).unwrap_or(true)
    }

    pub fn current_time(&self) -> f64 {
        self.deck.as_ref().map(|d| d.current_time()).unwrap_or(0.0)
    }

    /// 0.0 while unknown.
    pub fn duration(&self) -> f64 {
        self.deck.as_ref().map(|d| d.duration()).unwrap_or(0.0)
    }

    /// Current decoded frame from the primary deck, if ready.
    pub fn frame(&mut self) -> Option<Surface> {
        self.deck.as_mut().and_then(|d| d.frame())
    }

    // === Selection ===

    /// Activate the playlist item at `index`: open a fresh deck, apply the
    /// stored volume, attempt autoplay, and kick off the caption load.
    /// Out-of-range indices are rejected with a log line.
    pub fn select(&mut self, index: usize) {
        let Some(media) = self.playlist.get(index).cloned() else {
            warn!("select({}) out of range (len {})", index, self.playlist.len());
            return;
        };

        self.active = index;
        self.store.set(KEY_INDEX, &index.to_string());
        self.state = TransportState::Loading;
        self.captions.clear();
        self.active_id = Some(media.id.clone());

        match self.opener.open(&media.source) {
            Ok(mut deck) => {
                deck.set_volume(self.volume);
                self.state = match deck.play() {
                    Ok(()) => TransportState::Playing,
                    Err(e) => {
                        warn!("Autoplay refused for {}: {}", media.display_name, e);
                        TransportState::Paused
                    }
                };
                self.deck = Some(deck);
            }
            Err(e) => {
                warn!("Cannot open {}: {}", media.source, e);
                self.deck = None;
                self.state = TransportState::Paused;
            }
        }

        if let Some(locator) = &media.captions {
            self.caption_loader.request(&media.id, locator);
        }
        debug!("Selected {} ({})", index, media.display_name);
    }

    /// Advance to the next item with wrap-around. No-op on empty.
    pub fn next(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.select((self.active + 1) % len);
        }
    }

    /// Step to the previous item with wrap-around. No-op on empty.
    pub fn previous(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.select((self.active + len - 1) % len);
        }
    }

    // === Playback commands ===

    /// Toggle Playing/Paused. The intended state is recorded even when the
    /// platform refuses the play command; rendering reconciles against
    /// `deck_paused()` on the next tick.
    pub fn toggle(&mut self) {
        match self.state {
            TransportState::NoMedia => {}
            TransportState::Playing => {
                if let Some(deck) = self.deck.as_mut() {
                    deck.pause();
                }
                self.state = TransportState::Paused;
            }
            TransportState::Paused | TransportState::Loading => {
                if let Some(deck) = self.deck.as_mut() {
                    if let Err(e) = deck.play() {
                        warn!("Play refused: {}", e);
                    }
                }
                self.state = TransportState::Playing;
            }
        }
    }

    /// Forward a seek. Targets outside [0, duration] (or with an unknown
    /// duration) are never issued to the deck.
    pub fn seek(&mut self, seconds: f64) {
        let duration = self.duration();
        if duration <= 0.0 || seconds < 0.0 || seconds > duration {
            debug!("Seek to {:.3}s rejected (duration {:.3}s)", seconds, duration);
            return;
        }
        if let Some(deck) = self.deck.as_mut() {
            deck.seek(seconds);
        }
    }

    /// Set the volume, clamped to [0, 1], and persist it.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.store.set(KEY_VOLUME, &self.volume.to_string());
        if let Some(deck) = self.deck.as_mut() {
            deck.set_volume(self.volume);
        }
    }

    /// Advance the volume by the fixed 0.2 step, wrapping to 0 only when
    /// the new value would exceed 1.0 (reaching exactly 1.0 is retained).
    pub fn cycle_volume(&mut self) {
        let next = self.volume + VOLUME_STEP;
        let next = if next > 1.0 + VOLUME_WRAP_SLACK {
            0.0
        } else {
            next.min(1.0)
        };
        self.set_volume(next);
    }

    // === Playlist mutation ===

    /// Ingest files as playlist entries. The first fill after construction
    /// restores the persisted index (clamped); otherwise filling an empty
    /// playlist selects index 0.
    pub fn add_files(&mut self, paths: &[PathBuf]) {
        if paths.is_empty() {
            return;
        }
        let was_empty = self.playlist.is_empty();
        for path in paths {
            self.playlist.push(MediaRef::from_path(path));
        }
        if was_empty {
            let start = self
                .restore_index
                .take()
                .unwrap_or(0)
                .min(self.playlist.len() - 1);
            self.select(start);
        }
    }

    /// Attach a caption track to the entry at `index`; when that entry is
    /// active the load starts immediately.
    pub fn attach_captions(&mut self, index: usize, locator: &str) {
        let Some(media) = self.playlist.get_mut(index) else {
            warn!("attach_captions({}) out of range", index);
            return;
        };
        media.captions = Some(locator.to_string());
        let media_id = media.id.clone();
        if self.active_id.as_deref() == Some(media_id.as_str()) {
            self.caption_loader.request(&media_id, locator);
        }
    }

    /// Remove the item at `index`.
    ///
    /// Removing the active entry re-validates the index against the new
    /// length and reloads; removing an entry below the active one shifts the
    /// active index down so the same logical item keeps playing. Emptying
    /// the playlist transitions to NoMedia.
    pub fn remove(&mut self, index: usize) {
        if self.playlist.remove(index).is_none() {
            return;
        }

        if self.playlist.is_empty() {
            self.deck = None;
            self.active_id = None;
            self.active = 0;
            self.captions.clear();
            self.state = TransportState::NoMedia;
            self.store.set(KEY_INDEX, "0");
            debug!("Playlist empty, transport idle");
        } else if index == self.active {
            self.select(self.active.min(self.playlist.len() - 1));
        } else if index < self.active {
            self.active -= 1;
            self.store.set(KEY_INDEX, &self.active.to_string());
        }
    }

    /// Swap an item with its predecessor, keeping the active index pointed
    /// at the same logical item.
    pub fn move_up(&mut self, index: usize) {
        if self.playlist.move_up(index) {
            if self.active == index {
                self.active -= 1;
            } else if self.active + 1 == index {
                self.active += 1;
            }
            self.store.set(KEY_INDEX, &self.active.to_string());
        }
    }

    /// Swap an item with its successor, keeping the active index pointed at
    /// the same logical item.
    pub fn move_down(&mut self, index: usize) {
        if self.playlist.move_down(index) {
            if self.active == index {
                self.active += 1;
            } else if self.active == index + 1 {
                self.active -= 1;
            }
            self.store.set(KEY_INDEX, &self.active.to_string());
        }
    }

    // === Async result polling ===

    /// Apply resolved caption loads. Results for media that is no longer
    /// active arrive late and are dropped.
    pub fn poll_captions(&mut self) {
        while let Some(result) = self.caption_loader.try_recv() {
            if self.active_id.as_deref() == Some(result.media_id.as_str()) {
                self.captions = result.entries;
            } else {
                debug!("Dropping stale caption track for {}", result.media_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;
    use anyhow::bail;
    use std::sync::Mutex;

    /// Scripted stand-in for the platform media layer.
    struct MockStream {
        playing: bool,
        position: f64,
        duration: f64,
        volume: f32,
        refuse_play: bool,
    }

    impl MediaStream for MockStream {
        fn play(&mut self) -> anyhow::Result<()> {
            if self.refuse_play {
                bail!("autoplay blocked");
            }
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn paused(&self) -> bool {
            !self.playing
        }
        fn seek(&mut self, seconds: f64) {
            self.position = seconds;
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn current_time(&self) -> f64 {
            self.position
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn frame(&mut self) -> Option<Surface> {
            Some(Surface::new(2, 2))
        }
    }

    struct MockOpener {
        opened: Mutex<Vec<String>>,
        refuse_play: bool,
        fail_open: bool,
    }

    impl MockOpener {
        fn ok() -> Arc<Self> {
            Arc::new(Self { opened: Mutex::new(Vec::new()), refuse_play: false, fail_open: false })
        }
    }

    impl StreamOpener for MockOpener {
        fn open(&self, locator: &str) -> anyhow::Result<Box<dyn MediaStream>> {
            if self.fail_open {
                bail!("no decoder for {}", locator);
            }
            self.opened.lock().unwrap().push(locator.to_string());
            Ok(Box::new(MockStream {
                playing: false,
                position: 0.0,
                duration: 60.0,
                volume: 1.0,
                refuse_play: self.refuse_play,
            }))
        }
    }

    fn transport_with(n: usize) -> Transport {
        let mut t = Transport::new(MockOpener::ok(), Box::new(MemoryStore::new()));
        let paths: Vec<PathBuf> = (0..n).map(|i| PathBuf::from(format!("clip-{}.seq", i))).collect();
        t.add_files(&paths);
        t
    }

    #[test]
    fn test_empty_playlist_is_no_media() {
        let mut t = Transport::new(MockOpener::ok(), Box::new(MemoryStore::new()));
        assert_eq!(t.state(), TransportState::NoMedia);
        assert!(t.active_index().is_none());
        t.remove(0); // no-op
        t.next();
        t.previous();
        assert_eq!(t.state(), TransportState::NoMedia);
    }

    #[test]
    fn test_add_files_selects_first_and_plays() {
        let t = transport_with(1);
        assert_eq!(t.state(), TransportState::Playing);
        assert_eq!(t.active_index(), Some(0));
        assert!(!t.deck_paused());
    }

    #[test]
    fn test_wraparound_navigation() {
        let mut t = transport_with(4);
        assert_eq!(t.active_index(), Some(0));
        t.previous();
        assert_eq!(t.active_index(), Some(3));
        t.next();
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn test_remove_below_active_shifts_index() {
        let mut t = transport_with(4);
        t.select(2);
        let playing_id = t.active_media().unwrap().id.clone();
        t.remove(0);
        assert_eq!(t.active_index(), Some(1));
        assert_eq!(t.active_media().unwrap().id, playing_id);
    }

    #[test]
    fn test_remove_active_reclamps_and_reloads() {
        let mut t = transport_with(2);
        t.select(1);
        t.remove(1);
        assert_eq!(t.active_index(), Some(0));
        assert_eq!(t.state(), TransportState::Playing);
    }

    #[test]
    fn test_remove_last_item_goes_no_media() {
        let mut t = transport_with(1);
        t.remove(0);
        assert_eq!(t.state(), TransportState::NoMedia);
        assert!(t.active_index().is_none());
        assert!(t.frame().is_none());
    }

    #[test]
    fn test_remove_above_active_keeps_index() {
        let mut t = transport_with(3);
        t.select(0);
        let playing_id = t.active_media().unwrap().id.clone();
        t.remove(2);
        assert_eq!(t.active_index(), Some(0));
        assert_eq!(t.active_media().unwrap().id, playing_id);
    }

    #[test]
    fn test_volume_cycle_wraps_on_overshoot_only() {
        let mut t = transport_with(1);
        t.set_volume(1.0);
        t.cycle_volume();
        assert_eq!(t.volume(), 0.0);

        t.set_volume(0.6);
        t.cycle_volume();
        assert!((t.volume() - 0.8).abs() < 1e-6);

        // 0.8 -> exactly 1.0, retained rather than wrapped
        t.cycle_volume();
        assert_eq!(t.volume(), 1.0);
    }

    #[test]
    fn test_toggle_is_optimistic_but_glyph_reads_deck() {
        let opener = Arc::new(MockOpener {
            opened: Mutex::new(Vec::new()),
            refuse_play: true,
            fail_open: false,
        });
        let mut t = Transport::new(opener, Box::new(MemoryStore::new()));
        t.add_files(&[PathBuf::from("clip.seq")]);

        // Autoplay refused on select: Paused state, paused deck
        assert_eq!(t.state(), TransportState::Paused);
        assert!(t.deck_paused());

        // Toggle records Playing intent even though the deck refused
        t.toggle();
        assert_eq!(t.state(), TransportState::Playing);
        assert!(t.deck_paused());
    }

    #[test]
    fn test_open_failure_degrades_silently() {
        let opener = Arc::new(MockOpener {
            opened: Mutex::new(Vec::new()),
            refuse_play: false,
            fail_open: true,
        });
        let mut t = Transport::new(opener, Box::new(MemoryStore::new()));
        t.add_files(&[PathBuf::from("clip.seq")]);
        assert_eq!(t.state(), TransportState::Paused);
        assert!(t.frame().is_none());
        assert!(t.deck_paused());
    }

    #[test]
    fn test_seek_rejected_outside_duration() {
        let mut t = transport_with(1);
        t.seek(30.0);
        assert_eq!(t.current_time(), 30.0);
        t.seek(120.0); // duration is 60
        assert_eq!(t.current_time(), 30.0);
        t.seek(-1.0);
        assert_eq!(t.current_time(), 30.0);
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let mut t = transport_with(2);
        t.select(5);
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn test_move_follows_active_item() {
        let mut t = transport_with(3);
        t.select(1);
        let playing_id = t.active_media().unwrap().id.clone();

        t.move_up(1);
        assert_eq!(t.active_index(), Some(0));
        assert_eq!(t.active_media().unwrap().id, playing_id);

        t.move_down(0);
        assert_eq!(t.active_index(), Some(1));
        assert_eq!(t.active_media().unwrap().id, playing_id);

        // Moving a sibling across the active item shifts the index too
        t.move_down(0);
        assert_eq!(t.active_index(), Some(0));
        assert_eq!(t.active_media().unwrap().id, playing_id);
    }

    #[test]
    fn test_attach_captions_on_active_kicks_load() {
        let mut t = transport_with(2);
        t.select(0);
        // Locator does not exist: the load resolves to an empty track,
        // which must still arrive tagged with the right media id.
        t.attach_captions(0, "/nonexistent/track.json");
        for _ in 0..100 {
            t.poll_captions();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(t.captions().is_empty());
        // Attaching to an inactive entry only records the locator
        t.attach_captions(1, "later.json");
        assert_eq!(t.playlist().get(1).unwrap().captions.as_deref(), Some("later.json"));
    }

    #[test]
    fn test_persisted_index_restored_on_first_fill() {
        let mut store = MemoryStore::new();
        store.set(KEY_INDEX, "2");
        let mut t = Transport::new(MockOpener::ok(), Box::new(store));
        t.add_files(&[
            PathBuf::from("a.seq"),
            PathBuf::from("b.seq"),
            PathBuf::from("c.seq"),
        ]);
        assert_eq!(t.active_index(), Some(2));
    }

    #[test]
    fn test_persisted_index_clamped_to_length() {
        let mut store = MemoryStore::new();
        store.set(KEY_INDEX, "9");
        let mut t = Transport::new(MockOpener::ok(), Box::new(store));
        t.add_files(&[PathBuf::from("a.seq")]);
        assert_eq!(t.active_index(), Some(0));
    }
}
