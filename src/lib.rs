//! vidget - embeddable media player widget library
//!
//! Re-exports all modules for use by the shell binary and embedding hosts.

pub mod captions;
pub mod cli;
pub mod compositor;
pub mod controls;
pub mod effects;
pub mod events;
pub mod frame;
pub mod media;
pub mod paths;
pub mod playlist;
pub mod prefs;
pub mod preview;
pub mod text;
pub mod transport;

// Re-export the types a host needs to embed the widget
pub use compositor::Compositor;
pub use controls::{ControlLayout, RegionId, SURFACE_H, SURFACE_W};
pub use effects::EffectKind;
pub use events::{CommandSender, PlayerCommand};
pub use frame::{Rect, Surface};
pub use media::{ImageSequenceOpener, MediaStream, StreamOpener};
pub use playlist::{MediaRef, Playlist};
pub use transport::{Transport, TransportState};
