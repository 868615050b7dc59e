//! Command surface between the host shell and the player core.
//!
//! The shell (or any embedding host) translates platform events into
//! `PlayerCommand`s and sends them through a channel; the compositor drains
//! the queue at the start of every tick. The core never registers platform
//! event listeners itself.

use crate::effects::EffectKind;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;

/// Commands the host may issue. Each is synchronous from the host's point
/// of view; async flows (caption loads, preview decodes) happen internally.
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    SelectIndex(usize),
    MoveUp(usize),
    MoveDown(usize),
    Remove(usize),
    AddFiles(Vec<PathBuf>),
    /// Attach a caption track locator to a playlist entry after ingest.
    AttachCaptions { index: usize, locator: String },
    PointerMove { x: f32, y: f32 },
    PointerClick { x: f32, y: f32 },
    ChangeEffect(EffectKind),
    TogglePlayback,
    Next,
    Previous,
    CycleVolume,
}

/// Sender half handed to the host shell.
///
/// Sends are silent when the receiver is gone (widget torn down).
#[derive(Clone, Debug)]
pub struct CommandSender {
    sender: Sender<PlayerCommand>,
}

impl CommandSender {
    pub fn send(&self, cmd: PlayerCommand) {
        let _ = self.sender.send(cmd);
    }
}

/// Create the command channel pair.
pub fn command_channel() -> (CommandSender, Receiver<PlayerCommand>) {
    let (tx, rx) = unbounded();
    (CommandSender { sender: tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_and_drain() {
        let (tx, rx) = command_channel();
        tx.send(PlayerCommand::Next);
        tx.send(PlayerCommand::CycleVolume);
        assert!(matches!(rx.try_recv(), Ok(PlayerCommand::Next)));
        assert!(matches!(rx.try_recv(), Ok(PlayerCommand::CycleVolume)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_send_after_receiver_drop_is_silent() {
        let (tx, rx) = command_channel();
        drop(rx);
        tx.send(PlayerCommand::Previous);
    }
}
