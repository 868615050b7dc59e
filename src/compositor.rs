//! Per-tick frame compositing: the widget's orchestrator.
//!
//! Runs once per display refresh, driven by the host: drain host commands,
//! pick up resolved async results, then draw the decoded frame, the selected
//! pixel effect, the active caption, the control surface, and the hover
//! thumbnail. Each tick is independent; no step is allowed to abort the
//! ones after it, and a failure this tick (frame not ready, preview missing)
//! just leaves that layer out until the next tick.

use crate::captions;
use crate::controls::{ControlLayout, RegionId, BAR_RECT, SURFACE_H, SURFACE_W, THUMB_H, THUMB_LABEL_H, THUMB_W};
use crate::effects::{self, EffectKind};
use crate::events::{command_channel, CommandSender, PlayerCommand};
use crate::frame::{Rect, Surface};
use crate::media::StreamOpener;
use crate::prefs::SettingsStore;
use crate::preview::PreviewSampler;
use crate::text;
use crate::transport::{Transport, TransportState};
use crossbeam_channel::Receiver;
use log::trace;
use std::sync::Arc;

const CAPTION_FONT_PX: f32 = 18.0;
const CAPTION_PAD_X: f32 = 10.0;
const CAPTION_PAD_Y: f32 = 5.0;
const CAPTION_BOTTOM_MARGIN: f32 = 12.0;
const LABEL_FONT_PX: f32 = 10.0;

const BAR_BG: [u8; 4] = [0, 0, 0, 160];
const GLYPH: [u8; 4] = [235, 235, 235, 255];
const SCRUB_BG: [u8; 4] = [90, 90, 90, 255];
const SCRUB_FILL: [u8; 4] = [235, 235, 235, 255];
const CAPTION_BG: [u8; 4] = [0, 0, 0, 150];

/// Volume level bar, to the right of the volume button.
const VOLUME_BAR: Rect = Rect::new(152.0, 336.0, 40.0, 8.0);

/// The frame-compositing and hit-testing control loop.
pub struct Compositor {
    surface: Surface,
    layout: ControlLayout,
    transport: Transport,
    preview: PreviewSampler,
    effect: EffectKind,
    /// Last known pointer position, from the host's move events.
    pointer: Option<(f32, f32)>,
    commands: Receiver<PlayerCommand>,
    /// NoMedia clears the surface once, then idles.
    cleared: bool,
    /// Detects active-media changes to drop stale preview samples.
    last_media_id: Option<String>,
}

impl Compositor {
    /// Build the widget core. The same opener serves the transport's primary
    /// deck and the preview worker's independent secondary deck.
    pub fn new(
        opener: Arc<dyn StreamOpener>,
        store: Box<dyn SettingsStore>,
    ) -> (Self, CommandSender) {
        let (tx, rx) = command_channel();
        let compositor = Self {
            surface: Surface::new(SURFACE_W, SURFACE_H),
            layout: ControlLayout::new(),
            transport: Transport::new(Arc::clone(&opener), store),
            preview: PreviewSampler::new(opener),
            effect: EffectKind::None,
            pointer: None,
            commands: rx,
            cleared: false,
            last_media_id: None,
        };
        (compositor, tx)
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// One display-refresh tick.
    pub fn tick(&mut self) {
        self.drain_commands();
        self.transport.poll_captions();
        self.reset_preview_on_media_change();

        if self.transport.state() == TransportState::NoMedia {
            if !self.cleared {
                self.surface.fill([0, 0, 0, 255]);
                self.cleared = true;
                trace!("Surface cleared, idling in NoMedia");
            }
            return;
        }
        self.cleared = false;

        // A frame that is not ready keeps last tick's pixels on screen:
        // drawing stale state beats flashing black.
        if let Some(frame) = self.transport.frame() {
            let dst = Rect::new(0.0, 0.0, SURFACE_W as f32, SURFACE_H as f32);
            self.surface.blit_scaled(&frame, dst);
        }

        effects::apply(self.surface.pixels_mut(), self.effect);

        self.draw_caption();
        self.draw_control_bar();
        self.draw_preview();
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            self.handle(cmd);
        }
    }

    fn handle(&mut self, cmd: PlayerCommand) {
        match cmd {
            PlayerCommand::SelectIndex(i) => self.transport.select(i),
            PlayerCommand::MoveUp(i) => self.transport.move_up(i),
            PlayerCommand::MoveDown(i) => self.transport.move_down(i),
            PlayerCommand::Remove(i) => self.transport.remove(i),
            PlayerCommand::AddFiles(paths) => self.transport.add_files(&paths),
            PlayerCommand::AttachCaptions { index, locator } => {
                self.transport.attach_captions(index, &locator)
            }
            PlayerCommand::PointerMove { x, y } => self.pointer = Some((x, y)),
            PlayerCommand::PointerClick { x, y } => self.click(x, y),
            PlayerCommand::ChangeEffect(kind) => self.effect = kind,
            PlayerCommand::TogglePlayback => self.transport.toggle(),
            PlayerCommand::Next => self.transport.next(),
            PlayerCommand::Previous => self.transport.previous(),
            PlayerCommand::CycleVolume => self.transport.cycle_volume(),
        }
    }

    fn click(&mut self, x: f32, y: f32) {
        self.pointer = Some((x, y));
        match self.layout.resolve_region(x, y) {
            Some(RegionId::Previous) => self.transport.previous(),
            Some(RegionId::PlayPause) => self.transport.toggle(),
            Some(RegionId::Next) => self.transport.next(),
            Some(RegionId::Volume) => self.transport.cycle_volume(),
            Some(RegionId::ScrubBar) => {
                let duration = self.transport.duration();
                if duration > 0.0 {
                    self.transport.seek(self.layout.scrub_time(x, duration));
                }
            }
            None => {}
        }
    }

    fn reset_preview_on_media_change(&mut self) {
        let current = self.transport.active_media().map(|m| m.id.clone());
        if current != self.last_media_id {
            self.preview.clear();
            self.last_media_id = current;
        }
    }

    fn draw_caption(&mut self) {
        let at = self.transport.current_time();
        let Some(entry) = captions::find_active(self.transport.captions(), at) else {
            return;
        };
        let patch = text::render_text(&entry.text, CAPTION_FONT_PX);
        let w = patch.width() as f32 + CAPTION_PAD_X * 2.0;
        let h = patch.height() as f32 + CAPTION_PAD_Y * 2.0;
        let x = (SURFACE_W as f32 - w) / 2.0;
        let y = BAR_RECT.y - h - CAPTION_BOTTOM_MARGIN;
        self.surface.fill_rect(Rect::new(x, y, w, h), CAPTION_BG);
        self.surface.blit_alpha(&patch, (x + CAPTION_PAD_X) as i32, (y + CAPTION_PAD_Y) as i32);
    }

    fn draw_control_bar(&mut self) {
        self.surface.fill_rect(BAR_RECT, BAR_BG);

        // Previous: left-pointing triangle with a stop bar
        let r = self.layout.rect(RegionId::Previous);
        self.surface.fill_rect(Rect::new(r.x, r.y + 2.0, 4.0, r.h - 4.0), GLYPH);
        self.surface.fill_triangle(
            [(r.x + r.w, r.y), (r.x + r.w, r.y + r.h), (r.x + 6.0, r.y + r.h / 2.0)],
            GLYPH,
        );

        // Play/pause, chosen by the live paused flag, never recorded intent
        let r = self.layout.rect(RegionId::PlayPause);
        if self.transport.deck_paused() {
            self.surface.fill_triangle(
                [(r.x, r.y), (r.x, r.y + r.h), (r.x + r.w, r.y + r.h / 2.0)],
                GLYPH,
            );
        } else {
            self.surface.fill_rect(Rect::new(r.x + 4.0, r.y, 8.0, r.h), GLYPH);
            self.surface.fill_rect(Rect::new(r.x + r.w - 12.0, r.y, 8.0, r.h), GLYPH);
        }

        // Next: right-pointing triangle with a stop bar
        let r = self.layout.rect(RegionId::Next);
        self.surface.fill_triangle(
            [(r.x, r.y), (r.x, r.y + r.h), (r.x + r.w - 6.0, r.y + r.h / 2.0)],
            GLYPH,
        );
        self.surface.fill_rect(Rect::new(r.x + r.w - 4.0, r.y + 2.0, 4.0, r.h - 4.0), GLYPH);

        // Volume: speaker body + cone
        let r = self.layout.rect(RegionId::Volume);
        self.surface.fill_rect(Rect::new(r.x + 2.0, r.y + 8.0, 8.0, r.h - 16.0), GLYPH);
        self.surface.fill_triangle(
            [(r.x + 10.0, r.y + r.h / 2.0), (r.x + 20.0, r.y + 2.0), (r.x + 20.0, r.y + r.h - 2.0)],
            GLYPH,
        );

        // Volume level bar proportional to the stored volume
        self.surface.fill_rect(VOLUME_BAR, SCRUB_BG);
        let level = VOLUME_BAR.w * self.transport.volume();
        self.surface.fill_rect(Rect::new(VOLUME_BAR.x, VOLUME_BAR.y, level, VOLUME_BAR.h), GLYPH);

        // Two-tone scrub bar; fill fraction is 0 while duration is unknown
        let scrub = self.layout.rect(RegionId::ScrubBar);
        self.surface.fill_rect(scrub, SCRUB_BG);
        let duration = self.transport.duration();
        let fraction = if duration > 0.0 {
            (self.transport.current_time() / duration).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        self.surface.fill_rect(
            Rect::new(scrub.x, scrub.y, scrub.w * fraction, scrub.h),
            SCRUB_FILL,
        );
    }

    fn draw_preview(&mut self) {
        let Some((px, py)) = self.pointer else { return };
        let scrub = self.layout.rect(RegionId::ScrubBar);
        if !scrub.contains(px, py) {
            return;
        }

        let duration = self.transport.duration();
        if duration > 0.0 {
            if let Some(media) = self.transport.active_media() {
                let source = media.source.clone();
                let time = self.layout.scrub_time(px, duration);
                self.preview.request(&source, time);
            }
        }

        let Some(sample) = self.preview.poll().cloned() else { return };

        let x = (px - THUMB_W / 2.0)
            .clamp(0.0, SURFACE_W as f32 - THUMB_W);
        let y = scrub.y - THUMB_H - 8.0;
        self.surface.blit_scaled(&sample.frame, Rect::new(x, y, THUMB_W, THUMB_H));

        // Opaque timecode strip along the thumbnail's bottom edge
        let strip = Rect::new(x, y + THUMB_H - THUMB_LABEL_H, THUMB_W, THUMB_LABEL_H);
        self.surface.fill_rect(strip, [0, 0, 0, 255]);
        let label = text::render_text(&text::format_timecode(sample.time), LABEL_FONT_PX);
        let label_x = x + (THUMB_W - label.width() as f32) / 2.0;
        self.surface.blit_alpha(&label, label_x as i32, strip.y as i32);
    }
}
