//! Desktop demo shell for the vidget player core.
//!
//! The shell is a thin adapter: it displays the composited surface as a
//! texture, translates pointer/key/file events into `PlayerCommand`s, and
//! owns no playback state of its own. Everything interesting happens in
//! `vidget::Compositor`.

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{debug, info};
use std::sync::Arc;

use vidget::cli::Args;
use vidget::compositor::Compositor;
use vidget::effects::EffectKind;
use vidget::events::{CommandSender, PlayerCommand};
use vidget::media::ImageSequenceOpener;
use vidget::paths::{self, PathConfig};
use vidget::prefs::JsonFileStore;
use vidget::{SURFACE_H, SURFACE_W};

struct ShellApp {
    compositor: Compositor,
    commands: CommandSender,
    texture: Option<egui::TextureHandle>,
}

impl ShellApp {
    fn new(compositor: Compositor, commands: CommandSender) -> Self {
        Self { compositor, commands, texture: None }
    }

    fn surface_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [SURFACE_W, SURFACE_H],
            self.compositor.surface().pixels(),
        )
    }

    fn playlist_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Playlist");
        if ui.button("Add files…").clicked() {
            if let Some(paths) = rfd::FileDialog::new().pick_files() {
                self.commands.send(PlayerCommand::AddFiles(paths));
            }
        }
        ui.separator();

        let items: Vec<(usize, String)> = self
            .compositor
            .transport()
            .playlist()
            .iter()
            .enumerate()
            .map(|(i, m)| (i, m.display_name.clone()))
            .collect();
        let active = self.compositor.transport().active_index();

        for (i, name) in items {
            ui.horizontal(|ui| {
                let label = if active == Some(i) {
                    format!("▶ {}", name)
                } else {
                    name.clone()
                };
                if ui.selectable_label(active == Some(i), label).clicked() {
                    self.commands.send(PlayerCommand::SelectIndex(i));
                }
                if ui.small_button("↑").clicked() {
                    self.commands.send(PlayerCommand::MoveUp(i));
                }
                if ui.small_button("↓").clicked() {
                    self.commands.send(PlayerCommand::MoveDown(i));
                }
                if ui.small_button("✕").clicked() {
                    self.commands.send(PlayerCommand::Remove(i));
                }
            });
        }

        ui.separator();
        ui.label("Effect");
        let current = self.compositor.effect();
        for kind in EffectKind::all() {
            if ui.selectable_label(current == *kind, kind.display_name()).clicked() {
                self.commands.send(PlayerCommand::ChangeEffect(*kind));
            }
        }
    }

    /// Map a pointer position on the displayed image back into the widget's
    /// 640x360 logical space.
    fn to_surface_coords(rect: egui::Rect, pos: egui::Pos2) -> (f32, f32) {
        let x = (pos.x - rect.min.x) / rect.width() * SURFACE_W as f32;
        let y = (pos.y - rect.min.y) / rect.height() * SURFACE_H as f32;
        (x, y)
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Dropped files become playlist entries
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            debug!("Ingesting {} dropped file(s)", dropped.len());
            self.commands.send(PlayerCommand::AddFiles(dropped));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.commands.send(PlayerCommand::TogglePlayback);
        }

        egui::SidePanel::left("playlist").show(ctx, |ui| self.playlist_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            // Tick before upload so the texture shows this frame's state
            self.compositor.tick();
            let image = self.surface_image();
            let texture = match &mut self.texture {
                Some(t) => {
                    t.set(image, egui::TextureOptions::NEAREST);
                    t.clone()
                }
                None => {
                    let t = ui.ctx().load_texture("vidget-surface", image, egui::TextureOptions::NEAREST);
                    self.texture = Some(t.clone());
                    t
                }
            };

            let response = ui.add(
                egui::Image::new(&texture)
                    .fit_to_exact_size(ui.available_size())
                    .sense(egui::Sense::click()),
            );

            if let Some(pos) = response.hover_pos() {
                let (x, y) = Self::to_surface_coords(response.rect, pos);
                self.commands.send(PlayerCommand::PointerMove { x, y });
            }
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = Self::to_surface_coords(response.rect, pos);
                    self.commands.send(PlayerCommand::PointerClick { x, y });
                }
            }
        });

        // Keep ticking at display cadence even without input events
        ctx.request_repaint();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level().to_string()),
    )
    .filter_module("egui", log::LevelFilter::Info)
    .format_timestamp_millis()
    .init();

    info!("vidget starting");

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    paths::ensure_dirs(&path_config).context("settings directory unavailable")?;
    let mut store = JsonFileStore::open(&paths::config_file("vidget.json", &path_config))
        .context("settings store unavailable")?;

    // CLI volume overrides the persisted one for this and later sessions
    if let Some(v) = args.volume {
        use vidget::prefs::{SettingsStore, KEY_VOLUME};
        store.set(KEY_VOLUME, &v.clamp(0.0, 1.0).to_string());
    }

    let (compositor, commands) = Compositor::new(Arc::new(ImageSequenceOpener), Box::new(store));

    if !args.sources.is_empty() {
        commands.send(PlayerCommand::AddFiles(args.sources.clone()));
        if let Some(track) = &args.captions {
            commands.send(PlayerCommand::AttachCaptions { index: 0, locator: track.clone() });
        }
    }
    if let Some(name) = &args.effect {
        match EffectKind::from_name(name) {
            Some(kind) => commands.send(PlayerCommand::ChangeEffect(kind)),
            None => log::warn!("Unknown effect '{}', ignoring", name),
        }
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("vidget v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([960.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "vidget",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ShellApp::new(compositor, commands)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with error: {}", e))
}
