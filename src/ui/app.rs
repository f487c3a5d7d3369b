use eframe::egui;
use egui::Layout;
use std::sync::mpsc;

use crate::engine::engine::Engine;
use crate::engine::llm_client::LlmConfig;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::session::{Genre, Session, StoryEntry, StoryRole};
use crate::ui::settings::UiSettings;
use crate::ui::settings_io;

/* =========================
   UI State
   ========================= */

pub struct UiState {
    pub name_input: String,
    pub genre_choice: Genre,
    pub api_key: String,

    pub session: Option<Session>,
    pub busy: bool,
    pub error: Option<String>,
    pub save_feedback: Option<String>,
    pub should_auto_scroll: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            name_input: String::new(),
            genre_choice: Genre::Adventure,
            api_key: String::new(),
            session: None,
            busy: false,
            error: None,
            save_feedback: None,
            should_auto_scroll: false,
        }
    }
}

/* =========================
   App
   ========================= */

pub struct StoryApp {
    pub ui: UiState,
    pub settings: UiSettings,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl StoryApp {
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx);
            engine.run();
        });

        Self {
            ui: UiState::default(),
            settings: settings_io::load_settings(),
            cmd_tx,
            resp_rx,
        }
    }

    pub fn send_command(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_url: self.settings.api_url.clone(),
            model: self.settings.model.clone(),
            api_key: self.ui.api_key.clone(),
        }
    }

    pub fn draw_entry(&self, ui: &mut egui::Ui, entry: &StoryEntry) {
        let (color, right, text) = match entry.role {
            StoryRole::Narrator => (self.settings.color("Narrator"), false, entry.text.clone()),
            StoryRole::Player => {
                let name = self
                    .ui
                    .session
                    .as_ref()
                    .map(|s| s.player_name.as_str())
                    .unwrap_or("You");
                (
                    self.settings.color("Player"),
                    true,
                    format!("{} chose: {}", name, entry.text),
                )
            }
        };

        ui.add_space(6.0);

        if right {
            ui.with_layout(Layout::right_to_left(egui::Align::TOP), |ui| {
                bubble(ui, color, &text);
            });
        } else {
            bubble(ui, color, &text);
        }
    }
}

fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(8)
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}

/* =========================
   egui App
   ========================= */

impl eframe::App for StoryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            match resp {
                EngineResponse::SessionState(session) => {
                    self.ui.session = Some(*session);
                    self.ui.busy = false;
                    self.ui.error = None;
                    self.ui.should_auto_scroll = true;
                }
                EngineResponse::StartFailed(msg) => {
                    self.ui.busy = false;
                    self.ui.error = Some(msg);
                }
                EngineResponse::SessionCleared => {
                    self.ui.session = None;
                    self.ui.busy = false;
                    self.ui.error = None;
                    self.ui.save_feedback = None;
                }
            }
        }

        crate::ui::side_panel::draw_side_panel(ctx, self);
        crate::ui::story_panel::draw_story_panel(ctx, self);

        // Keep polling while a generation call is in flight.
        if self.ui.busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        self.ui.should_auto_scroll = false;
    }
}
