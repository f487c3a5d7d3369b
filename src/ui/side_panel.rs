use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::ui::app::StoryApp;
use crate::ui::settings_io;

pub fn draw_side_panel(ctx: &egui::Context, app: &mut StoryApp) {
    egui::SidePanel::left("settings")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Game Settings");
            ui.add_space(4.0);

            ui.label("Hugging Face API Key");
            ui.add(egui::TextEdit::singleline(&mut app.ui.api_key).password(true));

            let mut changed = false;

            ui.collapsing("Model", |ui| {
                ui.label("Model ID");
                changed |= ui.text_edit_singleline(&mut app.settings.model).changed();
                ui.label("Endpoint");
                changed |= ui.text_edit_singleline(&mut app.settings.api_url).changed();
            });

            ui.label("UI Scale");
            changed |= ui
                .add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0))
                .changed();

            if changed {
                settings_io::save_settings(&app.settings);
            }

            ui.add_space(8.0);

            if ui.button("Reset Game").clicked() {
                app.send_command(EngineCommand::Reset);
            }

            ui.separator();
            ui.heading("How to Play");
            ui.label("1. Enter your name and select a genre");
            ui.label("2. Read the story that unfolds");
            ui.label("3. Make choices to shape your adventure");
            ui.label("4. After 20 choices, your story will conclude");
            ui.label("5. Save your complete adventure!");
        });
}
