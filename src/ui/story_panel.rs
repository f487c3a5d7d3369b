use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::model::session::{ChoiceSlot, Genre, Session, MAX_CHOICES};
use crate::model::transcript;
use crate::ui::app::StoryApp;

pub fn draw_story_panel(ctx: &egui::Context, app: &mut StoryApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("🔮 Interactive Story Adventure");
        ui.separator();

        // Cloned so the borrow of the session does not block the &mut app
        // the screens need for input state.
        match app.ui.session.clone() {
            None => draw_start_screen(ui, app),
            Some(session) if !session.game_over => draw_game_screen(ui, app, &session),
            Some(session) => draw_conclusion_screen(ui, app, &session),
        }
    });
}

/* =========================
   Start screen
   ========================= */

fn draw_start_screen(ui: &mut egui::Ui, app: &mut StoryApp) {
    ui.heading("Welcome to your personalized adventure!");
    ui.label(
        "This interactive story game uses AI to create a unique adventure just for you. \
         Your choices will shape the narrative and lead to different outcomes.\n\n\
         To begin, enter your name and select a genre for your adventure.",
    );
    ui.add_space(8.0);

    ui.label("Your Name");
    ui.add(egui::TextEdit::singleline(&mut app.ui.name_input).hint_text("Enter your name"));

    egui::ComboBox::from_label("Choose your story genre")
        .selected_text(app.ui.genre_choice.label())
        .show_ui(ui, |ui| {
            for genre in Genre::ALL {
                ui.selectable_value(&mut app.ui.genre_choice, genre, genre.label());
            }
        });

    ui.add_space(8.0);

    if app.ui.busy {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Creating your adventure…");
        });
        return;
    }

    if ui.button("Start Your Adventure").clicked() {
        if app.ui.name_input.trim().is_empty() {
            app.ui.error = Some("Please enter your name to start the game".into());
        } else if app.ui.api_key.trim().is_empty() {
            app.ui.error =
                Some("Please enter your Hugging Face API key to start the game".into());
        } else {
            app.ui.error = None;
            app.ui.busy = true;
            app.send_command(EngineCommand::StartGame {
                player_name: app.ui.name_input.trim().to_string(),
                genre: app.ui.genre_choice,
                config: app.llm_config(),
            });
        }
    }

    if let Some(err) = &app.ui.error {
        ui.add_space(4.0);
        ui.colored_label(egui::Color32::LIGHT_RED, err);
    }
}

/* =========================
   In-progress screen
   ========================= */

fn draw_game_screen(ui: &mut egui::Ui, app: &mut StoryApp, session: &Session) {
    ui.heading(format!(
        "{}'s {} Adventure",
        session.player_name,
        session.genre.title()
    ));

    let progress = session.choice_count as f32 / MAX_CHOICES as f32;
    ui.add(egui::ProgressBar::new(progress).text(format!(
        "Decision point: {}/{}",
        session.choice_count, MAX_CHOICES
    )));
    ui.add_space(6.0);

    draw_story_log(ui, app, session, 160.0);

    ui.separator();
    ui.heading("What will you do?");

    if app.ui.busy {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Continuing your adventure…");
        });
        return;
    }

    if let Some(choices) = &session.choices {
        let mut picked: Option<ChoiceSlot> = None;

        ui.columns(2, |cols| {
            if cols[0].button(&choices.choice1).clicked() {
                picked = Some(ChoiceSlot::First);
            }
            if cols[1].button(&choices.choice2).clicked() {
                picked = Some(ChoiceSlot::Second);
            }
        });

        if let Some(which) = picked {
            app.ui.busy = true;
            app.send_command(EngineCommand::Choose {
                which,
                config: app.llm_config(),
            });
        }
    }
}

/* =========================
   Conclusion screen
   ========================= */

fn draw_conclusion_screen(ui: &mut egui::Ui, app: &mut StoryApp, session: &Session) {
    ui.heading("🎉 Your Adventure is Complete!");
    ui.add_space(6.0);

    draw_story_log(ui, app, session, 120.0);

    ui.separator();
    ui.heading("Save Your Complete Adventure");

    if ui.button("Save adventure story…").clicked() {
        save_transcript(app, session);
    }

    if let Some(feedback) = &app.ui.save_feedback {
        ui.label(feedback);
    }

    ui.add_space(8.0);

    if ui.button("Play Again with a New Story").clicked() {
        app.send_command(EngineCommand::Reset);
    }
}

fn draw_story_log(ui: &mut egui::Ui, app: &StoryApp, session: &Session, reserved: f32) {
    let height = (ui.available_height() - reserved).max(120.0);
    egui::ScrollArea::vertical()
        .max_height(height)
        .stick_to_bottom(app.ui.should_auto_scroll)
        .show(ui, |ui| {
            for entry in &session.story_log {
                app.draw_entry(ui, entry);
            }
        });
}

fn save_transcript(app: &mut StoryApp, session: &Session) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(transcript::default_file_name(session))
        .save_file()
    else {
        return;
    };

    let text = transcript::compile(session);
    app.ui.save_feedback = Some(match std::fs::write(&path, text) {
        Ok(()) => format!("Saved to {}", path.display()),
        Err(e) => format!("Could not save: {e}"),
    });
}
