use std::sync::mpsc::{Receiver, Sender};

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::engine::llm_client::{HostedModelClient, TextGenerator};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::response_parser::{extract_choice_pair, strip_scene_echo};
use crate::model::session::{ChoicePair, ChoiceSlot, Genre, Session};

/// Runs the narrative state machine on its own thread, joined to the UI by
/// the command/response channels. Blocking endpoint calls happen here so the
/// UI thread never stalls.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    game: GameFlow,
}

impl Engine {
    pub fn new(rx: Receiver<EngineCommand>, tx: Sender<EngineResponse>) -> Self {
        Self {
            rx,
            tx,
            game: GameFlow::default(),
        }
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::StartGame {
                    player_name,
                    genre,
                    config,
                } => {
                    let client = HostedModelClient::new(config);
                    match self.game.start(&client, &player_name, genre) {
                        Ok(session) => {
                            let _ = self
                                .tx
                                .send(EngineResponse::SessionState(Box::new(session.clone())));
                        }
                        Err(e) => {
                            let _ = self.tx.send(EngineResponse::StartFailed(format!("{e:#}")));
                        }
                    }
                }

                EngineCommand::Choose { which, config } => {
                    let client = HostedModelClient::new(config);
                    if let Some(session) = self.game.choose(&client, which) {
                        let _ = self
                            .tx
                            .send(EngineResponse::SessionState(Box::new(session.clone())));
                    }
                }

                EngineCommand::Reset => {
                    self.game.reset();
                    let _ = self.tx.send(EngineResponse::SessionCleared);
                }
            }
        }
    }
}

/// The four-state narrative flow: no session, in progress, concluded, and
/// back to the start on reset. Kept apart from the channel plumbing so a
/// scripted generator can drive it in tests.
#[derive(Default)]
pub struct GameFlow {
    session: Option<Session>,
}

impl GameFlow {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Creates the session and generates the opening scene plus the initial
    /// choice pair. If the opening scene fails, no session is created.
    pub fn start(
        &mut self,
        generator: &dyn TextGenerator,
        player_name: &str,
        genre: Genre,
    ) -> Result<&Session> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            bail!("player name must not be empty");
        }

        let prompt = PromptBuilder::opening_scene(genre, player_name);
        let opening = generator.generate(&prompt)?.trim().to_string();

        let mut session = Session::new(player_name.to_string(), genre);
        session.current_scene = opening.clone();
        session.push_narrator(opening);
        session.choices = Some(request_choice_pair(
            generator,
            &session.current_scene,
            genre,
        ));

        info!(player = player_name, genre = genre.key(), "session started");
        Ok(self.session.insert(session))
    }

    /// Accepts one decision. Returns the updated session, or None when no
    /// decision can be accepted (no session, concluded, or no choices).
    pub fn choose(
        &mut self,
        generator: &dyn TextGenerator,
        which: ChoiceSlot,
    ) -> Option<&Session> {
        let session = self.session.as_mut()?;
        if session.game_over {
            return None;
        }
        let chosen = session.choices.as_ref()?.get(which).to_string();

        session.push_player(chosen.clone());

        // A transport failure still advances the log, with the error text
        // standing in for the scene.
        let prompt = PromptBuilder::continuation(&session.current_scene, &chosen, session.genre);
        let scene = match generator.generate(&prompt) {
            Ok(raw) => strip_scene_echo(&session.current_scene, &raw),
            Err(e) => {
                warn!(error = %e, "continuation generation failed");
                format!("Error generating story: {e:#}")
            }
        };
        session.push_narrator(scene.clone());
        session.current_scene = scene;
        session.record_decision();

        if session.game_over {
            let prompt = PromptBuilder::conclusion(
                &session.current_scene,
                session.genre,
                &session.player_name,
            );
            let conclusion = match generator.generate(&prompt) {
                Ok(raw) => raw.trim().to_string(),
                Err(e) => {
                    warn!(error = %e, "conclusion generation failed");
                    format!("Error generating story: {e:#}")
                }
            };
            session.push_narrator(conclusion);
            session.choices = None;
            info!(decisions = session.choice_count, "story concluded");
        } else {
            session.choices = Some(request_choice_pair(
                generator,
                &session.current_scene,
                session.genre,
            ));
        }

        Some(session)
    }

    /// Valid from any state; wipes the session back to the start screen.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

/// A failed or undecodable choice request never stops the game: the fixed
/// fallback pair is substituted and the failure is only logged.
fn request_choice_pair(
    generator: &dyn TextGenerator,
    current_scene: &str,
    genre: Genre,
) -> ChoicePair {
    let prompt = PromptBuilder::choice_pair(current_scene, genre);
    match generator.generate(&prompt) {
        Ok(raw) => extract_choice_pair(&raw),
        Err(e) => {
            warn!(error = %e, "choice generation failed, using fallback");
            extract_choice_pair("")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::response_parser::{FALLBACK_CHOICE_1, FALLBACK_CHOICE_2};
    use crate::model::session::{StoryRole, MAX_CHOICES};
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Replays a fixed script of replies, then keeps answering with a stock
    /// scene once the script runs out.
    struct ScriptedGenerator {
        replies: RefCell<VecDeque<Result<String, String>>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(&self, _prompt: &str) -> Result<String> {
            match self.replies.borrow_mut().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(e)) => Err(anyhow!(e)),
                None => Ok("A stock scene.".into()),
            }
        }
    }

    /// Answers by prompt kind, numbering scenes so every one is distinct.
    struct StoryScriptGenerator {
        scenes: Cell<u32>,
    }

    impl StoryScriptGenerator {
        fn new() -> Self {
            Self { scenes: Cell::new(0) }
        }
    }

    impl TextGenerator for StoryScriptGenerator {
        fn generate(&self, prompt: &str) -> Result<String> {
            if prompt.starts_with("Given the following scene") {
                Ok("{\"choice1\":\"Go left\",\"choice2\":\"Go right\"}".into())
            } else if prompt.starts_with("Write a satisfying conclusion") {
                Ok("And so it ended.".into())
            } else {
                let n = self.scenes.get() + 1;
                self.scenes.set(n);
                Ok(format!("Scene number {n}."))
            }
        }
    }

    #[test]
    fn start_populates_session_and_choices() {
        let gen = ScriptedGenerator::new(vec![
            Ok("An opening scene.".into()),
            Ok("{\"choice1\":\"A\",\"choice2\":\"B\"}".into()),
        ]);
        let mut game = GameFlow::default();
        let session = game.start(&gen, "Ada", Genre::Fantasy).unwrap();

        assert_eq!(session.current_scene, "An opening scene.");
        assert_eq!(session.story_log.len(), 1);
        assert_eq!(session.story_log[0].role, StoryRole::Narrator);
        assert_eq!(session.choice_count, 0);
        assert!(!session.game_over);
        let choices = session.choices.as_ref().unwrap();
        assert_eq!(choices.choice1, "A");
        assert_eq!(choices.choice2, "B");
    }

    #[test]
    fn start_rejects_empty_name() {
        let gen = ScriptedGenerator::new(vec![]);
        let mut game = GameFlow::default();
        assert!(game.start(&gen, "   ", Genre::Fantasy).is_err());
        assert!(game.session().is_none());
    }

    #[test]
    fn failed_opening_leaves_no_session() {
        let gen = ScriptedGenerator::new(vec![Err("401 unauthorized".into())]);
        let mut game = GameFlow::default();
        assert!(game.start(&gen, "Ada", Genre::Horror).is_err());
        assert!(game.session().is_none());
    }

    #[test]
    fn start_then_reset_matches_initial_state() {
        let gen = ScriptedGenerator::new(vec![
            Ok("An opening scene.".into()),
            Ok("{\"choice1\":\"A\",\"choice2\":\"B\"}".into()),
        ]);
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::Romance).unwrap();
        assert!(game.session().is_some());

        game.reset();
        assert!(game.session().is_none());
    }

    #[test]
    fn failed_choice_generation_uses_fallback_pair() {
        let gen = ScriptedGenerator::new(vec![
            Ok("An opening scene.".into()),
            Err("timeout".into()),
        ]);
        let mut game = GameFlow::default();
        let session = game.start(&gen, "Ada", Genre::Mystery).unwrap();
        let choices = session.choices.as_ref().unwrap();
        assert_eq!(choices.choice1, FALLBACK_CHOICE_1);
        assert_eq!(choices.choice2, FALLBACK_CHOICE_2);
    }

    #[test]
    fn failed_continuation_still_advances_log() {
        let gen = ScriptedGenerator::new(vec![
            Ok("An opening scene.".into()),
            Ok("{\"choice1\":\"A\",\"choice2\":\"B\"}".into()),
            Err("connection refused".into()),
            Ok("{\"choice1\":\"C\",\"choice2\":\"D\"}".into()),
        ]);
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::Adventure).unwrap();
        let session = game.choose(&gen, ChoiceSlot::First).unwrap();

        assert_eq!(session.choice_count, 1);
        assert_eq!(session.story_log.len(), 3);
        assert!(session.story_log[2].text.starts_with("Error generating story:"));
    }

    #[test]
    fn choose_appends_player_then_narrator() {
        let gen = ScriptedGenerator::new(vec![
            Ok("An opening scene.".into()),
            Ok("{\"choice1\":\"Go left\",\"choice2\":\"Go right\"}".into()),
            Ok("A second scene.".into()),
            Ok("{\"choice1\":\"C\",\"choice2\":\"D\"}".into()),
        ]);
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::Adventure).unwrap();
        let session = game.choose(&gen, ChoiceSlot::Second).unwrap();

        assert_eq!(session.story_log[1].role, StoryRole::Player);
        assert_eq!(session.story_log[1].text, "Go right");
        assert_eq!(session.story_log[2].role, StoryRole::Narrator);
        assert_eq!(session.story_log[2].text, "A second scene.");
        assert_eq!(session.current_scene, "A second scene.");
    }

    #[test]
    fn echoed_scene_is_stripped_from_continuation() {
        let gen = ScriptedGenerator::new(vec![
            Ok("The door creaked.".into()),
            Ok("{\"choice1\":\"A\",\"choice2\":\"B\"}".into()),
            Ok("The door creaked. Inside, darkness awaited.".into()),
            Ok("{\"choice1\":\"C\",\"choice2\":\"D\"}".into()),
        ]);
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::Horror).unwrap();
        let session = game.choose(&gen, ChoiceSlot::First).unwrap();
        assert_eq!(session.current_scene, "Inside, darkness awaited.");
    }

    #[test]
    fn full_playthrough_concludes_after_twenty_decisions() {
        let gen = StoryScriptGenerator::new();
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::SciFi).unwrap();

        let mut previous_count = 0;
        for i in 0..MAX_CHOICES {
            let which = if i % 2 == 0 {
                ChoiceSlot::First
            } else {
                ChoiceSlot::Second
            };
            let session = game.choose(&gen, which).unwrap();
            assert!(session.choice_count > previous_count);
            assert!(session.choice_count <= MAX_CHOICES);
            assert_eq!(session.game_over, session.choice_count == MAX_CHOICES);
            previous_count = session.choice_count;
        }

        let session = game.session().unwrap();
        assert!(session.game_over);
        assert!(session.choices.is_none());

        let players = session
            .story_log
            .iter()
            .filter(|e| e.role == StoryRole::Player)
            .count();
        let narrators = session
            .story_log
            .iter()
            .filter(|e| e.role == StoryRole::Narrator)
            .count();
        assert_eq!(players, MAX_CHOICES as usize);
        // Opening, one scene per decision, plus the conclusion.
        assert_eq!(narrators, MAX_CHOICES as usize + 2);
        assert_eq!(
            session.story_log.last().unwrap().text,
            "And so it ended."
        );
    }

    #[test]
    fn no_further_decisions_after_conclusion() {
        let gen = StoryScriptGenerator::new();
        let mut game = GameFlow::default();
        game.start(&gen, "Ada", Genre::SciFi).unwrap();
        for _ in 0..MAX_CHOICES {
            game.choose(&gen, ChoiceSlot::First);
        }
        assert!(game.choose(&gen, ChoiceSlot::First).is_none());
        assert_eq!(game.session().unwrap().choice_count, MAX_CHOICES);
    }
}
