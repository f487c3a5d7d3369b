use crate::engine::llm_client::LlmConfig;
use crate::model::session::{ChoiceSlot, Genre, Session};

pub enum EngineCommand {
    StartGame {
        player_name: String,
        genre: Genre,
        config: LlmConfig,
    },
    Choose {
        which: ChoiceSlot,
        config: LlmConfig,
    },
    Reset,
}

pub enum EngineResponse {
    /// Full session after a successful start or an accepted decision.
    SessionState(Box<Session>),

    /// The opening scene could not be generated; no session was created.
    StartFailed(String),

    /// Reset completed, everything back to the start screen.
    SessionCleared,
}
