use serde::{Deserialize, Serialize};

/// Story ends after this many accepted player decisions.
pub const MAX_CHOICES: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Adventure,
    Horror,
    Romance,
    Fantasy,
    Mystery,
    SciFi,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Adventure,
        Genre::Horror,
        Genre::Romance,
        Genre::Fantasy,
        Genre::Mystery,
        Genre::SciFi,
    ];

    /// Stable key used in prompts and file names.
    pub fn key(&self) -> &'static str {
        match self {
            Genre::Adventure => "adventure",
            Genre::Horror => "horror",
            Genre::Romance => "romance",
            Genre::Fantasy => "fantasy",
            Genre::Mystery => "mystery",
            Genre::SciFi => "sci_fi",
        }
    }

    /// Capitalized form used in headings and the transcript title.
    pub fn title(&self) -> &'static str {
        match self {
            Genre::Adventure => "Adventure",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::Fantasy => "Fantasy",
            Genre::Mystery => "Mystery",
            Genre::SciFi => "Sci_fi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Genre::Adventure => "Adventure 🏞",
            Genre::Horror => "Horror 👻",
            Genre::Romance => "Romance ❤",
            Genre::Fantasy => "Fantasy 🧙",
            Genre::Mystery => "Mystery 🔍",
            Genre::SciFi => "Science Fiction 🚀",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoryRole {
    Narrator,
    Player,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub role: StoryRole,
    pub text: String,
}

/// The two continuations offered at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePair {
    pub choice1: String,
    pub choice2: String,
}

impl ChoicePair {
    pub fn get(&self, slot: ChoiceSlot) -> &str {
        match slot {
            ChoiceSlot::First => &self.choice1,
            ChoiceSlot::Second => &self.choice2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceSlot {
    First,
    Second,
}

/// One play-through. Created on start, mutated on choose, destroyed on reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub player_name: String,
    pub genre: Genre,
    pub current_scene: String,
    pub story_log: Vec<StoryEntry>,
    pub choices: Option<ChoicePair>,
    pub choice_count: u32,
    pub game_over: bool,
}

impl Session {
    pub fn new(player_name: String, genre: Genre) -> Self {
        Self {
            player_name,
            genre,
            current_scene: String::new(),
            story_log: Vec::new(),
            choices: None,
            choice_count: 0,
            game_over: false,
        }
    }

    pub fn push_narrator(&mut self, text: String) {
        self.story_log.push(StoryEntry {
            role: StoryRole::Narrator,
            text,
        });
    }

    pub fn push_player(&mut self, text: String) {
        self.story_log.push(StoryEntry {
            role: StoryRole::Player,
            text,
        });
    }

    /// Counts one accepted decision. game_over flips exactly at the cap.
    pub fn record_decision(&mut self) {
        self.choice_count += 1;
        if self.choice_count >= MAX_CHOICES {
            self.game_over = true;
        }
    }
}
