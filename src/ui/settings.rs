use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::engine::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

#[derive(Serialize, Deserialize, Clone)]
pub struct UiSettings {
    pub ui_scale: f32,

    // Generation endpoint; the API key is deliberately not persisted.
    pub api_url: String,
    pub model: String,

    // Speaker → bubble color mapping (extensible)
    pub speaker_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut speaker_colors = HashMap::new();

        speaker_colors.insert("Narrator".into(), [40, 90, 60, 255]);
        speaker_colors.insert("Player".into(), [40, 70, 120, 255]);
        speaker_colors.insert("System".into(), [80, 80, 80, 255]);

        Self {
            ui_scale: 1.0,
            api_url: DEFAULT_API_URL.into(),
            model: DEFAULT_MODEL.into(),
            speaker_colors,
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.speaker_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }
}
