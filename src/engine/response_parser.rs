use tracing::warn;

use crate::model::session::ChoicePair;

pub const FALLBACK_CHOICE_1: &str = "Continue cautiously and investigate further";
pub const FALLBACK_CHOICE_2: &str = "Take a bold approach and face the situation head-on";

fn fallback_pair() -> ChoicePair {
    ChoicePair {
        choice1: FALLBACK_CHOICE_1.into(),
        choice2: FALLBACK_CHOICE_2.into(),
    }
}

/// Pulls a `{ "choice1": ..., "choice2": ... }` object out of free-form
/// model output. The model is asked for JSON only but routinely wraps it in
/// prose, so everything before the first `{` and after the last `}` is cut
/// away before decoding. Any decode failure yields the fixed fallback pair
/// so the game always has exactly two options to offer.
pub fn extract_choice_pair(raw: &str) -> ChoicePair {
    let mut json_str = raw.trim();

    if !json_str.starts_with('{') {
        match json_str.find('{') {
            Some(start) => json_str = &json_str[start..],
            None => {
                warn!(raw, "no JSON object in choice response, using fallback");
                return fallback_pair();
            }
        }
    }
    if !json_str.ends_with('}') {
        match json_str.rfind('}') {
            Some(end) => json_str = &json_str[..=end],
            None => {
                warn!(raw, "unterminated JSON object in choice response, using fallback");
                return fallback_pair();
            }
        }
    }

    match serde_json::from_str::<ChoicePair>(json_str) {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, raw, "undecodable choice response, using fallback");
            fallback_pair()
        }
    }
}

/// The model sometimes echoes the prior scene verbatim before the new text.
/// If the previous scene appears in the response, keep only what follows its
/// first occurrence; otherwise keep the response as-is. A substring check
/// only: partial overlaps and paraphrased echoes pass through untouched.
pub fn strip_scene_echo(previous_scene: &str, raw: &str) -> String {
    let body = match raw.find(previous_scene) {
        Some(idx) if !previous_scene.is_empty() => &raw[idx + previous_scene.len()..],
        _ => raw,
    };
    body.trim().to_string()
}
