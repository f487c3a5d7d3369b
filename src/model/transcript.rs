use crate::model::session::{Session, StoryEntry, StoryRole};

/// Compiles the story log into the downloadable transcript text.
///
/// Title line, then every entry in log order followed by a blank line;
/// player entries are rendered with the "chose" marker.
pub fn compile(session: &Session) -> String {
    let mut out = format!(
        "# {}'s {} Adventure\n\n",
        session.player_name,
        session.genre.title()
    );

    for entry in &session.story_log {
        match entry.role {
            StoryRole::Player => {
                out.push_str(&format!(
                    "**{} chose:** {}\n\n",
                    session.player_name, entry.text
                ));
            }
            StoryRole::Narrator => {
                out.push_str(&entry.text);
                out.push_str("\n\n");
            }
        }
    }

    out
}

pub fn default_file_name(session: &Session) -> String {
    format!(
        "{}_{}_adventure.txt",
        session.player_name,
        session.genre.key()
    )
}

/// Reconstructs the ordered log from a compiled transcript by splitting on
/// the player-chose marker. Inverse of `compile` for texts without internal
/// blank lines.
pub fn parse(text: &str, player_name: &str) -> Vec<StoryEntry> {
    let marker = format!("**{} chose:** ", player_name);
    let mut entries = Vec::new();

    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() || block.starts_with('#') {
            continue;
        }
        if let Some(choice) = block.strip_prefix(&marker) {
            entries.push(StoryEntry {
                role: StoryRole::Player,
                text: choice.to_string(),
            });
        } else {
            entries.push(StoryEntry {
                role: StoryRole::Narrator,
                text: block.to_string(),
            });
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::session::Genre;

    fn sample_session() -> Session {
        let mut s = Session::new("Ada".into(), Genre::Mystery);
        s.push_narrator("The hallway smelled of old paper.".into());
        s.push_player("Open the locked drawer".into());
        s.push_narrator("Inside lay a brass key.".into());
        s.push_player("Pocket the key quietly".into());
        s.push_narrator("Nobody saw her leave.".into());
        s.push_narrator("And that was the end of it.".into());
        s
    }

    #[test]
    fn transcript_starts_with_title_line() {
        let text = compile(&sample_session());
        assert!(text.starts_with("# Ada's Mystery Adventure\n\n"));
    }

    #[test]
    fn round_trip_reconstructs_log() {
        let session = sample_session();
        let text = compile(&session);
        let parsed = parse(&text, "Ada");
        assert_eq!(parsed, session.story_log);
    }

    #[test]
    fn file_name_uses_genre_key() {
        let session = sample_session();
        assert_eq!(default_file_name(&session), "Ada_mystery_adventure.txt");
    }
}
