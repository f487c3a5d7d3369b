use crate::model::session::Genre;

/// Builds the prompts sent to the LLM.
/// This struct is intentionally dumb: it only formats text.
/// No parsing, no networking, no engine logic.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Opening scene for a fresh session.
    pub fn opening_scene(genre: Genre, player_name: &str) -> String {
        format!(
            "Create an engaging opening scene for a {} story where the protagonist is named {}.\n\
             Set the scene (about 150 words) with an interesting situation that will lead to choices.\n\
             Make it immersive and end at a point where the protagonist needs to make a decision.\n",
            genre.key(),
            player_name
        )
    }

    /// Two branching options for the current scene, requested as JSON.
    pub fn choice_pair(current_scene: &str, genre: Genre) -> String {
        format!(
            "Given the following scene in a {} story:\n\n\
             {}\n\n\
             Generate two distinct and interesting choices for the protagonist. \
             Each choice should lead the story in a different direction.\n\
             Format your response as a JSON object with two choices like this:\n\
             {{\n\
             \x20   \"choice1\": \"Brief description of first choice (10-15 words)\",\n\
             \x20   \"choice2\": \"Brief description of second choice (10-15 words)\"\n\
             }}\n\
             Only return the JSON, nothing else.\n",
            genre.key(),
            current_scene
        )
    }

    /// Next scene after the player picks an option.
    pub fn continuation(current_scene: &str, chosen_choice: &str, genre: Genre) -> String {
        format!(
            "In this {} story:\n\n\
             Current situation: {}\n\n\
             The protagonist decides to: {}\n\n\
             Continue the story with an engaging scene (150-200 words) based on this choice. \
             Make it vivid and immersive.\n",
            genre.key(),
            current_scene,
            chosen_choice
        )
    }

    /// Final wrap-up once the decision limit is reached.
    pub fn conclusion(current_scene: &str, genre: Genre, player_name: &str) -> String {
        format!(
            "Write a satisfying conclusion (about 200 words) to this {} story:\n\n\
             {}\n\n\
             Make it feel like a natural ending that wraps up the adventure for {}.\n",
            genre.key(),
            current_scene,
            player_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_scene_interpolates_genre_and_name() {
        let prompt = PromptBuilder::opening_scene(Genre::Horror, "Mara");
        assert_eq!(
            prompt,
            "Create an engaging opening scene for a horror story where the protagonist is named Mara.\n\
             Set the scene (about 150 words) with an interesting situation that will lead to choices.\n\
             Make it immersive and end at a point where the protagonist needs to make a decision.\n"
        );
    }

    #[test]
    fn choice_pair_requests_json_only() {
        let prompt = PromptBuilder::choice_pair("The door creaked.", Genre::Mystery);
        assert!(prompt.starts_with("Given the following scene in a mystery story:\n\nThe door creaked.\n\n"));
        assert!(prompt.contains("\"choice1\": \"Brief description of first choice (10-15 words)\""));
        assert!(prompt.contains("\"choice2\": \"Brief description of second choice (10-15 words)\""));
        assert!(prompt.ends_with("Only return the JSON, nothing else.\n"));
    }

    #[test]
    fn continuation_carries_scene_and_choice() {
        let prompt =
            PromptBuilder::continuation("A storm rolled in.", "Seek shelter", Genre::Adventure);
        assert_eq!(
            prompt,
            "In this adventure story:\n\n\
             Current situation: A storm rolled in.\n\n\
             The protagonist decides to: Seek shelter\n\n\
             Continue the story with an engaging scene (150-200 words) based on this choice. \
             Make it vivid and immersive.\n"
        );
    }

    #[test]
    fn conclusion_names_the_player() {
        let prompt = PromptBuilder::conclusion("The gate stood open.", Genre::SciFi, "Kai");
        assert_eq!(
            prompt,
            "Write a satisfying conclusion (about 200 words) to this sci_fi story:\n\n\
             The gate stood open.\n\n\
             Make it feel like a natural ending that wraps up the adventure for Kai.\n"
        );
    }
}
