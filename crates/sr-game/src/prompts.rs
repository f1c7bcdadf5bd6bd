//! Text sent to the assistant.

use sr_assistant::{AssistantSpec, ToolName};
use sr_core::GameWorld;

/// Display name of the assistant registered for the game.
pub const ASSISTANT_NAME: &str =
    "Sprawl Runner Assist - A Consensual Hallucination Text-Based Adventure Game Assistant";

/// System instructions for the assistant.
pub const ASSISTANT_INSTRUCTIONS: &str = "\
You are the game master of Sprawl Runner, a text adventure set in a rain-soaked \
cyberpunk megacity. Corporations rule, the streets belong to gangs and fixers, \
and the player is a freelance runner taking jobs to stay alive.

Narrate in second person, present tense. Keep each reply under 200 words and end \
by handing control back to the player. Never decide the player's actions for them.

When asked to create game world content, report it only through the provided \
tools and do not describe it in prose.";

/// Asks for the game's factions, registered through `register_factions`.
pub const FACTION_GENERATION: &str = "\
Create exactly 5 factions that compete for power in the city: a mix of \
megacorporations, street gangs, and underground groups. Give each a short name, \
a one-sentence description, and its core motivation. Register all of them with a \
single call to the register_factions tool.";

/// Asks for the game's locations, registered through `register_locations`.
pub const LOCATION_GENERATION: &str = "\
Create exactly 3 locations in the city. At least 2 must have the type \
\"Employment\": places where a runner can find work, such as a fixer's bar or a \
black-market clinic. Give each a short name, a type, and a one-sentence \
description. Register all of them with a single call to the register_locations tool.";

/// The assistant registration used when no assistant id is configured yet.
pub fn assistant_spec(model: &str) -> AssistantSpec {
    AssistantSpec {
        name: ASSISTANT_NAME.to_string(),
        model: model.to_string(),
        instructions: ASSISTANT_INSTRUCTIONS.to_string(),
        tools: ToolName::definitions(),
    }
}

/// The first narrative request, listing the places the player can find work.
pub fn opening_scene(world: &GameWorld) -> String {
    let locations: String = world
        .employment_locations()
        .map(|l| format!("- {} - {}\n", l.name, l.description))
        .collect();
    let factions: String = world
        .factions()
        .iter()
        .map(|f| format!("- {} - {}\n", f.name, f.motivation))
        .collect();

    format!(
        "Open the game. The player wakes up broke in a coffin hotel and needs work.\n\
         Mention where they could look for a job:\n{locations}\n\
         These factions are active in the city:\n{factions}\n\
         Describe the scene and ask the player what they do."
    )
}
