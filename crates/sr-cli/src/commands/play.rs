//! Run an interactive game session against the OpenAI backend.

use std::path::Path;

use sr_assistant::{AssistantBackend, MessageBus, OpenAiClient};
use sr_game::prompts;
use sr_game::state::StartGame;
use sr_game::{Game, GameConfig};

use crate::console::StdConsole;
use crate::error::CliError;
use crate::settings::{self, SettingsFile};

/// Load and validate settings, then play until the player quits.
pub fn run(path: &Path, config: GameConfig) -> Result<(), CliError> {
    let file = SettingsFile::new(path);
    let mut loaded = file.load()?;
    settings::apply_env(&mut loaded);

    let client = OpenAiClient::new(&loaded.openai_api_key)
        .map_err(|e| CliError::Message(e.to_string()))?;
    let dirty = settings::validate(&mut loaded, |model| {
        tracing::info!(model, "creating assistant");
        client
            .create_assistant(&prompts::assistant_spec(model))
            .map_err(|e| format!("cannot create assistant: {e}"))
    })?;
    if dirty {
        file.write(&loaded)?;
    }

    let console = StdConsole::new(&config.quit_command);
    let mut game = Game::new(Box::new(console), config);
    let bus = MessageBus::new(Box::new(client), loaded.openai_assistant_id.clone());
    game.set_message_bus(bus)?;
    game.change_state(Box::new(StartGame::new()));

    Ok(game.play()?)
}
