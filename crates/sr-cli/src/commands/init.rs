use std::path::Path;

use colored::Colorize;

use crate::error::CliError;
use crate::settings::{DEFAULT_MODEL, Settings, SettingsFile};

pub fn run(
    path: &Path,
    api_key: Option<&str>,
    model: Option<&str>,
    force: bool,
) -> Result<(), CliError> {
    let file = SettingsFile::new(path);

    if file.exists() && !force {
        return Err(CliError::Message(format!(
            "settings file '{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let settings = Settings {
        openai_api_key: api_key.unwrap_or_default().to_string(),
        openai_model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        openai_assistant_id: String::new(),
    };
    file.write(&settings)?;

    println!("{} {}", "Created settings file".green(), path.display());
    if settings.openai_api_key.is_empty() {
        println!();
        println!("Add your OpenAI API key before playing:");
        println!("  edit \"openai_api_key\" in {}", path.display());
        println!("  or set the OPENAI_API_KEY environment variable");
    }
    println!();
    println!("Start a game with:");
    println!("  sprawl-runner play");

    Ok(())
}
