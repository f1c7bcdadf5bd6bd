//! Tool handlers that write assistant output into the world.

use serde_json::Value;
use sr_assistant::{ToolError, ToolHandler, ToolName};
use sr_core::GameWorld;

/// Handler for `register_factions`.
pub fn register_factions(world: &mut GameWorld, arguments: &Value) -> Result<String, ToolError> {
    world
        .register_factions(arguments)
        .map(str::to_string)
        .map_err(|e| ToolError::Rejected(e.to_string()))
}

/// Handler for `register_locations`.
pub fn register_locations(world: &mut GameWorld, arguments: &Value) -> Result<String, ToolError> {
    world
        .register_locations(arguments)
        .map(str::to_string)
        .map_err(|e| ToolError::Rejected(e.to_string()))
}

/// Every world tool, ready for [`sr_assistant::MessageBus::register_handlers`].
pub fn world_handlers() -> [(ToolName, ToolHandler<GameWorld>); 2] {
    [
        (
            ToolName::RegisterFactions,
            register_factions as ToolHandler<GameWorld>,
        ),
        (
            ToolName::RegisterLocations,
            register_locations as ToolHandler<GameWorld>,
        ),
    ]
}
