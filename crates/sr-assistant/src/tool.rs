use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

/// The closed set of tools the assistant may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// Registers a batch of generated factions.
    RegisterFactions,
    /// Registers a batch of generated locations.
    RegisterLocations,
}

impl ToolName {
    /// Every tool, in registration order.
    pub const ALL: [ToolName; 2] = [ToolName::RegisterFactions, ToolName::RegisterLocations];

    /// The function name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegisterFactions => "register_factions",
            Self::RegisterLocations => "register_locations",
        }
    }

    /// Look up a tool by its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// The function definition advertised to the assistant.
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::RegisterFactions => ToolDefinition {
                name: self.as_str().to_string(),
                description: "Provides details of the factions that exist in the game world."
                    .to_string(),
                parameters: batch_schema(
                    "factions",
                    "An array of factions, each with a name, description, and motivation.",
                    &["name", "description", "motivation"],
                ),
            },
            Self::RegisterLocations => ToolDefinition {
                name: self.as_str().to_string(),
                description: "Provides details of the locations that exist in the game world."
                    .to_string(),
                parameters: batch_schema(
                    "locations",
                    "An array of locations, each with a name, type, and description.",
                    &["name", "type", "description"],
                ),
            },
        }
    }

    /// Definitions for every tool.
    pub fn definitions() -> Vec<ToolDefinition> {
        Self::ALL.into_iter().map(Self::definition).collect()
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callable function as described to the assistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    /// Function name.
    pub name: String,
    /// What the function is for.
    pub description: String,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

fn batch_schema(key: &str, description: &str, fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "string" })))
        .collect();

    let mut batch = serde_json::Map::new();
    batch.insert(
        key.to_string(),
        json!({
            "type": "array",
            "description": description,
            "items": {
                "type": "object",
                "properties": properties,
                "required": fields,
            },
        }),
    );

    json!({
        "type": "object",
        "properties": batch,
        "required": [key],
    })
}
