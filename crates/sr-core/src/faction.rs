use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A power group in the game world.
///
/// Built from one entry of a `register_factions` payload. Unrecognized
/// fields are ignored and missing or `null` fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// What the faction is and how it operates.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// What the faction wants.
    #[serde(default, deserialize_with = "lenient_string")]
    pub motivation: String,
}

impl Faction {
    /// Create a faction from its three text fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        motivation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            motivation: motivation.into(),
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Deserialize a string field, treating `null` as empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
