use std::fmt;

use serde::{Deserialize, Serialize};

use crate::faction::lenient_string;

/// Location category that marks a place where the player can find work.
pub const EMPLOYMENT: &str = "Employment";

/// A place in the game world.
///
/// The category travels as `"type"` on the wire and is free text chosen by
/// the assistant, for example `"Employment"` or `"Residential"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Category of the location.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    /// What the place looks and feels like.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl Location {
    /// Create a location from its three text fields.
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Whether this is a place the player can pick up jobs.
    pub fn is_employment(&self) -> bool {
        self.kind == EMPLOYMENT
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
