use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::faction::Faction;
use crate::location::Location;

/// Status returned to the assistant after a successful registration.
pub const TOOL_OK: &str = "OK";

/// Payload key carrying the faction batch.
pub const FACTIONS_KEY: &str = "factions";

/// Payload key carrying the location batch.
pub const LOCATIONS_KEY: &str = "locations";

/// The session-wide world aggregate.
///
/// Factions and locations are kept in the order the assistant registered
/// them. Nothing is ever removed, so [`GameWorld::entity_count`] only grows
/// and doubles as the readiness signal while the world is being generated.
#[derive(Debug, Clone, Default)]
pub struct GameWorld {
    factions: Vec<Faction>,
    locations: Vec<Location>,
}

impl GameWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// All registered factions, in registration order.
    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    /// All registered locations, in registration order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Locations where the player can find work.
    pub fn employment_locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter().filter(|l| l.is_employment())
    }

    /// Total number of registered factions and locations.
    pub fn entity_count(&self) -> usize {
        self.factions.len() + self.locations.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    /// Register a batch of factions from a `register_factions` payload.
    ///
    /// Expects `{"factions": [{name, description, motivation}, ...]}`. The
    /// batch is parsed completely before anything is appended, so a
    /// malformed entry leaves the world untouched. An empty batch succeeds.
    pub fn register_factions(&mut self, arguments: &Value) -> CoreResult<&'static str> {
        let factions: Vec<Faction> = parse_batch(arguments, FACTIONS_KEY)?;
        tracing::debug!(count = factions.len(), "registering factions");
        self.factions.extend(factions);
        Ok(TOOL_OK)
    }

    /// Register a batch of locations from a `register_locations` payload.
    ///
    /// Expects `{"locations": [{name, type, description}, ...]}` and follows
    /// the same all-or-nothing rule as [`GameWorld::register_factions`].
    pub fn register_locations(&mut self, arguments: &Value) -> CoreResult<&'static str> {
        let locations: Vec<Location> = parse_batch(arguments, LOCATIONS_KEY)?;
        tracing::debug!(count = locations.len(), "registering locations");
        self.locations.extend(locations);
        Ok(TOOL_OK)
    }
}

fn parse_batch<T: DeserializeOwned>(arguments: &Value, key: &'static str) -> CoreResult<Vec<T>> {
    let batch = arguments.get(key).ok_or(CoreError::MissingKey(key))?;
    Vec::<T>::deserialize(batch).map_err(|source| CoreError::InvalidPayload { key, source })
}
