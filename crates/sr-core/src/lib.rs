//! Core types for Sprawl Runner: factions, locations, and the game world.
//!
//! The [`GameWorld`] is the mutable session state populated while the
//! assistant generates the setting. It only grows: entries are appended
//! through the registration methods and never removed or reordered.

/// Error types used throughout the crate.
pub mod error;
/// Factions competing for power in the sprawl.
pub mod faction;
/// Places the player can visit.
pub mod location;
/// The session-wide world aggregate.
pub mod world;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export faction types.
pub use faction::Faction;
/// Re-export location types.
pub use location::Location;
/// Re-export world types.
pub use world::{GameWorld, TOOL_OK};
