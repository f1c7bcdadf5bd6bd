//! Tabular overview of the generated world.

use comfy_table::{ContentArrangement, Table};
use sr_core::GameWorld;

const MAX_CELL: usize = 60;

/// Render the factions and locations as two tables.
pub fn world_summary(world: &GameWorld) -> String {
    let mut factions = Table::new();
    factions.set_content_arrangement(ContentArrangement::Dynamic);
    factions.set_header(vec!["Faction", "Motivation"]);
    for faction in world.factions() {
        factions.add_row(vec![faction.name.clone(), truncate(&faction.motivation)]);
    }

    let mut locations = Table::new();
    locations.set_content_arrangement(ContentArrangement::Dynamic);
    locations.set_header(vec!["Location", "Type", "Description"]);
    for location in world.locations() {
        locations.add_row(vec![
            location.name.clone(),
            location.kind.clone(),
            truncate(&location.description),
        ]);
    }

    format!("{factions}\n{locations}")
}

fn truncate(text: &str) -> String {
    if text.is_empty() {
        return "-".to_string();
    }
    if text.chars().count() > MAX_CELL {
        let head: String = text.chars().take(MAX_CELL - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
