pub mod conditions;
pub mod roll;
pub mod sheet;

use std::fs;
use std::path::Path;

use dp_core::{ActorId, Roster};

/// Load and validate a roster file.
fn load_roster(path: &Path) -> Result<Roster, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("cannot read roster {}: {e}", path.display()))?;
    let roster = Roster::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), characters = roster.len(), "roster loaded");
    Ok(roster)
}

/// Pick the acting character: the named one, or the only one on the roster.
fn pick_actor(roster: &Roster, name: Option<&str>) -> Result<ActorId, String> {
    match name {
        Some(name) => roster.find_by_name(name).map_err(|e| e.to_string()),
        None => {
            let mut sheets = roster.sheets();
            match (sheets.next(), sheets.next()) {
                (Some(only), None) => Ok(only.id),
                (None, _) => Err("the roster has no characters".into()),
                _ => Err("the roster has several characters; pass --actor <name>".into()),
            }
        }
    }
}
