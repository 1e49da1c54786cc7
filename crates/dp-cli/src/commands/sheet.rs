use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dp_core::{CharacterSheet, Roster};

pub fn run(roster_path: &Path, name: Option<&str>) -> Result<(), String> {
    let roster = super::load_roster(roster_path)?;

    match name {
        Some(name) => {
            let actor = roster.find_by_name(name).map_err(|e| e.to_string())?;
            let sheet = roster
                .get(actor)
                .ok_or_else(|| format!("character '{name}' not found"))?;
            show_sheet(sheet);
        }
        None => list_roster(&roster),
    }
    Ok(())
}

fn list_roster(roster: &Roster) {
    if roster.is_empty() {
        println!("  No characters found.");
        return;
    }

    let mut sheets: Vec<&CharacterSheet> = roster.sheets().collect();
    sheets.sort_by(|a, b| a.name.cmp(&b.name));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Attributes", "Skills", "Wounds"]);
    for sheet in &sheets {
        table.add_row(vec![
            sheet.name.clone(),
            sheet.attributes.len().to_string(),
            sheet.skills.len().to_string(),
            sheet.wound_penalty.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} characters", sheets.len());
}

fn show_sheet(sheet: &CharacterSheet) {
    println!("  {}", sheet.name.bold());
    if sheet.wound_penalty < 0 {
        println!("  Wound penalty: {}", sheet.wound_penalty.to_string().red());
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Category", "Trait", "Rating", "Specialty"]);

    let groups: [(&str, &HashMap<String, i32>); 4] = [
        ("Attribute", &sheet.attributes),
        ("Skill", &sheet.skills),
        ("Advantage", &sheet.advantages),
        ("Merit", &sheet.merits),
    ];
    for (category, traits) in groups {
        let mut names: Vec<(&String, &i32)> = traits.iter().collect();
        names.sort();
        for (trait_name, rating) in names {
            let specialty = if category == "Skill" {
                sheet.specialty(trait_name).unwrap_or("-").to_string()
            } else {
                String::new()
            };
            table.add_row(vec![
                category.to_string(),
                trait_name.clone(),
                rating.to_string(),
                specialty,
            ]);
        }
    }

    println!("{table}");
}
