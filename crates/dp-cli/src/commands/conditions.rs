use comfy_table::{ContentArrangement, Table};
use dp_core::StandardConditions;

pub fn run() -> Result<(), String> {
    let catalog = StandardConditions::new();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Id", "Condition", "Effect"]);
    for (i, condition) in catalog.all().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            condition.id.clone(),
            condition.name.clone(),
            condition.description.clone(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} conditions", catalog.all().len());
    Ok(())
}
