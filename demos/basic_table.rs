// Basic table example
// Author: Gabriel Demetrios Lafis

use std::io::Cursor;

use comma::{utils::init_logging, Table, TableSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(log::LevelFilter::Info)?;

    let source = TableSource::reader(Cursor::new(
        "id,name,age,salary\n1,Alice,30,75000\n2,Bob,25,N/A\n3,Charlie,35,85000\n4,Diana,28,70000\n",
    ));

    // Load the table
    let mut table = Table::new(source);
    table.prepare()?;
    println!("Original table:\n{}\n", table.preview());

    // Statistics
    let stats = table.column_stats("age", false)?;
    println!("Age statistics: {}", serde_json::to_string(&stats)?);
    println!("Salary total (skipping N/A): {}", table.sum("salary", true)?);

    // Reshape
    table.add_column("bonus", vec![5000, 4000, 6000, 4500])?;
    table.rearrange_columns(&["name", "id", "age", "salary", "bonus"])?;
    table.delete_column("salary")?;

    // Look up and delete by key
    table.assign_primary("id", false)?;
    if let Some(position) = table.find_row("2")? {
        table.delete_row(position)?;
    }

    println!("\nProcessed table:\n{}", table.preview());
    println!("\n{}", table.to_delimited_text(';')?);

    Ok(())
}
