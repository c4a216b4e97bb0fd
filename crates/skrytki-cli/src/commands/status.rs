use anyhow::Result;

use skrytki_core::schema::Database;
use skrytki_etl::Config;

pub fn show_status(config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)?;
    let stats = db.stats()?;

    println!("\n📊 Skrytki Status\n");
    println!("  Database:  {}", config.database_path.display());
    println!("  Entities:  {}", stats.entities);
    println!("  Offices:   {}", stats.offices);
    println!("  Addresses: {}", stats.addresses);

    match db.last_load()? {
        Some(run) => {
            println!("\n  Last load: {} ({})", run.loaded_at, run.run_id);
            println!("    from {} source rows", run.source_rows);
        }
        None => {
            println!("\n  No data loaded yet.");
            println!("\n  Run `skrytki load <extract.csv>` to build the search tables");
        }
    }

    Ok(())
}
