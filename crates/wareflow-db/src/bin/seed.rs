//! # Seed Importer
//!
//! Loads the JSON seed set into a SQLite database for development.
//!
//! ## Usage
//! ```bash
//! # Import ./db into ./wareflow_dev.db (defaults)
//! cargo run -p wareflow-db --bin seed
//!
//! # Custom locations
//! cargo run -p wareflow-db --bin seed -- --db ./data/wareflow.db --seed-dir ./fixtures
//! ```
//!
//! The import runs in one transaction. A database that already holds rows is
//! left untouched.

use std::env;

use wareflow_db::{Database, DbConfig, SeedSet};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./wareflow_dev.db");
    let mut seed_dir = String::from("./db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--seed-dir" | "-s" => {
                if i + 1 < args.len() {
                    seed_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Wareflow Seed Importer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./wareflow_dev.db)");
                println!("  -s, --seed-dir <DIR>    Seed JSON directory (default: ./db)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Wareflow Seed Importer");
    println!("=========================");
    println!("Database: {}", db_path);
    println!("Seed dir: {}", seed_dir);
    println!();

    let seed = SeedSet::load(&seed_dir)?;
    println!("✓ Loaded {} seed rows", seed.total_rows());

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = db.migration_status().await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = db.total_rows().await?;
    if existing > 0 {
        println!("⚠ Database already has {} rows", existing);
        println!("  Skipping import to avoid duplicates.");
        println!("  Delete the database file to re-import.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let imported = db.import_seed(&seed).await?;
    let elapsed = start.elapsed();

    println!();
    println!("✓ Imported {} rows in {:?}", imported, elapsed);

    let report = db.repositories().buyers.report_purchase_orders(None).await?;
    println!("  Buyers with purchase report rows: {}", report.len());

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
