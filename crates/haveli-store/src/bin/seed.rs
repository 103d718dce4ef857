//! # Data Directory Initializer
//!
//! Initializes a Haveli PMS data directory with the seed room inventory.
//!
//! ## Usage
//! ```bash
//! # Initialize ./haveli_data (default)
//! cargo run -p haveli-store --bin seed
//!
//! # Specify the data directory
//! cargo run -p haveli-store --bin seed -- --data ./data/haveli
//! ```
//!
//! Running against an already-initialized directory is a no-op; delete the
//! directory to reseed.

use std::env;
use std::sync::Arc;

use haveli_store::{JsonFileMedium, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./haveli_data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Haveli PMS Data Directory Initializer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data <PATH>  Data directory (default: ./haveli_data)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Haveli PMS Data Directory Initializer");
    println!("=====================================");
    println!("Data directory: {data_dir}");
    println!();

    let store = Store::new(Arc::new(JsonFileMedium::new(&data_dir)));
    let seeded = store.initialize().await?;

    if !seeded {
        println!("Directory is already initialized, nothing to do.");
        println!("Delete it to reseed.");
        return Ok(());
    }

    let room_types = store.get_room_types().await?;
    let rooms = store.get_rooms().await?;

    println!("Seeded {} room types:", room_types.len());
    for rt in &room_types {
        let count = rooms.iter().filter(|r| r.type_id == rt.id).count();
        println!(
            "  {:<14} {} rooms, sleeps {}, {}/night",
            rt.name, count, rt.capacity, rt.base_price
        );
    }
    println!();
    println!("Seeded {} rooms. Store is ready.", rooms.len());

    Ok(())
}
