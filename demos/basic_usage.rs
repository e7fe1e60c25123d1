// Example: Basic usage of the fenfav-core library
use std::fs;

use fenfav_core::models::*;
use fenfav_core::storage::*;

fn main() -> anyhow::Result<()> {
    let path = "basic_usage_favorites.json";
    fs::remove_file(path).ok(); // Clean up previous run

    println!("--- Basic Usage of fenfav-core ---");

    // ========== Create Favorites ==========
    println!("\n1. Creating favorites...");
    let mut store = JsonFileStore::new(path);
    let start = store.create("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", Some("start"))?;
    println!("   ✓ Created favorite: {}", start);

    let sicilian = store.create("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2", None)?;
    println!("   ✓ Created favorite with generated id: {}", sicilian);

    // ========== Reload From Disk ==========
    println!("\n2. Reloading from disk...");
    let mut reloaded = JsonFileStore::new(path);
    for record in reloaded.list(&DateRange::default())? {
        println!("   • {} {} {}", record.id, record.date, record.fen);
    }

    // ========== Filter By Date ==========
    println!("\n3. Filtering by date...");
    let range = DateRange::parse(Some("2000-01-01"), None)?;
    println!("   ✓ {} favorites since 2000", reloaded.list(&range)?.len());

    // ========== Delete ==========
    println!("\n4. Deleting...");
    reloaded.delete(None, Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"))?;
    reloaded.delete(Some("no-such-id"), None)?;
    println!("   ✓ {} favorite(s) left", reloaded.len()?);

    fs::remove_file(path).ok();
    Ok(())
}
