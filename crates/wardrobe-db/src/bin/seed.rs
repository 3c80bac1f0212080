//! # Seed Data Generator
//!
//! Writes a demo wardrobe with three weeks of history for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./wardrobe_dev.db
//! cargo run -p wardrobe-db --bin seed
//!
//! # Specify database path
//! cargo run -p wardrobe-db --bin seed -- --db ./data/wardrobe.db
//!
//! # Replace an existing wardrobe
//! cargo run -p wardrobe-db --bin seed -- --force
//! ```
//!
//! ## Generated Wardrobe
//! - Everyday categories (socks, underwear, t-shirts, jeans, towels)
//! - A hibernated winter category
//! - Daily wear, a laundry run every 3-5 days, a few purchases
//! - One batch still in the laundry and a half-full hamper

use chrono::{DateTime, Duration, Utc};
use std::env;
use wardrobe_core::{find_category_by_name, Money, Wardrobe};
use wardrobe_db::migrations::migration_status;
use wardrobe_db::{Database, DbConfig};

/// (name, emoji, initial count, price per item in cents)
const CATEGORIES: &[(&str, &str, i64, i64)] = &[
    ("Socks", "🧦", 14, 250),
    ("Underwear", "🩲", 12, 900),
    ("T-Shirts", "👕", 10, 1500),
    ("Jeans", "👖", 4, 6000),
    ("Towels", "🛁", 6, 1200),
    ("Sweaters", "🧶", 5, 4500),
];

/// Daily wear pattern (category, count), cycled by day.
const WEAR: &[&[(&str, i64)]] = &[
    &[("Socks", 1), ("Underwear", 1), ("T-Shirts", 1)],
    &[("Socks", 1), ("Underwear", 1), ("T-Shirts", 1), ("Jeans", 1)],
    &[("Socks", 2), ("Underwear", 1), ("T-Shirts", 1), ("Towels", 1)],
];

/// Days between laundry runs, cycled.
const LAUNDRY_GAPS: &[i64] = &[4, 3, 5, 4, 3];

const HISTORY_DAYS: i64 = 21;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./wardrobe_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Wardrobe Flow Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./wardrobe_dev.db)");
                println!("  -f, --force        Replace an existing wardrobe");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Wardrobe Flow Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = migration_status(db.pool()).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = db.snapshots().load().await?;
    if !existing.is_first_run() && !force {
        println!("⚠ Database already holds a wardrobe");
        println!("  Skipping seed to avoid overwriting it.");
        println!("  Pass --force to replace it.");
        return Ok(());
    }

    let wardrobe = demo_wardrobe(Utc::now());
    db.snapshots().save(&wardrobe).await?;

    println!();
    println!("✓ Seeded {} categories", wardrobe.categories.len());
    println!("  {} laundry runs in history", wardrobe.laundry_history.len());
    println!("  {} batch(es) in progress", wardrobe.in_progress_batches().count());
    println!("  {} item(s) in the hamper", wardrobe.bag.total());

    db.close().await;
    Ok(())
}

/// Replays three weeks of activity through the regular actions.
fn demo_wardrobe(now: DateTime<Utc>) -> Wardrobe {
    let start = now - Duration::days(HISTORY_DAYS);

    let mut wardrobe = CATEGORIES
        .iter()
        .fold(Wardrobe::default(), |w, (name, emoji, count, _)| {
            w.add_category(name, emoji, *count, start).0
        });

    let mut next_laundry = start + Duration::days(LAUNDRY_GAPS[0]);
    let mut run = 0;

    for day in 0..HISTORY_DAYS {
        let today = start + Duration::days(day) + Duration::hours(8);

        for (name, count) in WEAR[day as usize % WEAR.len()].iter() {
            if let Some(id) = id_of(&wardrobe, name) {
                wardrobe = wardrobe.toss(&id, *count, today).0;
            }
        }

        // a purchase in the second week
        if day == 9 {
            if let Some(id) = id_of(&wardrobe, "Socks") {
                wardrobe = wardrobe.acquire(&id, 4, Some(Money::from_cents(4 * 250)), today).0;
            }
        }

        // an old towel goes in the rag bin
        if day == 12 {
            if let Some(id) = id_of(&wardrobe, "Towels") {
                wardrobe = wardrobe.retire(&id, 1, Some("worn out".to_string()), today).0;
            }
        }

        if today >= next_laundry {
            let (dispatched, _) = wardrobe.dispatch_bag(today);
            wardrobe = dispatched;
            let open: Vec<String> = wardrobe.in_progress_batches().map(|b| b.id.clone()).collect();
            // the last run is still washing
            if day + 3 < HISTORY_DAYS {
                let done = today + Duration::hours(5);
                wardrobe = open.iter().fold(wardrobe, |w, id| w.complete_batch(id, done).0);
            }
            run += 1;
            next_laundry = today + Duration::days(LAUNDRY_GAPS[run % LAUNDRY_GAPS.len()]);
        }
    }

    // winter clothes stored away
    if let Some(id) = id_of(&wardrobe, "Sweaters") {
        wardrobe = wardrobe.update_category_hibernation(&id, true).0;
    }

    // record initial stock prices for the cost-per-wear view
    for category in wardrobe.categories.iter_mut() {
        let price = CATEGORIES
            .iter()
            .find(|(name, ..)| *name == category.name)
            .map(|(_, _, _, cents)| *cents);
        if let (Some(cents), Some(first)) = (price, category.purchase_history.first_mut()) {
            first.price = Some(Money::from_cents(cents * first.count));
        }
    }

    wardrobe
}

fn id_of(wardrobe: &Wardrobe, name: &str) -> Option<String> {
    find_category_by_name(&wardrobe.categories, name).map(|c| c.id.clone())
}
