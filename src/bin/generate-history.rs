//! Writes the synthetic historical delay file the server reads at startup.
//!
//! Usage: `generate-history [output-path]` (default `historical_delays.csv`).

use anyhow::Result;
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use traindash_server::history::HistoricalRow;
use traindash_server::stations::StationRegistry;

const EVENT_DAY_COUNT: usize = 10;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "historical_delays.csv".to_string());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();

    let mut rng = rand::thread_rng();
    let event_days: HashSet<NaiveDate> = dates
        .choose_multiple(&mut rng, EVENT_DAY_COUNT)
        .cloned()
        .collect();

    let registry = StationRegistry::new();
    let mut writer = csv::Writer::from_path(&path)?;

    for date in &dates {
        for station in registry.all() {
            writer.serialize(HistoricalRow {
                date: *date,
                station: station.name.clone(),
                delay_rate_percent: rng.gen_range(10..=60) as f64,
                is_event_day: event_days.contains(date),
            })?;
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} days x {} stations of synthetic delay data to {}",
        dates.len(),
        registry.all().len(),
        path
    );
    Ok(())
}
