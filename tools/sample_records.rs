//! Sample Property Records
//!
//! Prints property records as JSON lines for piping into the predictor:
//! the three demonstration records first, then optional random ones.
//!
//! Usage: sample-records [count] [seed]

use hdb_price_predictor::types::{FlatModel, FlatType, PropertyInput, PropertyRecord, StoreyRange, Town};
use hdb_price_predictor::validation::{current_year, MIN_LEASE_YEAR};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use tracing::info;

/// Random record generator for manual testing
struct RecordGenerator {
    rng: StdRng,
    current_year: i32,
}

impl RecordGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            current_year: current_year(),
        }
    }

    /// Generate a random record that passes validation
    fn generate(&mut self) -> PropertyRecord {
        let town = *self.random_choice(Town::ALL);
        let flat_type = *self.random_choice(FlatType::ALL);
        let storey_range = *self.random_choice(StoreyRange::ALL);
        let flat_model = *self.random_choice(FlatModel::ALL);

        // Whole square metres, like the form slider
        let floor_area_sqm = self.rng.gen_range(30..=200) as f64;
        let lease_commence_date = self.rng.gen_range(MIN_LEASE_YEAR..=self.current_year);

        PropertyRecord::new(
            town,
            flat_type,
            storey_range,
            floor_area_sqm,
            flat_model,
            lease_commence_date,
        )
    }

    fn random_choice<'a, T>(&mut self, choices: &'a [T]) -> &'a T {
        &choices[self.rng.gen_range(0..choices.len())]
    }
}

/// The fixed demonstration records
fn demo_records() -> Vec<PropertyRecord> {
    vec![
        PropertyRecord::new(
            Town::AngMoKio,
            FlatType::FourRoom,
            StoreyRange::S10To12,
            105.0,
            FlatModel::ModelA,
            1990,
        ),
        PropertyRecord::new(
            Town::Bedok,
            FlatType::FiveRoom,
            StoreyRange::S07To09,
            125.0,
            FlatModel::Improved,
            1985,
        ),
        PropertyRecord::new(
            Town::Tampines,
            FlatType::ThreeRoom,
            StoreyRange::S04To06,
            85.0,
            FlatModel::NewGeneration,
            2000,
        ),
    ]
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_records=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
    let seed: Option<u64> = args.get(2).and_then(|s| s.parse().ok());

    info!(count = count, seed = ?seed, "Generating sample records");

    let mut generator = RecordGenerator::new(seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let records = demo_records()
        .into_iter()
        .chain(std::iter::repeat_with(|| generator.generate()).take(count));
    for record in records {
        let line = serde_json::to_string(&PropertyInput::from(&record))?;
        writeln!(out, "{line}")?;
    }

    info!(total = count + 3, "Sample records written");

    Ok(())
}
