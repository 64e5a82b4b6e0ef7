//! Demo dataset generation.
//!
//! Produces an employee table with numeric and categorical columns and a
//! fixed share of missing cells per column, so every stage of the cleaning
//! pipeline has something to do. Generation is seeded and reproducible.

use crate::dataset::{CellValue, Dataset, Row};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};
use statrs::distribution::{Exp, Normal};
use tracing::debug;

pub const DEFAULT_SAMPLE_ROWS: usize = 50;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

pub const DEPARTMENTS: &[&str] = &["Sales", "IT", "HR", "Marketing", "Finance"];
pub const CITIES: &[&str] = &["New York", "London", "Tokyo", "Mumbai", "Berlin"];
pub const EDUCATION_LEVELS: &[&str] = &["High School", "Bachelor", "Master", "PhD"];

/// Share of rows blanked per column, in the order they are applied.
pub const MISSING_RATES: &[(&str, f64)] = &[
    ("age", 0.15),
    ("salary", 0.20),
    ("experience", 0.10),
    ("department", 0.25),
    ("city", 0.30),
    ("performance", 0.60),
    ("education", 0.12),
];

/// Seeded generator for the demo dataset.
#[derive(Debug, Clone)]
pub struct SampleGenerator {
    rows: usize,
    seed: u64,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_ROWS)
    }
}

impl SampleGenerator {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            seed: DEFAULT_SAMPLE_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generate the dataset.
    ///
    /// Each column in [`MISSING_RATES`] gets exactly `floor(rows * rate)`
    /// missing cells at distinct rows.
    pub fn generate(&self) -> Dataset {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let rows: Vec<Row> = (1..=self.rows)
            .map(|id| {
                let mut row = Row::new();
                row.insert("id".into(), CellValue::Number(id as f64));
                row.insert("age".into(), normal(&mut rng, 35.0, 10.0).max(0.0).into());
                row.insert("salary".into(), exponential(&mut rng, 50_000.0).into());
                row.insert("experience".into(), normal(&mut rng, 10.0, 5.0).max(0.0).into());
                row.insert("department".into(), choice(&mut rng, DEPARTMENTS).into());
                row.insert("city".into(), choice(&mut rng, CITIES).into());
                row.insert("performance".into(), uniform(&mut rng, 1.0, 10.0).into());
                row.insert("education".into(), choice(&mut rng, EDUCATION_LEVELS).into());
                row
            })
            .collect();

        let mut dataset = Dataset::from_rows(rows);
        for (column, rate) in MISSING_RATES {
            let count = (self.rows as f64 * rate).floor() as usize;
            for i in index::sample(&mut rng, self.rows, count).into_iter() {
                if let Some(cell) = dataset.rows_mut()[i].get_mut(*column) {
                    *cell = CellValue::Missing;
                }
            }
            debug!("Blanked {} cells in '{}'", count, column);
        }

        dataset
    }
}

/// Normal draw. Invalid parameters yield the mean.
fn normal<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).map_or(mean, |dist| dist.sample(rng))
}

/// Exponential draw with the given mean.
fn exponential<R: Rng>(rng: &mut R, mean: f64) -> f64 {
    Exp::new(1.0 / mean).map_or(mean, |dist| dist.sample(rng))
}

fn uniform<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen_range(min..max)
}

fn choice<R: Rng>(rng: &mut R, options: &[&str]) -> String {
    options[rng.gen_range(0..options.len())].to_string()
}
