//! Synthetic response datasets for demos and benchmarking.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;

/// Shape of a generated dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    pub students: usize,
    pub questions: usize,
    pub max_marks: u32,
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            students: 100,
            questions: 15,
            max_marks: 5,
            seed: None,
        }
    }
}

impl GenerateOptions {
    pub fn row_count(&self) -> usize {
        self.students * self.questions
    }
}

/// Every student answers every question; marks are uniform in `0..=max_marks`.
pub fn generate_csv(options: &GenerateOptions) -> String {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut csv = String::with_capacity(options.row_count() * 12 + 32);
    csv.push_str("question,student_id,marks\n");
    for s in 1..=options.students {
        for q in 1..=options.questions {
            let marks = rng.gen_range(0..=options.max_marks);
            let _ = writeln!(csv, "Q{q},S{s},{marks}");
        }
    }
    csv
}
