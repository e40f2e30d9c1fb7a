//! Generic helpers used across the different synthetic tables, such as
//! gender, weighted categorical draws and the zero-padded identifiers
//! present in all tables.

use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::SynthError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "F",
            Self::Male => "M",
        }
    }
}

/// Pick gender uniform randomly (only male or female)
pub fn make_gender(rng: &mut ChaCha8Rng) -> Gender {
    if rng.gen() {
        Gender::Female
    } else {
        Gender::Male
    }
}

/// A fixed set of outcomes with a probability weight for each.
///
/// The weights are checked once, when the categorical is built, so
/// drawing from it cannot fail.
#[derive(Clone, Debug)]
pub struct Categorical<T> {
    outcomes: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Categorical<T> {
    /// `name` is only used to label the error if the weights are invalid
    /// (negative, all zero, or a different count to the outcomes).
    pub fn new(name: &'static str, outcomes: &[T], weights: &[f64]) -> Result<Self, SynthError> {
        if outcomes.len() != weights.len() {
            return Err(SynthError::Config(format!(
                "{name}: {} outcomes but {} weights",
                outcomes.len(),
                weights.len()
            )));
        }
        let index =
            WeightedIndex::new(weights).map_err(|source| SynthError::Weights { name, source })?;
        Ok(Self {
            outcomes: outcomes.to_vec(),
            index,
        })
    }

    pub fn draw(&self, rng: &mut ChaCha8Rng) -> T {
        self.outcomes[self.index.sample(rng)]
    }
}

/// Zero-padded identifier, e.g. `padded_id('P', 1001, 4)` is "P1001"
/// and `padded_id('C', 1, 2)` is "C01"
pub fn padded_id(prefix: char, n: usize, width: usize) -> String {
    format!("{prefix}{n:0width$}")
}

/// Round to one decimal place
pub fn round_1dp(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
