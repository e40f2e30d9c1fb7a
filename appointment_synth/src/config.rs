//! Generator parameters
//!
//! Every knob of the generator lives in one struct whose default
//! is the fixed dataset: 500 patients, 10,000 appointments between
//! 2023-07-01 and 2024-12-31, seed 42. The binary always runs with
//! the default and never reads a config file.
//!
//! [`GeneratorConfig::from_reader`] is library and test API only: a
//! YAML document can override individual fields (missing fields keep
//! their default) when the crate is used as a library.

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SynthError;

pub const DEFAULT_SEED: u64 = 42;
pub const NUM_PATIENTS: usize = 500;
pub const NUM_APPOINTMENTS: usize = 10_000;

/// Weights for private, medicare, medicaid, uninsured
pub const INSURANCE_WEIGHTS: [f64; 4] = [0.50, 0.25, 0.15, 0.10];

/// Weights for 0, 1, 2 and 3 chronic conditions
pub const CHRONIC_CONDITION_WEIGHTS: [f64; 4] = [0.6, 0.25, 0.10, 0.05];

/// Weights for general_checkup, follow_up, specialist, urgent_care, preventive
pub const APPOINTMENT_TYPE_WEIGHTS: [f64; 5] = [0.35, 0.25, 0.20, 0.10, 0.10];

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 7, 1).expect("2023-07-01 is a valid date")
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("2024-12-31 is a valid date")
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Global seed from which both random streams are derived
    pub seed: u64,
    pub num_patients: usize,
    pub num_appointments: usize,
    /// First possible appointment date (inclusive)
    pub start_date: NaiveDate,
    /// Last possible appointment date (inclusive)
    pub end_date: NaiveDate,
    pub insurance_weights: [f64; 4],
    pub chronic_condition_weights: [f64; 4],
    pub appointment_type_weights: [f64; 5],
    /// Directory the three CSV files are written to
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            num_patients: NUM_PATIENTS,
            num_appointments: NUM_APPOINTMENTS,
            start_date: default_start_date(),
            end_date: default_end_date(),
            insurance_weights: INSURANCE_WEIGHTS,
            chronic_condition_weights: CHRONIC_CONDITION_WEIGHTS,
            appointment_type_weights: APPOINTMENT_TYPE_WEIGHTS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    /// Read a config from a YAML byte source and validate it.
    ///
    /// You can pass the result of std::fs::File::open() on
    /// a yaml file to this function.
    pub fn from_reader<R>(reader: R) -> Result<Self, SynthError>
    where
        R: Read,
    {
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parameters that the samplers rely on. Weights are
    /// checked separately when the categorical distributions are built.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.start_date > self.end_date {
            return Err(SynthError::Config(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.num_patients == 0 {
            return Err(SynthError::Config(String::from(
                "num_patients must be at least 1",
            )));
        }
        if self.num_appointments == 0 {
            return Err(SynthError::Config(String::from(
                "num_appointments must be at least 1",
            )));
        }
        Ok(())
    }

    /// Number of days in the inclusive appointment date range, minus one
    pub fn date_span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
