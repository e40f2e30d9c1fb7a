//! Synthetic clinic appointment data
//!
//! Builds three related tables (clinics, patients, appointments) from
//! a seeded random source, writes them as CSV, and summarises them.
//! The same [`GeneratorConfig`] always produces byte-identical files.

pub use config::GeneratorConfig;
pub use dataset::Dataset;
pub use error::SynthError;
pub use summary::{summarise, DatasetSummary};
pub use tables::DatasetBatches;

pub mod appointment;
pub mod clinic;
pub mod config;
pub mod dataset;
pub mod error;
pub mod patient;
pub mod seeded_rng;
pub mod summary;
pub mod synth_data;
pub mod tables;
