//! The patient reference table
//!
//! Patients are generated one column at a time from the weighted
//! stream (all ages, then all genders, then all zip codes, and so
//! on), so that the draws for one attribute do not depend on how
//! many other attributes there are per row.
//!
//! The distance to the clinic is a static per-patient attribute. It
//! is not recomputed for whichever clinic a given appointment books.

use std::collections::HashMap;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::GeneratorConfig;
use crate::error::SynthError;
use crate::synth_data::{make_gender, padded_id, round_1dp, Categorical, Gender};

/// Patient ids start after this offset ("P1001" is the first patient)
pub const PATIENT_ID_OFFSET: usize = 1000;

pub const MIN_AGE: u32 = 18;
/// Exclusive upper bound on age
pub const MAX_AGE: u32 = 85;

pub const MIN_DISTANCE_MILES: f64 = 1.0;
pub const MAX_DISTANCE_MILES: f64 = 25.0;

pub const ZIP_CODES: [&str; 7] = [
    "75020", "75021", "75023", "75034", "75035", "75074", "75075",
];

pub const CHRONIC_CONDITIONS: [u32; 4] = [0, 1, 2, 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsuranceType {
    Private,
    Medicare,
    Medicaid,
    Uninsured,
}

impl InsuranceType {
    /// All insurance types, in the same order as the configured weights
    pub const ALL: [Self; 4] = [
        Self::Private,
        Self::Medicare,
        Self::Medicaid,
        Self::Uninsured,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Medicare => "medicare",
            Self::Medicaid => "medicaid",
            Self::Uninsured => "uninsured",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    /// "P1001" onwards
    pub patient_id: String,
    pub age: u32,
    pub gender: Gender,
    pub zip_code: &'static str,
    pub insurance_type: InsuranceType,
    /// Number of chronic conditions, 0 to 3
    pub chronic_conditions: u32,
    /// Rounded to one decimal place
    pub distance_to_clinic_miles: f64,
}

/// Generate the patient table from the weighted stream.
///
/// Fails only if the configured weights are invalid.
pub fn make_patients(
    rng: &mut ChaCha8Rng,
    config: &GeneratorConfig,
) -> Result<Vec<Patient>, SynthError> {
    let insurance = Categorical::new(
        "insurance_type",
        &InsuranceType::ALL,
        &config.insurance_weights,
    )?;
    let chronic = Categorical::new(
        "chronic_conditions",
        &CHRONIC_CONDITIONS,
        &config.chronic_condition_weights,
    )?;

    let num_rows = config.num_patients;

    let ages: Vec<u32> = (0..num_rows)
        .map(|_| rng.gen_range(MIN_AGE..MAX_AGE))
        .collect();
    let genders: Vec<Gender> = (0..num_rows).map(|_| make_gender(rng)).collect();
    let zip_codes: Vec<&'static str> = (0..num_rows)
        .map(|_| ZIP_CODES[rng.gen_range(0..ZIP_CODES.len())])
        .collect();
    let insurance_types: Vec<InsuranceType> =
        (0..num_rows).map(|_| insurance.draw(rng)).collect();
    let chronic_conditions: Vec<u32> = (0..num_rows).map(|_| chronic.draw(rng)).collect();
    let distances: Vec<f64> = (0..num_rows)
        .map(|_| round_1dp(rng.gen_range(MIN_DISTANCE_MILES..MAX_DISTANCE_MILES)))
        .collect();

    let patients = (0..num_rows)
        .map(|n| Patient {
            patient_id: padded_id('P', PATIENT_ID_OFFSET + n + 1, 4),
            age: ages[n],
            gender: genders[n],
            zip_code: zip_codes[n],
            insurance_type: insurance_types[n],
            chronic_conditions: chronic_conditions[n],
            distance_to_clinic_miles: distances[n],
        })
        .collect();

    Ok(patients)
}

/// Lookup from patient id to the patient record, built once
/// after the patient table so that the appointment sampler does
/// not have to scan the table for every appointment.
pub struct PatientIndex<'a> {
    by_id: HashMap<&'a str, &'a Patient>,
}

impl<'a> PatientIndex<'a> {
    pub fn new(patients: &'a [Patient]) -> Self {
        let by_id = patients
            .iter()
            .map(|p| (p.patient_id.as_str(), p))
            .collect();
        Self { by_id }
    }

    pub fn get(&self, patient_id: &str) -> Option<&'a Patient> {
        self.by_id.get(patient_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
