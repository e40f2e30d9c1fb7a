//! Builds the three tables in dependency order: clinics and patients
//! first, then the appointments that reference them.

use crate::appointment::{make_appointments, Appointment};
use crate::clinic::{make_clinics, Clinic};
use crate::config::GeneratorConfig;
use crate::error::SynthError;
use crate::patient::{make_patients, Patient};
use crate::seeded_rng::RandomSources;

#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub clinics: Vec<Clinic>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
}

impl Dataset {
    /// Generate the whole dataset from one config. The same config
    /// (and so the same seed) always produces the same dataset.
    pub fn generate(config: &GeneratorConfig) -> Result<Self, SynthError> {
        config.validate()?;
        let mut sources = RandomSources::new(config.seed);

        let clinics = make_clinics();
        tracing::debug!(rows = clinics.len(), "built clinics table");

        let patients = make_patients(&mut sources.weighted, config)?;
        tracing::debug!(rows = patients.len(), "built patients table");

        let appointments = make_appointments(&mut sources, config, &patients, &clinics)?;
        tracing::debug!(rows = appointments.len(), "built appointments table");

        Ok(Self {
            clinics,
            patients,
            appointments,
        })
    }
}
