//! The clinic reference table
//!
//! Clinics are hand-authored: five practices in the Dallas area, each
//! with a provider count and a set of specialties.

use crate::synth_data::padded_id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clinic {
    /// "C01" to "C05"
    pub clinic_id: String,
    pub clinic_name: String,
    pub city: String,
    pub state: String,
    pub total_providers: u32,
    /// Specialty tags, written out pipe-delimited
    pub specialties: Vec<String>,
}

impl Clinic {
    /// Specialties in the output format, e.g. "general|pediatrics"
    pub fn specialties_offered(&self) -> String {
        self.specialties.join("|")
    }
}

/// (name, city, providers, specialties)
const CLINICS: [(&str, &str, u32, &[&str]); 5] = [
    (
        "North Dallas Family Clinic",
        "Dallas",
        8,
        &["general", "pediatrics"],
    ),
    (
        "Plano Specialist Center",
        "Plano",
        12,
        &["cardiology", "orthopedics", "neurology"],
    ),
    ("McKinney Urgent Care", "McKinney", 5, &["urgent_care", "general"]),
    (
        "Frisco Medical Group",
        "Frisco",
        10,
        &["general", "dermatology", "pediatrics"],
    ),
    ("Allen Health Center", "Allen", 7, &["general", "womens_health"]),
];

const STATE: &str = "TX";

/// Build the clinic table. No randomness is involved.
pub fn make_clinics() -> Vec<Clinic> {
    CLINICS
        .iter()
        .enumerate()
        .map(|(n, (name, city, providers, specialties))| Clinic {
            clinic_id: padded_id('C', n + 1, 2),
            clinic_name: String::from(*name),
            city: String::from(*city),
            state: String::from(STATE),
            total_providers: *providers,
            specialties: specialties.iter().map(|s| String::from(*s)).collect(),
        })
        .collect()
}
