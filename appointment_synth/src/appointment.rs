//! Appointment sampler
//!
//! Each appointment gets a uniformly random date, lead time and
//! time slot, a weighted random appointment type, and a patient and
//! clinic picked uniformly (with replacement) from the reference
//! tables. Nothing stops two appointments landing in the same slot.
//!
//! The status is then drawn from an additive model: a base no-show
//! probability is nudged up or down by the lead time, the patient's
//! insurance, distance and age, and the appointment type. The
//! cancellation probability is fixed. Neither probability is clamped.

use std::fmt;

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::clinic::Clinic;
use crate::config::GeneratorConfig;
use crate::error::SynthError;
use crate::patient::{InsuranceType, Patient, PatientIndex};
use crate::seeded_rng::RandomSources;
use crate::synth_data::{padded_id, Categorical};

pub const MIN_LEAD_TIME_DAYS: i64 = 1;
pub const MAX_LEAD_TIME_DAYS: i64 = 30;

/// Business hours (no 12 o'clock slot)
pub const SLOT_HOURS: [u32; 8] = [8, 9, 10, 11, 13, 14, 15, 16];
pub const SLOT_MINUTES: [u32; 2] = [0, 30];

pub const BASE_NO_SHOW_PROBABILITY: f64 = 0.15;
pub const CANCEL_PROBABILITY: f64 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppointmentType {
    GeneralCheckup,
    FollowUp,
    Specialist,
    UrgentCare,
    Preventive,
}

impl AppointmentType {
    /// All appointment types, in the same order as the configured weights
    pub const ALL: [Self; 5] = [
        Self::GeneralCheckup,
        Self::FollowUp,
        Self::Specialist,
        Self::UrgentCare,
        Self::Preventive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralCheckup => "general_checkup",
            Self::FollowUp => "follow_up",
            Self::Specialist => "specialist",
            Self::UrgentCare => "urgent_care",
            Self::Preventive => "preventive",
        }
    }

    /// Fixed length of the booked slot
    pub fn duration_minutes(&self) -> u32 {
        match self {
            Self::GeneralCheckup => 30,
            Self::FollowUp => 30,
            Self::Specialist => 45,
            Self::UrgentCare => 60,
            Self::Preventive => 30,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Completed,
    NoShow,
    Cancelled,
}

impl Status {
    pub const ALL: [Self; 3] = [Self::Completed, Self::NoShow, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Start time of an appointment, always on the hour or half hour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotTime {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:00", self.hour, self.minute)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Appointment {
    /// "A00001" onwards
    pub appointment_id: String,
    pub patient_id: String,
    pub clinic_id: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: SlotTime,
    /// appointment_date minus the lead time. May fall before the
    /// start of the date range.
    pub scheduled_date: NaiveDate,
    pub status: Status,
    pub appointment_type: AppointmentType,
    /// Days between scheduling and the appointment (not written out)
    pub lead_time_days: i64,
}

impl Appointment {
    pub fn duration_minutes(&self) -> u32 {
        self.appointment_type.duration_minutes()
    }
}

/// Probability that the patient does not turn up.
///
/// The result is not clamped to [0, 1].
pub fn no_show_probability(
    lead_time_days: i64,
    patient: &Patient,
    appointment_type: AppointmentType,
) -> f64 {
    let mut p = BASE_NO_SHOW_PROBABILITY;

    // Longer lead time, more no-shows
    if lead_time_days > 20 {
        p += 0.08;
    } else if lead_time_days > 10 {
        p += 0.03;
    }

    match patient.insurance_type {
        InsuranceType::Uninsured => p += 0.10,
        InsuranceType::Medicaid => p += 0.05,
        InsuranceType::Private | InsuranceType::Medicare => (),
    }

    if patient.distance_to_clinic_miles > 15.0 {
        p += 0.07;
    }

    if patient.age < 30 {
        p += 0.05;
    }

    if appointment_type == AppointmentType::UrgentCare {
        p -= 0.10;
    }

    p
}

/// Map a uniform draw r in [0, 1) onto a status using two cut points:
/// below no_show_prob is a no-show, below no_show_prob + CANCEL_PROBABILITY
/// is a cancellation, anything else completed.
pub fn status_from_draw(r: f64, no_show_prob: f64) -> Status {
    if r < no_show_prob {
        Status::NoShow
    } else if r < no_show_prob + CANCEL_PROBABILITY {
        Status::Cancelled
    } else {
        Status::Completed
    }
}

/// Draw one appointment date uniformly over the inclusive range
fn make_appointment_date(rng: &mut ChaCha8Rng, config: &GeneratorConfig) -> NaiveDate {
    let offset = rng.gen_range(0..=config.date_span_days());
    config.start_date + Duration::days(offset)
}

fn make_slot_time(rng: &mut ChaCha8Rng) -> SlotTime {
    let hour = SLOT_HOURS[rng.gen_range(0..SLOT_HOURS.len())];
    let minute = SLOT_MINUTES[rng.gen_range(0..SLOT_MINUTES.len())];
    SlotTime { hour, minute }
}

/// Generate the appointment table.
///
/// Patients and clinics must already exist; every appointment
/// references one of them. The order of draws from each stream is
/// fixed, so the same seed always gives the same table. The config
/// is validated first, so a reversed date range is an error rather
/// than a panic in the date draw.
pub fn make_appointments(
    sources: &mut RandomSources,
    config: &GeneratorConfig,
    patients: &[Patient],
    clinics: &[Clinic],
) -> Result<Vec<Appointment>, SynthError> {
    config.validate()?;
    if patients.is_empty() || clinics.is_empty() {
        return Err(SynthError::Config(String::from(
            "appointments need at least one patient and one clinic",
        )));
    }

    let type_dist = Categorical::new(
        "appointment_type",
        &AppointmentType::ALL,
        &config.appointment_type_weights,
    )?;
    let index = PatientIndex::new(patients);

    let mut appointments = Vec::with_capacity(config.num_appointments);
    for n in 0..config.num_appointments {
        let rng = &mut sources.general;

        let appointment_date = make_appointment_date(rng, config);
        let lead_time_days = rng.gen_range(MIN_LEAD_TIME_DAYS..=MAX_LEAD_TIME_DAYS);
        let scheduled_date = appointment_date - Duration::days(lead_time_days);
        let appointment_time = make_slot_time(rng);

        let appointment_type = type_dist.draw(&mut sources.weighted);

        let patient_id = &patients[rng.gen_range(0..patients.len())].patient_id;
        let clinic_id = &clinics[rng.gen_range(0..clinics.len())].clinic_id;

        let patient = index
            .get(patient_id)
            .ok_or_else(|| SynthError::Config(format!("unknown patient {patient_id}")))?;
        let no_show_prob = no_show_probability(lead_time_days, patient, appointment_type);
        let status = status_from_draw(rng.gen::<f64>(), no_show_prob);

        appointments.push(Appointment {
            appointment_id: padded_id('A', n + 1, 5),
            patient_id: patient_id.clone(),
            clinic_id: clinic_id.clone(),
            appointment_date,
            appointment_time,
            scheduled_date,
            status,
            appointment_type,
            lead_time_days,
        });
    }

    Ok(appointments)
}
