//! Conversion of the generated records into Arrow record batches, and
//! serialisation of those batches to CSV.
//!
//! Column names and order are the output contract, so they are spelled
//! out once here.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use datafusion::arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use datafusion::arrow::csv::WriterBuilder;
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::RecordBatch;

use crate::appointment::Appointment;
use crate::clinic::Clinic;
use crate::dataset::Dataset;
use crate::error::SynthError;
use crate::patient::Patient;

pub const CLINICS_FILE: &str = "clinics.csv";
pub const PATIENTS_FILE: &str = "patients.csv";
pub const APPOINTMENTS_FILE: &str = "appointments.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn string_column<T: AsRef<str>>(values: impl Iterator<Item = T>) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values)) as _
}

fn u32_column(values: impl Iterator<Item = u32>) -> ArrayRef {
    Arc::new(UInt32Array::from_iter_values(values)) as _
}

pub fn clinics_record_batch(clinics: &[Clinic]) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_from_iter([
        (
            "clinic_id",
            string_column(clinics.iter().map(|c| c.clinic_id.as_str())),
        ),
        (
            "clinic_name",
            string_column(clinics.iter().map(|c| c.clinic_name.as_str())),
        ),
        ("city", string_column(clinics.iter().map(|c| c.city.as_str()))),
        ("state", string_column(clinics.iter().map(|c| c.state.as_str()))),
        (
            "total_providers",
            u32_column(clinics.iter().map(|c| c.total_providers)),
        ),
        (
            "specialties_offered",
            string_column(clinics.iter().map(|c| c.specialties_offered())),
        ),
    ])
}

pub fn patients_record_batch(patients: &[Patient]) -> Result<RecordBatch, ArrowError> {
    let distance = patients.iter().map(|p| p.distance_to_clinic_miles);
    RecordBatch::try_from_iter([
        (
            "patient_id",
            string_column(patients.iter().map(|p| p.patient_id.as_str())),
        ),
        ("age", u32_column(patients.iter().map(|p| p.age))),
        (
            "gender",
            string_column(patients.iter().map(|p| p.gender.as_str())),
        ),
        ("zip_code", string_column(patients.iter().map(|p| p.zip_code))),
        (
            "insurance_type",
            string_column(patients.iter().map(|p| p.insurance_type.as_str())),
        ),
        (
            "chronic_conditions",
            u32_column(patients.iter().map(|p| p.chronic_conditions)),
        ),
        (
            "distance_to_clinic_miles",
            Arc::new(Float64Array::from_iter_values(distance)) as _,
        ),
    ])
}

pub fn appointments_record_batch(
    appointments: &[Appointment],
) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_from_iter([
        (
            "appointment_id",
            string_column(appointments.iter().map(|a| a.appointment_id.as_str())),
        ),
        (
            "patient_id",
            string_column(appointments.iter().map(|a| a.patient_id.as_str())),
        ),
        (
            "clinic_id",
            string_column(appointments.iter().map(|a| a.clinic_id.as_str())),
        ),
        (
            "appointment_date",
            string_column(
                appointments
                    .iter()
                    .map(|a| a.appointment_date.format(DATE_FORMAT).to_string()),
            ),
        ),
        (
            "appointment_time",
            string_column(appointments.iter().map(|a| a.appointment_time.to_string())),
        ),
        (
            "scheduled_date",
            string_column(
                appointments
                    .iter()
                    .map(|a| a.scheduled_date.format(DATE_FORMAT).to_string()),
            ),
        ),
        (
            "status",
            string_column(appointments.iter().map(|a| a.status.as_str())),
        ),
        (
            "appointment_type",
            string_column(appointments.iter().map(|a| a.appointment_type.as_str())),
        ),
        (
            "duration_minutes",
            u32_column(appointments.iter().map(|a| a.duration_minutes())),
        ),
    ])
}

/// The three output tables as Arrow record batches
#[derive(Clone, Debug)]
pub struct DatasetBatches {
    pub clinics: RecordBatch,
    pub patients: RecordBatch,
    pub appointments: RecordBatch,
}

impl DatasetBatches {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, SynthError> {
        Ok(Self {
            clinics: clinics_record_batch(&dataset.clinics)?,
            patients: patients_record_batch(&dataset.patients)?,
            appointments: appointments_record_batch(&dataset.appointments)?,
        })
    }

    /// Write all three tables into `dir` (created if missing),
    /// overwriting earlier output. `on_written` is called with each
    /// path as soon as that file is saved, so files written before a
    /// failure are still reported. Returns the paths written, in
    /// clinics, patients, appointments order.
    pub fn write_csv_files<F>(
        &self,
        dir: &Path,
        mut on_written: F,
    ) -> Result<Vec<PathBuf>, SynthError>
    where
        F: FnMut(&Path),
    {
        fs::create_dir_all(dir).map_err(|e| SynthError::io(dir, e))?;
        let mut written = Vec::new();
        for (filename, batch) in [
            (CLINICS_FILE, &self.clinics),
            (PATIENTS_FILE, &self.patients),
            (APPOINTMENTS_FILE, &self.appointments),
        ] {
            let path = dir.join(filename);
            save_csv(&path, batch)?;
            on_written(&path);
            written.push(path);
        }
        Ok(written)
    }
}

/// Write a record batch to a CSV file with a header row.
pub fn save_csv(path: &Path, batch: &RecordBatch) -> Result<(), SynthError> {
    let file = fs::File::create(path).map_err(|e| SynthError::io(path, e))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    writer
        .into_inner()
        .flush()
        .map_err(|e| SynthError::io(path, e))?;
    tracing::debug!(path = %path.display(), rows = batch.num_rows(), "wrote csv");
    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::config::GeneratorConfig;

    fn small_dataset() -> Dataset {
        let config = GeneratorConfig {
            num_patients: 20,
            num_appointments: 50,
            ..GeneratorConfig::default()
        };
        Dataset::generate(&config).unwrap()
    }

    #[test]
    fn batches_have_contract_columns() {
        let batches = DatasetBatches::from_dataset(&small_dataset()).unwrap();

        let names = |b: &RecordBatch| -> Vec<String> {
            b.schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect()
        };
        assert_eq!(
            names(&batches.clinics),
            vec![
                "clinic_id",
                "clinic_name",
                "city",
                "state",
                "total_providers",
                "specialties_offered"
            ]
        );
        assert_eq!(
            names(&batches.patients),
            vec![
                "patient_id",
                "age",
                "gender",
                "zip_code",
                "insurance_type",
                "chronic_conditions",
                "distance_to_clinic_miles"
            ]
        );
        assert_eq!(
            names(&batches.appointments),
            vec![
                "appointment_id",
                "patient_id",
                "clinic_id",
                "appointment_date",
                "appointment_time",
                "scheduled_date",
                "status",
                "appointment_type",
                "duration_minutes"
            ]
        );
        assert_eq!(batches.clinics.num_rows(), 5);
        assert_eq!(batches.patients.num_rows(), 20);
        assert_eq!(batches.appointments.num_rows(), 50);
    }

    #[test]
    fn csv_files_have_header_and_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let batches = DatasetBatches::from_dataset(&small_dataset()).unwrap();
        let written = batches.write_csv_files(dir.path(), |_| ()).unwrap();
        assert_eq!(written.len(), 3);

        let clinics = fs::read_to_string(dir.path().join(CLINICS_FILE)).unwrap();
        let mut lines = clinics.lines();
        assert_eq!(
            lines.next(),
            Some("clinic_id,clinic_name,city,state,total_providers,specialties_offered")
        );
        assert_eq!(
            lines.next(),
            Some("C01,North Dallas Family Clinic,Dallas,TX,8,general|pediatrics")
        );
        assert_eq!(clinics.lines().count(), 6);

        let patients = fs::read_to_string(dir.path().join(PATIENTS_FILE)).unwrap();
        assert_eq!(patients.lines().count(), 21);
        assert!(patients.lines().nth(1).unwrap().starts_with("P1001,"));

        let appointments = fs::read_to_string(dir.path().join(APPOINTMENTS_FILE)).unwrap();
        assert_eq!(appointments.lines().count(), 51);
        let fields: Vec<&str> = appointments.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], "A00001");
        assert_eq!(fields[3].len(), "2023-07-01".len());
        assert!(fields[4].ends_with(":00"));
    }

    #[test]
    fn every_distance_has_exactly_one_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset::generate(&GeneratorConfig::default()).unwrap();
        DatasetBatches::from_dataset(&dataset)
            .unwrap()
            .write_csv_files(dir.path(), |_| ())
            .unwrap();

        let patients = fs::read_to_string(dir.path().join(PATIENTS_FILE)).unwrap();
        let mut rows = 0;
        for line in patients.lines().skip(1) {
            let distance = line.rsplit(',').next().unwrap();
            let decimals = distance.split('.').nth(1).map_or(0, str::len);
            assert_eq!(decimals, 1, "distance {distance} in row {line}");
            let miles: f64 = distance.parse().unwrap();
            assert!((1.0..=25.0).contains(&miles), "distance {distance}");
            rows += 1;
        }
        assert_eq!(rows, 500);
    }

    #[test]
    fn each_file_is_reported_as_it_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in the way of the last file makes its write fail
        fs::create_dir(dir.path().join(APPOINTMENTS_FILE)).unwrap();
        let batches = DatasetBatches::from_dataset(&small_dataset()).unwrap();

        let mut reported = Vec::new();
        let err = batches
            .write_csv_files(dir.path(), |path| reported.push(path.to_path_buf()))
            .unwrap_err();
        assert!(matches!(err, SynthError::Io { .. }));
        assert_eq!(
            reported,
            vec![dir.path().join(CLINICS_FILE), dir.path().join(PATIENTS_FILE)]
        );
        assert!(dir.path().join(PATIENTS_FILE).is_file());
    }

    #[test]
    fn rewriting_gives_identical_files() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::default();

        for dir in [&first, &second] {
            let dataset = Dataset::generate(&config).unwrap();
            DatasetBatches::from_dataset(&dataset)
                .unwrap()
                .write_csv_files(dir.path(), |_| ())
                .unwrap();
        }

        for filename in [CLINICS_FILE, PATIENTS_FILE, APPOINTMENTS_FILE] {
            let a = fs::read(first.path().join(filename)).unwrap();
            let b = fs::read(second.path().join(filename)).unwrap();
            assert_eq!(a, b, "{filename} differs between runs");
        }
    }

    #[test]
    fn existing_files_are_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CLINICS_FILE), "stale\n".repeat(100)).unwrap();
        let batches = DatasetBatches::from_dataset(&small_dataset()).unwrap();
        batches.write_csv_files(dir.path(), |_| ()).unwrap();
        let clinics = fs::read_to_string(dir.path().join(CLINICS_FILE)).unwrap();
        assert_eq!(clinics.lines().count(), 6);
        assert!(!clinics.contains("stale"));
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let batches = DatasetBatches::from_dataset(&small_dataset()).unwrap();
        let err = batches.write_csv_files(&blocker, |_| ()).unwrap_err();
        assert!(matches!(err, SynthError::Io { .. }));
    }
}
