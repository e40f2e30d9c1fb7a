//! Aggregate statistics over the generated tables
//!
//! The record batches are registered as tables in a DataFusion
//! session and summarised with SQL, i.e. the summary reads the same
//! columns that were written to disk rather than the in-memory structs.

use std::fmt;

use datafusion::arrow::array::{Array, AsArray};
use datafusion::arrow::compute::cast;
use datafusion::arrow::datatypes::{DataType, Int64Type};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::prelude::*;

use crate::appointment::Status;
use crate::error::SynthError;
use crate::tables::DatasetBatches;

const RULE_WIDTH: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSummary {
    pub clinics: usize,
    pub patients: usize,
    pub appointments: usize,
    /// Earliest appointment date (None if there are no appointments)
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    /// Count per status label, most frequent first
    pub status_counts: Vec<(String, usize)>,
}

impl DatasetSummary {
    pub fn count(&self, status: Status) -> usize {
        self.status_counts
            .iter()
            .find(|(label, _)| label == status.as_str())
            .map_or(0, |(_, n)| *n)
    }

    /// Percentage of appointments with this status (0 if there are
    /// no appointments)
    pub fn rate(&self, status: Status) -> f64 {
        if self.appointments == 0 {
            0.0
        } else {
            self.count(status) as f64 / self.appointments as f64 * 100.0
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        writeln!(f, "DATASET SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;
        writeln!(f, "Clinics: {}", self.clinics)?;
        writeln!(f, "Patients: {}", self.patients)?;
        writeln!(f, "Appointments: {}", self.appointments)?;
        writeln!(f)?;
        writeln!(
            f,
            "Date Range: {} to {}",
            self.first_date.as_deref().unwrap_or("-"),
            self.last_date.as_deref().unwrap_or("-")
        )?;
        writeln!(f)?;
        writeln!(f, "Appointment Status Breakdown:")?;
        for (label, n) in &self.status_counts {
            writeln!(f, "  {label:<12}{n:>6}")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Overall No-Show Rate: {:.1}%",
            self.rate(Status::NoShow)
        )?;
        writeln!(
            f,
            "Overall Cancellation Rate: {:.1}%",
            self.rate(Status::Cancelled)
        )?;
        writeln!(
            f,
            "Overall Completion Rate: {:.1}%",
            self.rate(Status::Completed)
        )?;
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Data generation complete! Files ready for analysis.")?;
        write!(f, "{rule}")
    }
}

async fn query(ctx: &SessionContext, sql: &str) -> Result<Vec<RecordBatch>, SynthError> {
    let df = ctx.sql(sql).await?;
    Ok(df.collect().await?)
}

/// Read column `index` of every result batch as i64 values (nulls skipped)
fn int_values(batches: &[RecordBatch], index: usize) -> Result<Vec<i64>, SynthError> {
    let mut values = Vec::new();
    for batch in batches {
        let column = cast(batch.column(index), &DataType::Int64)?;
        values.extend(column.as_primitive::<Int64Type>().iter().flatten());
    }
    Ok(values)
}

/// Read column `index` of every result batch as strings (nulls kept as None)
fn string_values(batches: &[RecordBatch], index: usize) -> Result<Vec<Option<String>>, SynthError> {
    let mut values = Vec::new();
    for batch in batches {
        let column = cast(batch.column(index), &DataType::Utf8)?;
        let column = column.as_string::<i32>();
        values.extend((0..column.len()).map(|n| {
            if column.is_null(n) {
                None
            } else {
                Some(column.value(n).to_string())
            }
        }));
    }
    Ok(values)
}

async fn row_count(ctx: &SessionContext, table: &str) -> Result<usize, SynthError> {
    let batches = query(ctx, &format!("SELECT COUNT(*) FROM {table}")).await?;
    let n = int_values(&batches, 0)?.first().copied().unwrap_or(0);
    Ok(n as usize)
}

/// Compute the summary statistics for the three tables.
pub async fn summarise(batches: &DatasetBatches) -> Result<DatasetSummary, SynthError> {
    let ctx = SessionContext::new();
    ctx.register_batch("clinics", batches.clinics.clone())?;
    ctx.register_batch("patients", batches.patients.clone())?;
    ctx.register_batch("appointments", batches.appointments.clone())?;

    let clinics = row_count(&ctx, "clinics").await?;
    let patients = row_count(&ctx, "patients").await?;
    let appointments = row_count(&ctx, "appointments").await?;

    let range = query(
        &ctx,
        "SELECT MIN(appointment_date), MAX(appointment_date) FROM appointments",
    )
    .await?;
    let first_date = string_values(&range, 0)?.into_iter().next().flatten();
    let last_date = string_values(&range, 1)?.into_iter().next().flatten();

    let by_status = query(
        &ctx,
        "SELECT status, COUNT(*) AS n FROM appointments \
         GROUP BY status ORDER BY n DESC, status",
    )
    .await?;
    let labels = string_values(&by_status, 0)?;
    let counts = int_values(&by_status, 1)?;
    let status_counts = labels
        .into_iter()
        .zip(counts)
        .map(|(label, n)| (label.unwrap_or_default(), n as usize))
        .collect();

    let summary = DatasetSummary {
        clinics,
        patients,
        appointments,
        first_date,
        last_date,
        status_counts,
    };
    tracing::debug!(?summary, "computed dataset summary");
    Ok(summary)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::config::GeneratorConfig;
    use crate::dataset::Dataset;

    fn hand_made_summary() -> DatasetSummary {
        DatasetSummary {
            clinics: 5,
            patients: 500,
            appointments: 1_000,
            first_date: Some(String::from("2023-07-01")),
            last_date: Some(String::from("2024-12-31")),
            status_counts: vec![
                (String::from("completed"), 700),
                (String::from("no_show"), 221),
                (String::from("cancelled"), 79),
            ],
        }
    }

    #[test]
    fn rates_are_percentages_of_appointments() {
        let summary = hand_made_summary();
        assert!((summary.rate(Status::Completed) - 70.0).abs() < 1e-9);
        assert!((summary.rate(Status::NoShow) - 22.1).abs() < 1e-9);
        assert!((summary.rate(Status::Cancelled) - 7.9).abs() < 1e-9);
    }

    #[test]
    fn missing_status_counts_as_zero() {
        let mut summary = hand_made_summary();
        summary.status_counts.retain(|(label, _)| label != "cancelled");
        assert_eq!(summary.count(Status::Cancelled), 0);
        assert_eq!(summary.rate(Status::Cancelled), 0.0);
    }

    #[test]
    fn rendered_block_has_rates_to_one_decimal() {
        let text = hand_made_summary().to_string();
        assert!(text.starts_with(&"=".repeat(50)));
        assert!(text.contains("DATASET SUMMARY"));
        assert!(text.contains("Appointments: 1000"));
        assert!(text.contains("Date Range: 2023-07-01 to 2024-12-31"));
        assert!(text.contains("Overall No-Show Rate: 22.1%"));
        assert!(text.contains("Overall Cancellation Rate: 7.9%"));
        assert!(text.contains("Overall Completion Rate: 70.0%"));
    }

    #[tokio::test]
    async fn summary_matches_generated_data() {
        let config = GeneratorConfig::default();
        let dataset = Dataset::generate(&config).unwrap();
        let batches = DatasetBatches::from_dataset(&dataset).unwrap();
        let summary = summarise(&batches).await.unwrap();

        assert_eq!(summary.clinics, 5);
        assert_eq!(summary.patients, 500);
        assert_eq!(summary.appointments, 10_000);

        let total: usize = summary.status_counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 10_000);
        for status in Status::ALL {
            let expected = dataset
                .appointments
                .iter()
                .filter(|a| a.status == status)
                .count();
            assert_eq!(summary.count(status), expected);
        }

        let counts: Vec<usize> = summary.status_counts.iter().map(|(_, n)| *n).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));

        let first = dataset.appointments.iter().map(|a| a.appointment_date).min();
        let last = dataset.appointments.iter().map(|a| a.appointment_date).max();
        assert_eq!(summary.first_date, first.map(|d| d.to_string()));
        assert_eq!(summary.last_date, last.map(|d| d.to_string()));
    }
}
