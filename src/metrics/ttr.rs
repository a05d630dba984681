use tracing::{debug, info};

use super::{round2, MetricReport};
use crate::{
    data::{dates, RecordSet},
    error::KpiError,
};

/// Per-row remediation time in whole days; `None` where either date is
/// missing or unparseable.
pub fn remediation_days(
    records: &RecordSet,
    created_col: &str,
    resolved_col: &str,
) -> Result<Vec<Option<i64>>, KpiError> {
    let days: Vec<Option<i64>> = records
        .column(created_col)?
        .zip(records.column(resolved_col)?)
        .map(|(created, resolved)| dates::remediation_days(created, resolved))
        .collect();

    let valid = days.iter().flatten().count();
    if valid < days.len() {
        debug!(
            skipped = days.len() - valid,
            valid, "rows without a usable created/resolved pair"
        );
    }
    Ok(days)
}

pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&d| d as f64).sum::<f64>() / values.len() as f64)
}

/// Average remediation time over every row with both dates, rounded to 2 decimals.
pub fn time_to_remedy(
    records: &RecordSet,
    created_col: &str,
    resolved_col: &str,
) -> Result<MetricReport, KpiError> {
    let days: Vec<i64> = remediation_days(records, created_col, resolved_col)?
        .into_iter()
        .flatten()
        .collect();

    let average_days = mean(&days).map(round2);
    match average_days {
        Some(avg) => debug!(avg, samples = days.len(), "time to remedy"),
        None => info!("no rows with valid remediation times"),
    }
    Ok(MetricReport::TimeToRemedy {
        average_days,
        samples: days.len(),
    })
}
