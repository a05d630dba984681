use tracing::debug;

use super::MetricReport;
use crate::{data::RecordSet, error::KpiError};

/// Statuses that mean the issue is no longer active. Compared lower-cased.
pub const CLOSED_STATUSES: &[&str] = &["done", "cancelled", "resolved"];

const CRITICAL_MARKER: &str = "critical";

fn is_critical(priority: Option<&str>) -> bool {
    priority.map_or(false, |p| p.to_lowercase().contains(CRITICAL_MARKER))
}

/// A missing status is treated as still open.
fn is_active(status: Option<&str>) -> bool {
    match status {
        Some(s) => !CLOSED_STATUSES.contains(&s.to_lowercase().as_str()),
        None => true,
    }
}

/// Count rows whose priority mentions "critical" and whose status is not closed.
pub fn active_critical(
    records: &RecordSet,
    priority_col: &str,
    status_col: &str,
) -> Result<MetricReport, KpiError> {
    let count = records
        .column(priority_col)?
        .zip(records.column(status_col)?)
        .filter(|&(priority, status)| is_critical(priority) && is_active(status))
        .count();
    debug!(count, "active critical rows");
    Ok(MetricReport::ActiveCritical { count })
}
