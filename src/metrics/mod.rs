// src/metrics/mod.rs
pub mod nacv;
pub mod nvt;
pub mod ttr;
pub mod ttrc;

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::{config::KpiConfig, data::RecordSet, error::KpiError};

pub use nvt::TeamCount;
pub use ttrc::SeverityMean;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum Metric {
    /// Number of active critical vulnerabilities
    Nacv,
    /// Average time to remedy
    Ttr,
    /// Number of vulnerabilities per team
    Nvt,
    /// Average time to remedy per severity
    Ttrc,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Nacv => "NACV",
            Metric::Ttr => "TTR",
            Metric::Nvt => "NVT",
            Metric::Ttrc => "TTRC",
        }
    }

    /// Columns that must exist before this metric may run.
    pub fn required_columns<'a>(&self, config: &'a KpiConfig) -> Vec<&'a str> {
        let c = &config.columns;
        match self {
            Metric::Nacv => vec![c.priority.as_str(), c.status.as_str()],
            Metric::Ttr => vec![c.created.as_str(), c.resolved.as_str()],
            Metric::Nvt => vec![c.team.as_str()],
            Metric::Ttrc => vec![c.created.as_str(), c.resolved.as_str(), c.severity.as_str()],
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one metric run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "metric")]
pub enum MetricReport {
    #[serde(rename = "NACV")]
    ActiveCritical { count: usize },

    /// `average_days` is `None` when no row had both dates.
    #[serde(rename = "TTR")]
    TimeToRemedy {
        average_days: Option<f64>,
        samples: usize,
    },

    /// Sorted by count, largest first.
    #[serde(rename = "NVT")]
    PerTeam { counts: Vec<TeamCount> },

    /// Sorted by mean, smallest first. Empty when no row had both dates.
    #[serde(rename = "TTRC")]
    TimeToRemedyBySeverity { groups: Vec<SeverityMean> },
}

impl MetricReport {
    pub fn metric(&self) -> Metric {
        match self {
            MetricReport::ActiveCritical { .. } => Metric::Nacv,
            MetricReport::TimeToRemedy { .. } => Metric::Ttr,
            MetricReport::PerTeam { .. } => Metric::Nvt,
            MetricReport::TimeToRemedyBySeverity { .. } => Metric::Ttrc,
        }
    }
}

/// Fail with every absent column named, or succeed having checked them all.
pub fn check_columns(records: &RecordSet, required: &[&str]) -> Result<(), KpiError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !records.has_column(col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(KpiError::MissingColumns(missing))
    }
}

/// Validate the metric's columns, then compute it.
#[tracing::instrument(level = "info", skip(records, config), fields(rows = records.len()))]
pub fn compute(
    metric: Metric,
    records: &RecordSet,
    config: &KpiConfig,
) -> Result<MetricReport, KpiError> {
    let required = metric.required_columns(config);
    debug!(?required, "checking columns");
    check_columns(records, &required)?;

    let c = &config.columns;
    let report = match metric {
        Metric::Nacv => nacv::active_critical(records, &c.priority, &c.status)?,
        Metric::Ttr => ttr::time_to_remedy(records, &c.created, &c.resolved)?,
        Metric::Nvt => nvt::per_team(records, &c.team, &config.exclude_teams)?,
        Metric::Ttrc => {
            ttrc::time_to_remedy_by_severity(records, &c.created, &c.resolved, &c.severity)?
        }
    };
    info!(%metric, "computed");
    Ok(report)
}

/// Round to two decimals, ties to even (0.125 -> 0.12, 0.375 -> 0.38).
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}


#[cfg(test)]
mod tests {
    use super::test_util::records;
    use super::*;

    #[test]
    fn test_check_columns_reports_all_missing() {
        let rs = records("Priority,Created\nHigh,2024-01-01\n");
        let err = check_columns(&rs, &["Priority", "Status", "Created", "Resolved"]).unwrap_err();
        match err {
            KpiError::MissingColumns(names) => assert_eq!(names, vec!["Status", "Resolved"]),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(check_columns(&rs, &["Priority", "Created"]).is_ok());
    }

    #[test]
    fn test_missing_status_message_names_column() {
        let rs = records("Priority\nCritical\n");
        let err = compute(Metric::Nacv, &rs, &KpiConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "missing required columns: Status");
    }

    #[test]
    fn test_validation_runs_before_any_computation() {
        // Severity column missing: nothing is computed even though the dates are fine.
        let rs = records("Created,Resolved\n2024-01-01,2024-01-02\n");
        let err = compute(Metric::Ttrc, &rs, &KpiConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Custom field (Severity)"));
    }

    #[test]
    fn test_dispatch_uses_configured_columns() {
        let rs = records(
            "Issue Priority,Issue Status,Date Created,Date Resolved,Severity Level,Assigned Team\n\
             P1 Critical,Open,2024-01-01,2024-01-05,Severe,Alpha\n\
             P2,Fixed,2024-01-01,2024-01-03,Minor,Beta\n",
        );
        let mut cfg = KpiConfig::default();
        cfg.columns.priority = "Issue Priority".into();
        cfg.columns.status = "Issue Status".into();
        cfg.columns.created = "Date Created".into();
        cfg.columns.resolved = "Date Resolved".into();
        cfg.columns.severity = "Severity Level".into();
        cfg.columns.team = "Assigned Team".into();

        for metric in [Metric::Nacv, Metric::Ttr, Metric::Nvt, Metric::Ttrc] {
            let report = compute(metric, &rs, &cfg).unwrap();
            assert_eq!(report.metric(), metric);
        }
        assert_eq!(
            compute(Metric::Nacv, &rs, &cfg).unwrap(),
            MetricReport::ActiveCritical { count: 1 }
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.0), 10.0);
        assert_eq!(round2(12.0 / 3.0 + 0.333333), 4.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.625), 2.62);
        assert_eq!(round2(-0.125), -0.12);
    }
}
