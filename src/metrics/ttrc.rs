use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{round2, ttr, MetricReport};
use crate::{data::RecordSet, error::KpiError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityMean {
    pub severity: String,
    /// Rounded to 2 decimals.
    pub mean_days: f64,
    pub samples: usize,
}

/// Mean remediation days per severity, ascending. Severities with no row
/// carrying both dates do not appear.
pub fn time_to_remedy_by_severity(
    records: &RecordSet,
    created_col: &str,
    resolved_col: &str,
    severity_col: &str,
) -> Result<MetricReport, KpiError> {
    let days = ttr::remediation_days(records, created_col, resolved_col)?;

    let mut groups: HashMap<&str, Vec<i64>> = HashMap::new();
    for (severity, d) in records.column(severity_col)?.zip(days) {
        if let (Some(sev), Some(d)) = (severity, d) {
            groups.entry(sev).or_default().push(d);
        }
    }
    if groups.is_empty() {
        info!("no rows with valid remediation times");
        return Ok(MetricReport::TimeToRemedyBySeverity { groups: Vec::new() });
    }

    // Sort on the exact mean, round afterwards.
    let mut means: Vec<(&str, f64, usize)> = groups
        .into_iter()
        .filter_map(|(sev, ds)| ttr::mean(&ds).map(|m| (sev, m, ds.len())))
        .collect();
    means.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    debug!(groups = means.len(), "time to remedy by severity");

    let groups = means
        .into_iter()
        .map(|(severity, mean, samples)| SeverityMean {
            severity: severity.to_string(),
            mean_days: round2(mean),
            samples,
        })
        .collect();
    Ok(MetricReport::TimeToRemedyBySeverity { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_util::records;

    fn by_severity(csv: &str) -> Vec<SeverityMean> {
        match time_to_remedy_by_severity(&records(csv), "Created", "Resolved", "Severity")
            .unwrap()
        {
            MetricReport::TimeToRemedyBySeverity { groups } => groups,
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_grouped_means_ascending() {
        let csv = "Created,Resolved,Severity\n\
                   2024-01-01,2024-01-21,Minor\n\
                   2024-01-01,2024-01-03,Severe\n\
                   2024-01-01,2024-01-05,Severe\n\
                   2024-01-01,2024-01-11,Moderate\n\
                   2024-01-01,2024-01-12,Moderate\n";
        let got = by_severity(csv);
        let names: Vec<_> = got.iter().map(|g| g.severity.as_str()).collect();
        assert_eq!(names, vec!["Severe", "Moderate", "Minor"]);
        assert_eq!(got[0].mean_days, 3.0);
        assert_eq!(got[1].mean_days, 10.5);
        assert_eq!(got[1].samples, 2);
        assert_eq!(got[2].mean_days, 20.0);
    }

    #[test]
    fn test_group_without_valid_rows_is_absent() {
        let csv = "Created,Resolved,Severity\n\
                   2024-01-01,2024-01-03,Severe\n\
                   2024-01-01,,Minor\n\
                   bogus,2024-01-03,Minor\n";
        let got = by_severity(csv);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].severity, "Severe");
    }

    #[test]
    fn test_means_rounded() {
        let csv = "Created,Resolved,Severity\n\
                   2024-01-01,2024-01-02,Low\n\
                   2024-01-01,2024-01-02,Low\n\
                   2024-01-01,2024-01-03,Low\n";
        assert_eq!(by_severity(csv)[0].mean_days, 1.33);
    }

    #[test]
    fn test_none_severity_is_dropped() {
        let csv = "Created,Resolved,Severity\n\
                   2024-01-01,2024-01-03,None\n\
                   2024-01-01,2024-01-05,High\n";
        let got = by_severity(csv);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].severity, "High");
    }

    #[test]
    fn test_no_valid_dates_is_empty() {
        let csv = "Created,Resolved,Severity\n2024-01-01,,Severe\n";
        assert!(by_severity(csv).is_empty());
    }
}
