use prettytable::{format, Cell, Row, Table};

use crate::metrics::{MetricReport, SeverityMean, TeamCount};

pub const NO_DATA: &str = "No vulnerabilities with valid remediation times.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable messages and tables
    #[default]
    Text,
    /// The report as a JSON object
    Json,
}

fn team_table(counts: &[TeamCount]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("Team").style_spec("b"),
        Cell::new("Count").style_spec("b"),
    ]));
    for c in counts {
        table.add_row(Row::new(vec![
            Cell::new(&c.team),
            Cell::new(&c.count.to_string()).style_spec("r"),
        ]));
    }
    table
}

fn severity_table(groups: &[SeverityMean]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("Severity").style_spec("b"),
        Cell::new("Avg days").style_spec("b"),
        Cell::new("Samples").style_spec("b"),
    ]));
    for g in groups {
        table.add_row(Row::new(vec![
            Cell::new(&g.severity),
            Cell::new(&format!("{:.2}", g.mean_days)).style_spec("r"),
            Cell::new(&g.samples.to_string()).style_spec("r"),
        ]));
    }
    table
}

/// Plain-text rendering, one message (and table where the metric is grouped).
pub fn render_text(report: &MetricReport) -> String {
    match report {
        MetricReport::ActiveCritical { count } => {
            format!("Number of active critical vulnerabilities (NACV): {count}")
        }
        MetricReport::TimeToRemedy {
            average_days: Some(avg),
            ..
        } => format!("Average remediation time (TTR): {avg:.2} days"),
        MetricReport::TimeToRemedy {
            average_days: None, ..
        } => NO_DATA.to_string(),
        MetricReport::PerTeam { counts } if counts.is_empty() => {
            "Number of vulnerabilities per team: none".to_string()
        }
        MetricReport::PerTeam { counts } => {
            format!("Number of vulnerabilities per team:\n{}", team_table(counts))
        }
        MetricReport::TimeToRemedyBySeverity { groups } if groups.is_empty() => {
            NO_DATA.to_string()
        }
        MetricReport::TimeToRemedyBySeverity { groups } => format!(
            "Average remediation time by severity:\n{}",
            severity_table(groups)
        ),
    }
}

pub fn render_json(report: &MetricReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
