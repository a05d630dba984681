//! Terminal charts for the two metrics that come with a picture: a share
//! chart for the per-team distribution and a bar chart for remediation time
//! per severity.

use std::fmt::Write;

use crate::metrics::MetricReport;

const BAR_WIDTH: usize = 40;
const BAR: char = '█';

fn bar(len: usize) -> String {
    std::iter::repeat(BAR).take(len).collect()
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(|l| l.chars().count()).max().unwrap_or(0)
}

/// One line per slice with its percentage of the total (one decimal).
pub fn share_chart(title: &str, slices: &[(&str, usize)]) -> String {
    let mut out = format!("{title}\n");
    let total: usize = slices.iter().map(|(_, n)| n).sum();
    if total == 0 {
        out.push_str("  (no data)\n");
        return out;
    }

    let width = label_width(slices.iter().map(|(l, _)| *l));
    for (label, n) in slices {
        let share = *n as f64 / total as f64;
        let len = (share * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {label:<width$}  {bar:<bar_width$}  {pct:>5.1}%",
            bar = bar(len),
            bar_width = BAR_WIDTH,
            pct = share * 100.0,
        );
    }
    out
}

/// Horizontal bars scaled to the largest value. Negative values draw no bar.
pub fn bar_chart(title: &str, x_label: &str, y_label: &str, bars: &[(&str, f64)]) -> String {
    let mut out = format!("{title}\n");
    if bars.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let width = label_width(bars.iter().map(|(l, _)| *l).chain([x_label]));
    let _ = writeln!(out, "  {x_label:<width$}  {y_label}");
    for (label, value) in bars {
        let len = if max > 0.0 && *value > 0.0 {
            (value / max * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "  {label:<width$}  {bar:<bar_width$}  {value:.2}",
            bar = bar(len),
            bar_width = BAR_WIDTH,
        );
    }
    out
}

/// The chart that goes with `report`, if its metric has one.
pub fn for_report(report: &MetricReport) -> Option<String> {
    match report {
        MetricReport::PerTeam { counts } => {
            let slices: Vec<(&str, usize)> =
                counts.iter().map(|c| (c.team.as_str(), c.count)).collect();
            Some(share_chart(
                "Distribution of Vulnerabilities by Team",
                &slices,
            ))
        }
        MetricReport::TimeToRemedyBySeverity { groups } if !groups.is_empty() => {
            let bars: Vec<(&str, f64)> = groups
                .iter()
                .map(|g| (g.severity.as_str(), g.mean_days))
                .collect();
            Some(bar_chart(
                "Average Remediation Time by Severity Level",
                "Severity Level",
                "Average TTR (days)",
                &bars,
            ))
        }
        _ => None,
    }
}
