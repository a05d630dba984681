use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::MetricReport;
use crate::{data::RecordSet, error::KpiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamCount {
    pub team: String,
    pub count: usize,
}

/// Count vulnerabilities per team, leaving out `excluded` teams and rows
/// with no team at all.
pub fn per_team(
    records: &RecordSet,
    team_col: &str,
    excluded: &BTreeSet<String>,
) -> Result<MetricReport, KpiError> {
    let mut tally: HashMap<&str, usize> = HashMap::new();
    let mut dropped = 0usize;
    for team in records.column(team_col)? {
        match team {
            Some(t) if !excluded.contains(t) => *tally.entry(t).or_default() += 1,
            _ => dropped += 1,
        }
    }
    debug!(teams = tally.len(), dropped, "per-team tally");

    let mut counts: Vec<TeamCount> = tally
        .into_iter()
        .map(|(team, count)| TeamCount {
            team: team.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.team.cmp(&b.team)));
    Ok(MetricReport::PerTeam { counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KpiConfig;
    use crate::metrics::test_util::records;

    fn counts(csv: &str, excluded: &[&str]) -> Vec<(String, usize)> {
        let excluded: BTreeSet<String> = excluded.iter().map(|s| s.to_string()).collect();
        match per_team(&records(csv), "Team", &excluded).unwrap() {
            MetricReport::PerTeam { counts } => {
                counts.into_iter().map(|c| (c.team, c.count)).collect()
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    const TEAMS: &str = "Team\nAlpha\nBeta\nAlpha\nDev Ops\nGamma\nAlpha\nBeta\nDev Ops\n";

    #[test]
    fn test_sorted_descending() {
        let got = counts(TEAMS, &[]);
        assert_eq!(
            got,
            vec![
                ("Alpha".to_string(), 3),
                ("Beta".to_string(), 2),
                ("Dev Ops".to_string(), 2),
                ("Gamma".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_exclusions_removed_and_sum_matches() {
        let got = counts(TEAMS, &["Dev Ops"]);
        assert!(got.iter().all(|(t, _)| t != "Dev Ops"));
        let total: usize = got.iter().map(|(_, c)| c).sum();
        assert_eq!(total, 8 - 2);
        assert!(got.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_exclusion_is_exact_match() {
        let got = counts("Team\ndev ops\nDev Ops\n", &["Dev Ops"]);
        assert_eq!(got, vec![("dev ops".to_string(), 1)]);
    }

    #[test]
    fn test_missing_team_not_counted() {
        let got = counts("Team,Other\nAlpha,1\n,2\n", &[]);
        assert_eq!(got, vec![("Alpha".to_string(), 1)]);
    }

    #[test]
    fn test_none_team_not_counted_without_exclusions() {
        let got = counts("Team\nNone\nAlpha\nNone\n", &[]);
        assert_eq!(got, vec![("Alpha".to_string(), 1)]);
    }

    #[test]
    fn test_default_exclusions() {
        let cfg = KpiConfig::default();
        let rs = records("Team\nNone\nSistema de Diseño\nAlpha\n");
        match per_team(&rs, "Team", &cfg.exclude_teams).unwrap() {
            MetricReport::PerTeam { counts } => {
                assert_eq!(counts.len(), 1);
                assert_eq!(counts[0].team, "Alpha");
            }
            other => panic!("unexpected report {other:?}"),
        }
    }
}
