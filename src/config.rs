//! Column mapping and team exclusions.
//!
//! Values come from three layers, highest first: command-line flags, an
//! optional YAML file, then the built-in defaults that match a stock Jira
//! security-issue export.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fs, path::Path};
use tracing::debug;

use crate::error::KpiError;

pub const DEFAULT_EXCLUDED_TEAMS: &[&str] = &["None", "Dev Ops", "Sistema de Diseño"];

/// Logical field → actual column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub priority: String,
    pub status: String,
    pub created: String,
    pub resolved: String,
    pub severity: String,
    pub team: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            priority: "Priority".into(),
            status: "Status".into(),
            created: "Created".into(),
            resolved: "Resolved".into(),
            severity: "Custom field (Severity)".into(),
            team: "Custom field (Squad Plataforma)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KpiConfig {
    pub columns: ColumnMap,
    /// Teams left out of the per-team distribution. Exact match.
    pub exclude_teams: BTreeSet<String>,
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            exclude_teams: DEFAULT_EXCLUDED_TEAMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Per-run overrides, straight from the command line.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Overrides {
    /// Name of the priority column [default: Priority]
    #[arg(long = "priority-col", value_name = "COLUMN")]
    pub priority: Option<String>,

    /// Name of the status column [default: Status]
    #[arg(long = "status-col", value_name = "COLUMN")]
    pub status: Option<String>,

    /// Name of the created date column [default: Created]
    #[arg(long = "created-col", value_name = "COLUMN")]
    pub created: Option<String>,

    /// Name of the resolved date column [default: Resolved]
    #[arg(long = "resolved-col", value_name = "COLUMN")]
    pub resolved: Option<String>,

    /// Name of the severity column [default: "Custom field (Severity)"]
    #[arg(long = "severity-col", value_name = "COLUMN")]
    pub severity: Option<String>,

    /// Name of the team column [default: "Custom field (Squad Plataforma)"]
    #[arg(long = "team-col", value_name = "COLUMN")]
    pub team: Option<String>,

    /// Teams to exclude from NVT; pass the flag alone to exclude none
    #[arg(long = "exclude-teams", value_name = "TEAM", num_args = 0..)]
    pub exclude_teams: Option<Vec<String>>,
}

impl KpiConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, KpiError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| KpiError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| KpiError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Layer command-line values on top of this config.
    pub fn apply(&mut self, overrides: Overrides) {
        let Overrides {
            priority,
            status,
            created,
            resolved,
            severity,
            team,
            exclude_teams,
        } = overrides;

        let cols = &mut self.columns;
        for (slot, value) in [
            (&mut cols.priority, priority),
            (&mut cols.status, status),
            (&mut cols.created, created),
            (&mut cols.resolved, resolved),
            (&mut cols.severity, severity),
            (&mut cols.team, team),
        ] {
            if let Some(v) = value {
                *slot = v;
            }
        }
        if let Some(teams) = exclude_teams {
            self.exclude_teams = teams.into_iter().collect();
        }
    }
}
