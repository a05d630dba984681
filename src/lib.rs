pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod report;

pub use config::{ColumnMap, KpiConfig};
pub use data::RecordSet;
pub use error::KpiError;
pub use metrics::{compute, Metric, MetricReport};
