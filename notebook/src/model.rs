use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of values within one standard deviation of the mean
    pub within_std: f64,
}

/// Summary statistics for one series of a notebook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub suite: String,
    pub name: String,
    pub subtest: String,
    pub stats: StandardStats,
}

#[derive(Tabled)]
pub(crate) struct SummaryRow {
    pub suite: String,
    pub name: String,
    pub subtest: String,
    pub count: usize,
    #[tabled(display = "float2")]
    pub mean: f64,
    #[tabled(display = "float2")]
    pub std: f64,
    #[tabled(display = "float2")]
    pub min: f64,
    #[tabled(display = "float2")]
    pub max: f64,
    #[tabled(display = "float2")]
    pub within_std: f64,
}

impl From<&SeriesSummary> for SummaryRow {
    fn from(summary: &SeriesSummary) -> Self {
        Self {
            suite: summary.suite.clone(),
            name: summary.name.clone(),
            subtest: summary.subtest.clone(),
            count: summary.stats.count,
            mean: summary.stats.mean,
            std: summary.stats.std,
            min: summary.stats.min,
            max: summary.stats.max,
            within_std: summary.stats.within_std,
        }
    }
}

#[derive(Tabled)]
pub(crate) struct PointRow {
    pub xaxis: u64,
    pub value: f64,
    pub file: String,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}
