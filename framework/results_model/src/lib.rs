use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

/// A single measurement in a [Series]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    /// The measured value
    pub value: f64,
    /// Position of the measurement on the x-axis
    ///
    /// The ETL uses the 1-based index of the file the value was read from, so all values read
    /// from the same file share an x-axis position.
    pub xaxis: u64,
    /// Name of the file the value was read from
    pub file: String,
}

impl DataPoint {
    pub fn new(value: f64, xaxis: u64, file: impl Into<String>) -> Self {
        Self {
            value,
            xaxis,
            file: file.into(),
        }
    }
}

/// A named metric series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    /// The data points, in the order they were loaded
    pub data: Vec<DataPoint>,
    /// The name of the file group the series was loaded from
    pub name: String,
    /// The metric path within the source documents, for example `browserScripts.timings.firstPaint`
    pub subtest: String,
}

impl Series {
    pub fn new(name: impl Into<String>, subtest: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            name: name.into(),
            subtest: subtest.into(),
        }
    }

    /// Add a data point to the end of the series
    pub fn push(&mut self, point: DataPoint) {
        self.data.push(point);
    }

    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(|p| p.value).collect()
    }
}

/// Standardized results, keyed by the suite that produced them
///
/// Serializes as a JSON object, for example `{"browsertime": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct StandardizedResults(BTreeMap<String, Vec<Series>>);

impl StandardizedResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create results holding a single suite
    pub fn single(suite: impl Into<String>, series: Vec<Series>) -> Self {
        let mut results = Self::new();
        results.insert(suite, series);
        results
    }

    /// Add series to a suite, appending if the suite already exists
    pub fn insert(&mut self, suite: impl Into<String>, series: Vec<Series>) {
        self.0.entry(suite.into()).or_default().extend(series);
    }

    pub fn suites(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn suite(&self, suite: &str) -> Option<&[Series]> {
        self.0.get(suite).map(|s| s.as_slice())
    }

    /// All series across all suites, in suite name order
    pub fn series(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.0
            .iter()
            .flat_map(|(suite, series)| series.iter().map(move |s| (suite.as_str(), s)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|s| s.is_empty())
    }

    /// Compute a fingerprint for these results
    ///
    /// The fingerprint identifies the shape of the results rather than the measured values. It
    /// uses the
    ///     - Suite names
    ///     - Series names and subtests
    ///     - Number of points in each series
    ///
    /// The fingerprint is computed using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        for (suite, series) in &self.0 {
            Digest::update(&mut hasher, suite.as_bytes());
            series
                .iter()
                .sorted_by(|a, b| (&a.name, &a.subtest).cmp(&(&b.name, &b.subtest)))
                .for_each(|s| {
                    Digest::update(&mut hasher, s.name.as_bytes());
                    Digest::update(&mut hasher, s.subtest.as_bytes());
                    Digest::update(&mut hasher, (s.data.len() as u64).to_le_bytes());
                });
        }

        format!("{:x}", hasher.finalize())
    }
}

/// Serialize standardized results to a writer
pub fn store_results<W: Write>(results: &StandardizedResults, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, results)?;
    Ok(())
}

/// Load standardized results from a reader
pub fn load_results<R: Read>(reader: R) -> anyhow::Result<StandardizedResults> {
    let reader = std::io::BufReader::new(reader);
    let results: StandardizedResults = serde_json::from_reader(reader)?;
    Ok(results)
}

/// Write a list of series to a file as pretty printed JSON
///
/// This is the format the ETL writes its output in. Missing parent directories are created.
pub fn store_series(series: &[Series], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, series)?;
    Ok(())
}

/// Load a list of series from a file written by [store_series]
pub fn load_series(path: &Path) -> anyhow::Result<Vec<Series>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let series = serde_json::from_reader(reader)?;
    Ok(series)
}
