use crate::analyze::{frame_from_values, standard_stats};
use crate::model::{PointRow, SeriesSummary, SummaryRow};
use anyhow::Context;
use chrono::Utc;
use perftest_results_model::StandardizedResults;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabled::settings::Style;
use tabled::Table;

/// A section that can be included in a rendered notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// Summary statistics for every series
    Summary,
    /// The points of every series, by x-axis position
    Scatterplot,
}

impl Analysis {
    fn title(&self) -> &'static str {
        match self {
            Analysis::Summary => "Summary",
            Analysis::Scatterplot => "Scatterplot",
        }
    }
}

impl FromStr for Analysis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(Analysis::Summary),
            "scatterplot" => Ok(Analysis::Scatterplot),
            _ => anyhow::bail!("Unknown notebook section: {s}"),
        }
    }
}

/// Analyses standardized results and renders them as a Markdown notebook.
#[derive(Debug, Clone)]
pub struct PerftestNotebook {
    data: StandardizedResults,
}

impl PerftestNotebook {
    pub fn new(data: StandardizedResults) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &StandardizedResults {
        &self.data
    }

    /// Compute summary statistics for every series that has data.
    pub fn summarize(&self) -> anyhow::Result<Vec<SeriesSummary>> {
        let mut summaries = Vec::new();
        for (suite, series) in self.data.series() {
            if series.data.is_empty() {
                log::warn!(
                    "Not summarizing {suite}/{}/{} as it has no data",
                    series.name,
                    series.subtest
                );
                continue;
            }

            let frame = frame_from_values(&series.values())?;
            let stats = standard_stats(frame, "value").with_context(|| {
                format!("Summary for {suite}/{}/{}", series.name, series.subtest)
            })?;

            summaries.push(SeriesSummary {
                suite: suite.to_string(),
                name: series.name.clone(),
                subtest: series.subtest.clone(),
                stats,
            });
        }

        Ok(summaries)
    }

    /// Render the notebook with the requested analysis sections, in the order given.
    pub fn render(&self, analysis: &[Analysis]) -> anyhow::Result<String> {
        let mut out = String::new();
        writeln!(out, "# Perftest notebook")?;
        writeln!(out)?;
        writeln!(
            out,
            "Generated at {} for results `{}`.",
            Utc::now().to_rfc3339(),
            self.data.fingerprint()
        )?;
        writeln!(out)?;
        writeln!(out, "## Data")?;
        writeln!(out)?;
        writeln!(out, "```json")?;
        writeln!(out, "{}", serde_json::to_string_pretty(&self.data)?)?;
        writeln!(out, "```")?;

        for section in analysis {
            writeln!(out)?;
            writeln!(out, "## {}", section.title())?;
            writeln!(out)?;
            match section {
                Analysis::Summary => self.render_summary(&mut out)?,
                Analysis::Scatterplot => self.render_scatterplot(&mut out)?,
            }
        }

        Ok(out)
    }

    /// Render the notebook and write it to `dir`, returning the path of the written file.
    pub fn write(&self, analysis: &[Analysis], dir: &Path) -> anyhow::Result<PathBuf> {
        let content = self.render(analysis)?;

        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create notebook directory {}", dir.display()))?;
        let path = dir.join(format!("notebook-{}.md", &self.data.fingerprint()[..12]));
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write notebook to {}", path.display()))?;

        log::debug!("Wrote notebook to {}", path.display());
        Ok(path)
    }

    fn render_summary(&self, out: &mut String) -> anyhow::Result<()> {
        let rows = self
            .summarize()?
            .iter()
            .map(SummaryRow::from)
            .collect::<Vec<_>>();

        let mut table = Table::new(&rows);
        table.with(Style::markdown());
        writeln!(out, "{}", table)?;
        Ok(())
    }

    fn render_scatterplot(&self, out: &mut String) -> anyhow::Result<()> {
        for (suite, series) in self.data.series() {
            writeln!(out, "### {suite} / {} / {}", series.name, series.subtest)?;
            writeln!(out)?;

            let rows = series
                .data
                .iter()
                .map(|p| PointRow {
                    xaxis: p.xaxis,
                    value: p.value,
                    file: p.file.clone(),
                })
                .collect::<Vec<_>>();

            let mut table = Table::new(&rows);
            table.with(Style::markdown());
            writeln!(out, "{}", table)?;
            writeln!(out)?;
        }
        Ok(())
    }
}
