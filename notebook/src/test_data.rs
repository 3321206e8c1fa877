//! Fixtures for exercising the ETL and the notebook.
//!
//! Timing data is staged as files in a temporary directory that lives as long as the
//! [FixtureFiles] that created it.

use crate::{EtlConfig, FileGroup, PerftestEtl, PerftestNotebook};
use anyhow::Context;
use perftest_results_model::{DataPoint, Series, StandardizedResults};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The name of the file group the fixture ETLs load
pub const FIXTURE_GROUP: &str = "group_1";

/// The `timings` object of a browser script result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Timings {
    /// `firstPaint`, in milliseconds
    #[serde(rename = "firstPaint")]
    pub first_paint: u64,
}

/// One entry of `browserScripts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSample {
    pub timings: Timings,
}

/// A raw timing document, `{"browserScripts": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    #[serde(rename = "browserScripts")]
    pub browser_scripts: Vec<TimingSample>,
}

impl Dataset {
    fn from_first_paints(first_paints: &[u64]) -> Self {
        Self {
            browser_scripts: first_paints
                .iter()
                .map(|&first_paint| TimingSample {
                    timings: Timings { first_paint },
                })
                .collect(),
        }
    }
}

/// The three documents staged by [FixtureFiles]
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureData {
    pub data_1: Dataset,
    pub data_2: Dataset,
    pub data_3: Dataset,
}

/// First paints 101..103, 201..203 and 301..303
pub fn data() -> FixtureData {
    FixtureData {
        data_1: Dataset::from_first_paints(&[101, 102, 103]),
        data_2: Dataset::from_first_paints(&[201, 202, 203]),
        data_3: Dataset::from_first_paints(&[301, 302, 303]),
    }
}

/// A `browsertime` suite with a single two point series
pub fn standardized_data() -> StandardizedResults {
    StandardizedResults::single(
        "browsertime",
        vec![Series {
            data: vec![
                DataPoint::new(1.0, 1, "file_1"),
                DataPoint::new(2.0, 2, "file_2"),
            ],
            name: "name".to_string(),
            subtest: "subtest".to_string(),
        }],
    )
}

/// Fixture data written to a temporary directory.
///
/// The layout is
///
/// ```text
/// <tmp>/resources/file_1.json   JSON of data_1
/// <tmp>/resources/file_2.json   JSON of data_2
/// <tmp>/resources/file_3.txt    Debug rendering of data_3, not valid JSON
/// <tmp>/output/
/// ```
///
/// The directory is removed when this is dropped.
#[derive(Debug)]
pub struct FixtureFiles {
    resources: BTreeMap<String, String>,
    resources_dir: PathBuf,
    output_dir: PathBuf,
    output: PathBuf,
    dir: TempDir,
}

impl FixtureFiles {
    pub fn create(data: &FixtureData) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;

        let resources_dir = create_dir(&dir.path().join("resources"))?;
        let output_dir = create_dir(&dir.path().join("output"))?;

        let mut resources = BTreeMap::new();
        resources.insert(
            "file_1".to_string(),
            create_temp_file(
                &resources_dir.join("file_1.json"),
                &serde_json::to_string(&data.data_1)?,
            )?,
        );
        resources.insert(
            "file_2".to_string(),
            create_temp_file(
                &resources_dir.join("file_2.json"),
                &serde_json::to_string(&data.data_2)?,
            )?,
        );
        resources.insert(
            "file_3".to_string(),
            create_temp_file(
                &resources_dir.join("file_3.txt"),
                &format!("{:?}", data.data_3),
            )?,
        );

        let output = output_dir.join("output.json");

        Ok(Self {
            resources,
            resources_dir,
            output_dir,
            output,
            dir,
        })
    }

    /// Absolute paths of the staged files, keyed `file_1`, `file_2` and `file_3`
    pub fn resources(&self) -> &BTreeMap<String, String> {
        &self.resources
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Absolute path the fixture ETLs write their output to. Not created by the fixture.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The root of the temporary directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn create_dir(path: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))?;
    Ok(path.canonicalize()?)
}

fn create_temp_file(path: &Path, content: &str) -> anyhow::Result<String> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write fixture file {}", path.display()))?;
    Ok(path.canonicalize()?.to_string_lossy().into_owned())
}

/// ETLs over the same fixture files, grouped as a list and as a directory.
#[derive(Debug)]
pub struct FixtureEtls {
    pub ptetl_list: PerftestEtl,
    pub ptetl_str: PerftestEtl,
}

pub fn etls(files: &FixtureFiles) -> FixtureEtls {
    let config = EtlConfig::new(files.output());

    let file_group_list: BTreeMap<String, FileGroup> = BTreeMap::from([(
        FIXTURE_GROUP.to_string(),
        files
            .resources()
            .values()
            .map(PathBuf::from)
            .collect::<Vec<_>>()
            .into(),
    )]);
    let file_group_str: BTreeMap<String, FileGroup> = BTreeMap::from([(
        FIXTURE_GROUP.to_string(),
        files.resources_dir().to_path_buf().into(),
    )]);

    FixtureEtls {
        ptetl_list: PerftestEtl::new(file_group_list, config.clone(), true),
        ptetl_str: PerftestEtl::new(file_group_str, config, true),
    }
}

pub fn notebook(data: StandardizedResults) -> PerftestNotebook {
    PerftestNotebook::new(data)
}
