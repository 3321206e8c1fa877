use crate::config::EtlConfig;
use crate::filter::filter_metrics;
use crate::transformer::{transform_documents, Document, SingleJsonRetriever, Transformer};
use anyhow::Context;
use perftest_results_model::{store_series, Series, StandardizedResults};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File group directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The files that make up a group
#[derive(Debug, Clone, PartialEq)]
pub enum FileGroup {
    /// An explicit list of files
    Files(Vec<PathBuf>),
    /// A directory, all files below it belong to the group
    Directory(PathBuf),
}

impl From<Vec<PathBuf>> for FileGroup {
    fn from(files: Vec<PathBuf>) -> Self {
        FileGroup::Files(files)
    }
}

impl From<PathBuf> for FileGroup {
    fn from(dir: PathBuf) -> Self {
        FileGroup::Directory(dir)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EtlOutput {
    /// The processed series of every group
    pub data: Vec<Series>,
    /// Where the series were written
    pub file_output: PathBuf,
}

impl EtlOutput {
    /// Wrap the processed series as results of the given suite
    pub fn into_results(self, suite: &str) -> StandardizedResults {
        StandardizedResults::single(suite, self.data)
    }
}

/// Extracts metrics from groups of raw timing files and loads them as standardized series.
pub struct PerftestEtl {
    file_groups: BTreeMap<String, FileGroup>,
    config: EtlConfig,
    sort_files: bool,
    transformer: Box<dyn Transformer>,
}

impl std::fmt::Debug for PerftestEtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerftestEtl")
            .field("file_groups", &self.file_groups)
            .field("config", &self.config)
            .field("sort_files", &self.sort_files)
            .finish_non_exhaustive()
    }
}

impl PerftestEtl {
    pub fn new(
        file_groups: BTreeMap<String, FileGroup>,
        config: EtlConfig,
        sort_files: bool,
    ) -> Self {
        Self {
            file_groups,
            config,
            sort_files,
            transformer: Box::new(SingleJsonRetriever),
        }
    }

    /// Replace the default [SingleJsonRetriever] transformer
    pub fn with_transformer(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn file_groups(&self) -> &BTreeMap<String, FileGroup> {
        &self.file_groups
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn sort_files(&self) -> bool {
        self.sort_files
    }

    /// Resolve a file group to the files it contains.
    ///
    /// Lists are returned as given. Directories are walked recursively and every regular file below
    /// them is returned.
    pub fn parse_file_grouping(&self, group: &FileGroup) -> Result<Vec<PathBuf>, EtlError> {
        match group {
            FileGroup::Files(files) => Ok(files.clone()),
            FileGroup::Directory(dir) => {
                if !dir.is_dir() {
                    return Err(EtlError::MissingDirectory(dir.clone()));
                }

                let mut files = Vec::new();
                for entry in WalkDir::new(dir) {
                    let entry = entry.map_err(|e| EtlError::Io {
                        path: e.path().unwrap_or(dir.as_path()).to_path_buf(),
                        source: e.into(),
                    })?;
                    if entry.file_type().is_file() {
                        files.push(entry.into_path());
                    }
                }
                Ok(files)
            }
        }
    }

    /// Process every file group, write the series to the configured output and return them.
    pub fn process(&self) -> anyhow::Result<EtlOutput> {
        let mut data = Vec::new();
        for (name, group) in &self.file_groups {
            let series = self
                .process_group(name, group)
                .with_context(|| format!("Processing file group {name}"))?;
            data.extend(series);
        }

        let data = filter_metrics(data, &self.config.metrics, &self.config.exclude);

        log::debug!(
            "Writing {} series to {}",
            data.len(),
            self.config.output.display()
        );
        store_series(&data, &self.config.output).with_context(|| {
            format!("Failed to write output to {}", self.config.output.display())
        })?;

        Ok(EtlOutput {
            data,
            file_output: self.config.output.clone(),
        })
    }

    fn process_group(&self, name: &str, group: &FileGroup) -> anyhow::Result<Vec<Series>> {
        let mut files = self.parse_file_grouping(group)?;
        if self.sort_files {
            files.sort();
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            if let Some(document) = load_document(file)? {
                documents.push(document);
            }
        }

        if documents.is_empty() {
            log::warn!("No data could be loaded for file group {name}");
            return Ok(Vec::new());
        }

        log::debug!(
            "Loaded {} of {} files for file group {name}",
            documents.len(),
            files.len()
        );

        Ok(transform_documents(self.transformer.as_ref(), name, &documents))
    }
}

/// Load a file as a JSON document.
///
/// Files without a `.json` extension that can't be parsed are skipped, a `.json` file that can't
/// be parsed is an error.
fn load_document(path: &Path) -> Result<Option<Document>, EtlError> {
    let content = std::fs::read(path).map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match serde_json::from_slice(&content) {
        Ok(data) => Ok(Some(Document { file, data })),
        Err(source) if is_json_file(path) => Err(EtlError::InvalidJson {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) => {
            log::warn!("Skipping {} as it is not a JSON file: {e}", path.display());
            Ok(None)
        }
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
