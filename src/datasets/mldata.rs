//! mldata.org dataset loader.
//!
//! Resolves a dataset name to a download URL, fetches the payload through
//! the injected `DatasetSource` (optionally caching it under
//! `data_home`), and arranges the stored columns into a `MldataBunch`.
//!
//! Column rules, earlier ones winning:
//! 1. a single stored column is `data`;
//! 2. otherwise every column is kept under its own name, `target` is the
//!    `target_name` column (else the first one), and `data` is the
//!    `data_name` column (else the second one).

use ndarray::{Array2, ArrayD, Axis};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::matfile::MatrixFile;
use super::DatasetSource;
use crate::config::MldataConfig;
use crate::types::TestkitError;

/// Normalize a raw dataset name into its mldata.org file name.
pub fn mldata_filename(dataname: &str) -> String {
    dataname
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '.'))
        .collect()
}

/// Selects a column by name or by position in the payload ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl ColumnRef {
    fn resolve(&self, col_names: &[String], argument: &str) -> Result<String, TestkitError> {
        match self {
            ColumnRef::Name(name) => Ok(name.clone()),
            ColumnRef::Index(i) => col_names.get(*i).cloned().ok_or_else(|| {
                TestkitError::InvalidArgument {
                    argument: argument.to_string(),
                    allowed: format!("a column index below {}", col_names.len()),
                    got: i.to_string(),
                }
            }),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

/// Per-fetch options.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub target_name: ColumnRef,
    pub data_name: ColumnRef,
    /// Transpose `data` to samples-by-features.
    pub transpose_data: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            target_name: ColumnRef::Name("label".to_string()),
            data_name: ColumnRef::Name("data".to_string()),
            transpose_data: true,
        }
    }
}

/// A loaded dataset.
#[derive(Debug, Clone)]
pub struct MldataBunch {
    pub descr: String,
    pub col_names: Vec<String>,
    pub data: Array2<f64>,
    /// Squeezed target column, absent for single-column datasets.
    pub target: Option<ArrayD<f64>>,
    /// Remaining columns under their stored names.
    pub columns: BTreeMap<String, Array2<f64>>,
}

/// Drop every axis of length one.
fn squeeze(array: Array2<f64>) -> ArrayD<f64> {
    let mut out = array.into_dyn();
    while let Some(axis) = out.shape().iter().position(|&len| len == 1) {
        out = out.index_axis_move(Axis(axis), 0);
    }
    out
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

pub struct MldataLoader {
    source: Box<dyn DatasetSource>,
    config: MldataConfig,
}

impl MldataLoader {
    pub fn new(source: Box<dyn DatasetSource>, config: MldataConfig) -> Self {
        Self { source, config }
    }

    /// Download URL for an already normalized dataset name.
    pub fn url_for(&self, filename: &str) -> String {
        format!("{}{}", self.config.base_url, urlencoding::encode(filename))
    }

    fn cache_path(&self, filename: &str) -> Option<PathBuf> {
        self.config
            .data_home
            .as_ref()
            .map(|home| home.join("mldata").join(format!("{filename}.json")))
    }

    /// Fetch and decode the payload, going through the cache when configured.
    ///
    /// A cached file that no longer decodes is discarded and fetched again.
    /// New cache entries are written to a sibling file and renamed into
    /// place, so an interrupted write never leaves a truncated entry.
    async fn payload(&self, filename: &str) -> Result<MatrixFile, TestkitError> {
        let cache = self.cache_path(filename);
        if let Some(path) = cache.as_ref().filter(|p| p.exists()) {
            debug!(path = %path.display(), "Reading cached payload");
            match MatrixFile::from_bytes(&fs::read(path)?) {
                Ok(file) => return Ok(file),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable cache entry");
                    fs::remove_file(path)?;
                }
            }
        }

        let url = self.url_for(filename);
        let bytes = match self.source.fetch(&url).await {
            Ok(bytes) => bytes,
            Err(TestkitError::HttpStatus { code: 404, .. }) => {
                return Err(TestkitError::DatasetNotFound {
                    name: filename.to_string(),
                    code: 404,
                })
            }
            Err(e) => return Err(e),
        };
        let file = MatrixFile::from_bytes(&bytes)?;

        if let Some(path) = cache {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let partial = path.with_extension("json.part");
            fs::write(&partial, &bytes)?;
            fs::rename(&partial, &path)?;
            info!(path = %path.display(), len = bytes.len(), "Cached dataset payload");
        }
        Ok(file)
    }

    /// Load `dataname`, arranging its columns per `options`.
    pub async fn fetch(
        &self,
        dataname: &str,
        options: &FetchOptions,
    ) -> Result<MldataBunch, TestkitError> {
        let filename = mldata_filename(dataname);
        let file = self.payload(&filename).await?;
        let col_names = file.ordering.clone();

        if col_names.is_empty() {
            return Err(TestkitError::Payload(format!(
                "dataset '{filename}' has no columns"
            )));
        }

        let target_name = options.target_name.resolve(&col_names, "target_name")?;
        let data_name = options.data_name.resolve(&col_names, "data_name")?;

        let (data, target, columns) = if col_names.len() == 1 {
            (file.array(&col_names[0])?, None, BTreeMap::new())
        } else {
            let mut columns = BTreeMap::new();
            for name in &col_names {
                columns.insert(name.clone(), file.array(name)?);
            }

            let target_key = if col_names.contains(&target_name) {
                target_name
            } else {
                col_names[0].clone()
            };
            columns.remove(&target_key);
            let target = file.array(&target_key)?;

            let data_key = if col_names.contains(&data_name) {
                data_name
            } else {
                col_names[1].clone()
            };
            columns.remove(&data_key);
            let data = file.array(&data_key)?;

            (data, Some(squeeze(target)), columns)
        };

        let data = if options.transpose_data {
            data.reversed_axes()
        } else {
            data
        };

        debug!(
            dataset = %filename,
            rows = data.nrows(),
            cols = data.ncols(),
            extra_columns = columns.len(),
            "Dataset loaded"
        );

        Ok(MldataBunch {
            descr: format!("mldata.org dataset: {filename}"),
            col_names,
            data,
            target,
            columns,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
