//! Fake mldata payloads and an in-memory `DatasetSource`.
//!
//! `fake_mldata` builds a payload from named arrays; `MockMldataSource`
//! serves such payloads for a fixed set of dataset names and answers 404
//! for everything else. Inject it into `MldataLoader` in tests.

use async_trait::async_trait;
use ndarray::ArrayD;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::matfile::{MatrixFile, StoredMatrix};
use super::DatasetSource;
use crate::types::TestkitError;

/// Build a fake mldata payload.
///
/// Every array is transposed before storage, whereas the loader only
/// transposes `data` back; tests comparing other columns must account for
/// that. `ordering` defaults to the column names in sorted order.
pub fn fake_mldata(
    columns: &BTreeMap<String, ArrayD<f64>>,
    dataname: &str,
    ordering: Option<&[String]>,
) -> Result<Vec<u8>, TestkitError> {
    let mut file = MatrixFile::new(&format!("mldata dataset: {dataname}"));

    for (name, array) in columns {
        let transposed = array.t();
        file.insert(name, StoredMatrix::from_dyn(name, &transposed.to_owned())?);
    }

    file.ordering = match ordering {
        Some(order) => order.to_vec(),
        None => columns.keys().cloned().collect(),
    };

    file.to_bytes()
}

/// Columns of one mock dataset, with an optional explicit ordering.
#[derive(Debug, Clone, Default)]
pub struct MockDataset {
    pub columns: BTreeMap<String, ArrayD<f64>>,
    pub ordering: Option<Vec<String>>,
}

impl MockDataset {
    pub fn new(columns: BTreeMap<String, ArrayD<f64>>) -> Self {
        Self {
            columns,
            ordering: None,
        }
    }

    pub fn with_ordering(mut self, ordering: &[&str]) -> Self {
        self.ordering = Some(ordering.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Add a column, keeping builder style.
    pub fn column(mut self, name: &str, array: ArrayD<f64>) -> Self {
        self.columns.insert(name.to_string(), array);
        self
    }
}

/// Serves fake payloads for registered dataset names.
#[derive(Debug, Clone, Default)]
pub struct MockMldataSource {
    datasets: HashMap<String, MockDataset>,
}

impl MockMldataSource {
    pub fn new(datasets: HashMap<String, MockDataset>) -> Self {
        Self { datasets }
    }

    pub fn with_dataset(mut self, name: &str, dataset: MockDataset) -> Self {
        self.datasets.insert(name.to_string(), dataset);
        self
    }

    /// Payload for `dataset_name`, or the 404 error a missing dataset gets.
    pub fn payload(&self, url: &str, dataset_name: &str) -> Result<Vec<u8>, TestkitError> {
        match self.datasets.get(dataset_name) {
            Some(dataset) => fake_mldata(
                &dataset.columns,
                &format!("_{dataset_name}"),
                dataset.ordering.as_deref(),
            ),
            None => Err(TestkitError::HttpStatus {
                url: url.to_string(),
                code: 404,
                message: format!("{dataset_name} is not available"),
            }),
        }
    }
}

#[async_trait]
impl DatasetSource for MockMldataSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TestkitError> {
        let dataset_name = url.rsplit('/').next().unwrap_or(url);
        debug!(url, dataset = dataset_name, "Mock mldata request");
        self.payload(url, dataset_name)
    }
}
