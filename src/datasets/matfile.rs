//! Serialized-matrix payload codec.
//!
//! A payload is a JSON document holding named 2-D `f64` matrices in
//! column-major order plus the ordered list of column names:
//!
//! ```json
//! {
//!   "header": "mldata dataset: iris",
//!   "arrays": { "data": { "rows": 4, "cols": 150, "data": [ ... ] } },
//!   "mldata_descr_ordering": ["label", "data"]
//! }
//! ```
//!
//! 1-D arrays are stored as single columns of shape `(n, 1)`.

use ndarray::{Array2, ArrayD, ArrayView2, Ix2, ShapeBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::TestkitError;

/// One named matrix, column-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMatrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl StoredMatrix {
    pub fn from_array(array: ArrayView2<'_, f64>) -> Self {
        let (rows, cols) = array.dim();
        // Row-major walk of the transpose is a column-major walk of `array`.
        let data = array.t().iter().copied().collect();
        Self { rows, cols, data }
    }

    /// Store a 1-D or 2-D array; 1-D arrays become a single column.
    pub fn from_dyn(name: &str, array: &ArrayD<f64>) -> Result<Self, TestkitError> {
        match array.ndim() {
            1 => Ok(Self {
                rows: array.len(),
                cols: 1,
                data: array.iter().copied().collect(),
            }),
            2 => {
                let view = array
                    .view()
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| TestkitError::Payload(format!("{name}: {e}")))?;
                Ok(Self::from_array(view))
            }
            n => Err(TestkitError::Payload(format!(
                "{name}: only 1-D and 2-D arrays can be stored, got {n}-D"
            ))),
        }
    }

    pub fn to_array(&self) -> Result<Array2<f64>, TestkitError> {
        if self.data.len() != self.rows * self.cols {
            return Err(TestkitError::Payload(format!(
                "matrix declares {}x{} but holds {} values",
                self.rows,
                self.cols,
                self.data.len()
            )));
        }
        Array2::from_shape_vec((self.rows, self.cols).f(), self.data.clone())
            .map_err(|e| TestkitError::Payload(e.to_string()))
    }
}

/// A complete payload: named matrices plus their column ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixFile {
    pub header: String,
    pub arrays: BTreeMap<String, StoredMatrix>,
    #[serde(rename = "mldata_descr_ordering")]
    pub ordering: Vec<String>,
}

impl MatrixFile {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            arrays: BTreeMap::new(),
            ordering: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: &str, matrix: StoredMatrix) {
        self.arrays.insert(name.to_string(), matrix);
    }

    /// Decode the named matrix.
    pub fn array(&self, name: &str) -> Result<Array2<f64>, TestkitError> {
        self.arrays
            .get(name)
            .ok_or_else(|| TestkitError::Payload(format!("column '{name}' missing from payload")))?
            .to_array()
            .map_err(|e| TestkitError::Payload(format!("column '{name}': {e}")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TestkitError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse a payload and check that every ordered column is present.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TestkitError> {
        let file: MatrixFile = serde_json::from_slice(bytes)?;
        if let Some(missing) = file.ordering.iter().find(|n| !file.arrays.contains_key(*n)) {
            return Err(TestkitError::Payload(format!(
                "ordering names '{missing}' but no such column is stored"
            )));
        }
        Ok(file)
    }
}
