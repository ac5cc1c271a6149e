//! In-memory labeled datasets built from named coordinate and data variables.
//!
//! A [`Dataset`] is a small columnar container: 1-D coordinates label the
//! points along each dimension, data variables hold values aligned to those
//! dimensions, and a flat string attribute map carries free-form annotations.
//! Datasets are written whole to a binary file and read back whole.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

/// Values held by a coordinate or data variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayData {
    I64(Vec<i64>),
    F64(Vec<f64>),
}

impl ArrayData {
    /// Number of values in the array.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::I64(values) => values.len(),
            ArrayData::F64(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<i64>> for ArrayData {
    fn from(values: Vec<i64>) -> Self {
        ArrayData::I64(values)
    }
}

impl From<Vec<f64>> for ArrayData {
    fn from(values: Vec<f64>) -> Self {
        ArrayData::F64(values)
    }
}

impl<const N: usize> From<[i64; N]> for ArrayData {
    fn from(values: [i64; N]) -> Self {
        ArrayData::I64(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ArrayData {
    fn from(values: [f64; N]) -> Self {
        ArrayData::F64(values.to_vec())
    }
}

impl From<&[i64]> for ArrayData {
    fn from(values: &[i64]) -> Self {
        ArrayData::I64(values.to_vec())
    }
}

impl From<&[f64]> for ArrayData {
    fn from(values: &[f64]) -> Self {
        ArrayData::F64(values.to_vec())
    }
}

/// A named array with named dimensions and free-form attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub dims: Vec<String>,
    pub data: ArrayData,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

/// A 1-D dimensional coordinate. Its name doubles as the dimension name.
#[derive(Debug, Clone, PartialEq)]
pub struct Coord {
    name: String,
    variable: Variable,
}

impl Coord {
    pub fn new(name: impl Into<String>, data: impl Into<ArrayData>) -> Self {
        let name = name.into();
        let variable = Variable {
            dims: vec![name.clone()],
            data: data.into(),
            attrs: BTreeMap::new(),
        };
        Self { name, variable }
    }

    /// Records a descriptive name in the variable's attributes.
    #[must_use]
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.variable.attrs.insert("long_name".into(), long_name.into());
        self
    }

    /// Records units in the variable's attributes.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.variable.attrs.insert("units".into(), units.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }
}

/// A data variable aligned to one or more named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DataVar {
    name: String,
    variable: Variable,
}

impl DataVar {
    /// Creates a data variable along a single dimension, the common case.
    pub fn new(name: impl Into<String>, dim: impl Into<String>, data: impl Into<ArrayData>) -> Self {
        Self::with_dims(name, vec![dim.into()], data)
    }

    /// Creates a data variable along multiple dimensions. The data is stored
    /// flat in row-major order.
    pub fn with_dims(
        name: impl Into<String>,
        dims: Vec<String>,
        data: impl Into<ArrayData>,
    ) -> Self {
        Self {
            name: name.into(),
            variable: Variable {
                dims,
                data: data.into(),
                attrs: BTreeMap::new(),
            },
        }
    }

    /// Records a descriptive name in the variable's attributes.
    #[must_use]
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.variable.attrs.insert("long_name".into(), long_name.into());
        self
    }

    /// Records units in the variable's attributes.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.variable.attrs.insert("units".into(), units.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }
}

/// A labeled multi-dimensional array collection.
///
/// Variables keep their insertion order so a written file reads back
/// structurally identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    coords: Vec<(String, Variable)>,
    data_vars: Vec<(String, Variable)>,
    attrs: BTreeMap<String, String>,
}

impl Dataset {
    /// Builds a dataset from the given coordinate and data variables.
    ///
    /// Every dimension named by a data variable must match a coordinate, and
    /// the data variable's length must equal the product of its dimension
    /// lengths.
    pub fn from_variables(
        coords: impl IntoIterator<Item = Coord>,
        data_vars: impl IntoIterator<Item = DataVar>,
    ) -> Result<Self> {
        let coords: Vec<(String, Variable)> = coords
            .into_iter()
            .map(|coord| (coord.name, coord.variable))
            .collect();
        let mut checked_data_vars = Vec::new();
        for data_var in data_vars {
            let mut expected = 1;
            for dim in &data_var.variable.dims {
                let Some((_, coord)) = coords.iter().find(|(name, _)| name == dim) else {
                    return Err(LogError::UnknownDimension {
                        name: data_var.name,
                        dim: dim.clone(),
                    });
                };
                expected *= coord.data.len();
            }
            let actual = data_var.variable.data.len();
            if actual != expected {
                return Err(LogError::DimensionMismatch {
                    name: data_var.name,
                    expected,
                    actual,
                });
            }
            checked_data_vars.push((data_var.name, data_var.variable));
        }
        Ok(Self {
            coords,
            data_vars: checked_data_vars,
            attrs: BTreeMap::new(),
        })
    }

    /// Dimension names mapped to their lengths.
    pub fn dims(&self) -> BTreeMap<&str, usize> {
        self.coords
            .iter()
            .map(|(name, variable)| (name.as_str(), variable.data.len()))
            .collect()
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords
            .iter()
            .find(|(coord_name, _)| coord_name == name)
            .map(|(_, variable)| variable)
    }

    pub fn data_var(&self, name: &str) -> Option<&Variable> {
        self.data_vars
            .iter()
            .find(|(var_name, _)| var_name == name)
            .map(|(_, variable)| variable)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.attrs
    }

    /// Writes the whole dataset, attributes included, to a binary file.
    ///
    /// Fails if a file already exists at the path; datasets are never
    /// silently overwritten.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let encoded = bincode::serialize(self)?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Reads a dataset back from a binary file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}
