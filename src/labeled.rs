//! Labeled n-dimensional arrays
//!
//! A [`LabeledArray`] pairs an `ndarray::ArrayD` with one name and one
//! [`Coordinate`] per axis, plus free-form JSON attributes.

use crate::coords::Coordinate;
use crate::data_source::DataArrayMetadata;
use crate::errors::{Result, RuGaXError};
use ndarray::{ArrayD, ArrayViewD, Axis as ArrayAxis};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray<T> {
    pub name: String,
    data: ArrayD<T>,
    dims: Vec<String>,
    coords: Vec<Coordinate>,
    pub attributes: HashMap<String, JsonValue>,
    chunk_len: Option<usize>,
}

impl<T: Clone> LabeledArray<T> {
    /// Wrap `data`; `dims` and `coords` are given in axis order and must
    /// match its rank and shape.
    pub fn new(
        name: impl Into<String>,
        data: ArrayD<T>,
        dims: Vec<String>,
        coords: Vec<Coordinate>,
    ) -> Result<Self> {
        let name = name.into();
        if dims.len() != data.ndim() || coords.len() != data.ndim() {
            return Err(RuGaXError::SliceShapeMismatch {
                expected: data.shape().to_vec(),
                got: coords.iter().map(Coordinate::len).collect(),
            });
        }
        for ((dim, coord), &len) in dims.iter().zip(&coords).zip(data.shape()) {
            if coord.len() != len {
                return Err(RuGaXError::CoordinateMismatch {
                    dim: dim.clone(),
                    expected: len,
                    got: coord.len(),
                });
            }
        }
        Ok(Self {
            name,
            data,
            dims,
            coords,
            attributes: HashMap::new(),
            chunk_len: None,
        })
    }

    /// Mark the array as chunked along its leading axis.
    pub fn chunked(mut self, chunk_len: usize) -> Self {
        self.chunk_len = Some(chunk_len.max(1));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Position of the dimension named `dim`.
    pub fn axis_index(&self, dim: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| RuGaXError::DimensionNotFound {
                array: self.name.clone(),
                dim: dim.to_string(),
            })
    }

    pub fn coord(&self, dim: &str) -> Option<&Coordinate> {
        let i = self.dims.iter().position(|d| d == dim)?;
        self.coords.get(i)
    }

    /// `(dimension, coordinate)` pairs in axis order.
    pub fn coords(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.dims.iter().map(String::as_str).zip(&self.coords)
    }

    /// Select one index along `dim`, dropping that dimension.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Self> {
        let axis = self.axis_index(dim)?;
        let len = self.data.len_of(ArrayAxis(axis));
        if index >= len {
            return Err(RuGaXError::IndexOutOfBounds {
                dim: dim.to_string(),
                index,
                len,
            });
        }
        let data = self.data.index_axis(ArrayAxis(axis), index).to_owned();
        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut coords = self.coords.clone();
        coords.remove(axis);

        let mut out = Self::new(self.name.clone(), data, dims, coords)?;
        out.attributes = self.attributes.clone();
        out.chunk_len = self.chunk_len;
        Ok(out)
    }

    pub fn is_chunked(&self) -> bool {
        self.chunk_len.is_some()
    }

    pub fn chunk_len(&self) -> Option<usize> {
        self.chunk_len
    }

    /// Views over the data, `chunk_len` entries of the leading axis at a
    /// time. Unchunked and scalar arrays yield a single view.
    pub fn chunks(&self) -> Box<dyn Iterator<Item = ArrayViewD<'_, T>> + '_> {
        match self.chunk_len {
            Some(len) if self.data.ndim() > 0 => {
                Box::new(self.data.axis_chunks_iter(ArrayAxis(0), len))
            }
            _ => Box::new(std::iter::once(self.data.view())),
        }
    }

    pub fn metadata(&self) -> DataArrayMetadata {
        DataArrayMetadata {
            name: self.name.clone(),
            shape: self.shape().to_vec(),
            dtype: std::any::type_name::<T>().to_string(),
            dimensions: self.dims.clone(),
            attributes: self.attributes.clone(),
        }
    }
}
