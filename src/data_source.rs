//! Session abstraction for a running GrADS process
//!
//! The exporter never talks to GrADS directly. It drives a [`GradsSession`],
//! which owns the process (or a stand-in for it) and answers four kinds of
//! requests. Every method takes `&mut self`: the session's dimension state is
//! global and an export mutates it in place, so a session must never be shared
//! between two exports at once.

use crate::dimension::{Axis, Environment};
use crate::errors::Result;
use ndarray::ArrayD;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fmt::Debug;

/// Reply to a single statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
    pub status: i32,
}

impl CommandOutput {
    pub fn ok(lines: Vec<String>) -> Self {
        Self { lines, status: 0 }
    }

    pub fn failed(lines: Vec<String>, status: i32) -> Self {
        Self { lines, status }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// A live GrADS session
pub trait GradsSession {
    /// Element type of arrays produced by [`GradsSession::read_field`]
    type Elem: Clone + Debug + num_traits::Zero;

    /// Execute one statement. A non-zero status is reported in the output,
    /// not as an `Err`; `Err` is reserved for a broken session.
    fn run(&mut self, statement: &str) -> Result<CommandOutput>;

    /// Query the current dimension environment.
    fn environment(&mut self) -> Result<Environment>;

    /// Read `expr` under the current dimension state. The result has one
    /// axis per entry of `axes` (one or two), in that order.
    fn read_field(&mut self, expr: &str, axes: &[Axis]) -> Result<ArrayD<Self::Elem>>;

    /// Evaluate `expr` along the single varying axis and return its values.
    fn evaluate_series(&mut self, expr: &str) -> Result<Vec<f64>>;
}

impl<S: GradsSession + ?Sized> GradsSession for &mut S {
    type Elem = S::Elem;

    fn run(&mut self, statement: &str) -> Result<CommandOutput> {
        (**self).run(statement)
    }

    fn environment(&mut self) -> Result<Environment> {
        (**self).environment()
    }

    fn read_field(&mut self, expr: &str, axes: &[Axis]) -> Result<ArrayD<Self::Elem>> {
        (**self).read_field(expr, axes)
    }

    fn evaluate_series(&mut self, expr: &str) -> Result<Vec<f64>> {
        (**self).evaluate_series(expr)
    }
}

/// Metadata for array-like data
#[derive(Debug, Clone)]
pub struct DataArrayMetadata {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
    pub dimensions: Vec<String>,
    pub attributes: HashMap<String, JsonValue>,
}
