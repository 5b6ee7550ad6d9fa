//! In-memory stand-in for a GrADS session
//!
//! [`SyntheticGrads`] keeps a five-axis dimension state, understands `set`
//! and `q dims`, and serves reads from a value function over grid indices.
//! Every statement is recorded, and environment queries, reads and series
//! evaluations are counted, so tests can check exactly what an export asked
//! the session to do.

use crate::data_source::{CommandOutput, GradsSession};
use crate::dimension::{Axis, AxisState, Environment, READ_EFFICIENCY};
use crate::errors::{Result, RuGaXError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::{ArrayD, IxDyn};

type FieldFn = Box<dyn Fn([i64; 5]) -> f32>;

/// Scripted GrADS session over a regular grid
pub struct SyntheticGrads {
    sizes: [usize; 5],
    ranges: [(f64, f64); 5],
    origin: [f64; 5],
    step: [f64; 5],
    start: NaiveDateTime,
    hours_per_step: i64,
    field: FieldFn,
    fail_on: Vec<String>,
    log: Vec<String>,
    env_queries: usize,
    reads: usize,
    evaluations: usize,
}

impl SyntheticGrads {
    /// A grid with `sizes` points along x, y, z, t, e. Like a freshly opened
    /// GrADS file, x and y span their full range and z, t, e sit at 1.
    ///
    /// The default field encodes the grid position of each value as
    /// `x + 10y + 100z + 1000t + 10000e`.
    pub fn new(sizes: [usize; 5]) -> Self {
        let mut ranges = [(1.0, 1.0); 5];
        ranges[0] = (1.0, sizes[0] as f64);
        ranges[1] = (1.0, sizes[1] as f64);
        let start = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            sizes,
            ranges,
            origin: [0.0, -90.0, 1000.0, 0.0, 1.0],
            step: [2.5, 2.5, -100.0, 1.0, 1.0],
            start,
            hours_per_step: 6,
            field: Box::new(|[x, y, z, t, e]: [i64; 5]| {
                (x + 10 * y + 100 * z + 1000 * t + 10000 * e) as f32
            }),
            fail_on: Vec::new(),
            log: Vec::new(),
            env_queries: 0,
            reads: 0,
            evaluations: 0,
        }
    }

    /// Start with `axis` set to `lo..=hi` (pinned when equal).
    pub fn with_range(mut self, axis: Axis, lo: i64, hi: i64) -> Self {
        self.ranges[axis.slot()] = (lo as f64, hi as f64);
        self
    }

    pub fn with_field(mut self, field: impl Fn([i64; 5]) -> f32 + 'static) -> Self {
        self.field = Box::new(field);
        self
    }

    /// Answer `statement` with status 1 whenever it is sent.
    pub fn fail_on(mut self, statement: &str) -> Self {
        self.fail_on.push(statement.to_string());
        self
    }

    pub fn statements(&self) -> &[String] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.env_queries = 0;
        self.reads = 0;
        self.evaluations = 0;
    }

    pub fn env_queries(&self) -> usize {
        self.env_queries
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Current grid range of `axis`.
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        self.ranges[axis.slot()]
    }

    /// Display time of grid index `t`, e.g. `06Z01JAN2000`.
    pub fn time_label(&self, t: i64) -> String {
        let when = self.start + Duration::hours(self.hours_per_step * (t - 1));
        when.format("%HZ%d%b%Y").to_string().to_uppercase()
    }

    fn state(&self, axis: Axis) -> AxisState {
        let (lo, hi) = self.ranges[axis.slot()];
        AxisState {
            fixed: lo == hi,
            grid: (lo, hi),
            index: (lo.ceil() as i64, hi.floor() as i64),
        }
    }

    fn snapshot(&self) -> Environment {
        let axes = READ_EFFICIENCY.map(|axis| self.state(axis));
        Environment::new(axes, self.time_label(axes[Axis::T.slot()].index.0))
    }

    fn set(&mut self, args: &[&str]) -> CommandOutput {
        let parsed: Option<(Axis, Vec<f64>)> = match args {
            [dim, values @ ..] if !values.is_empty() && values.len() <= 2 => {
                let axis = dim.chars().next().and_then(Axis::from_letter);
                let values: Option<Vec<f64>> = values.iter().map(|v| v.parse().ok()).collect();
                axis.filter(|_| dim.len() == 1).zip(values)
            }
            _ => None,
        };
        let Some((axis, values)) = parsed else {
            return CommandOutput::failed(vec!["Syntax Error in set command".to_string()], 1);
        };

        let lo = values[0];
        let hi = values.get(1).copied().unwrap_or(lo);
        let size = self.sizes[axis.slot()] as f64;
        if lo < 1.0 || hi > size || lo > hi {
            return CommandOutput::failed(
                vec![format!("Entered grid coordinate out of range for {}", axis)],
                1,
            );
        }
        self.ranges[axis.slot()] = (lo, hi);
        let what = if lo == hi { "fixed" } else { "varying" };
        CommandOutput::ok(vec![format!("{} is {}", axis.to_string().to_uppercase(), what)])
    }

    fn query_dims(&self) -> CommandOutput {
        let env = self.snapshot();
        let lines = READ_EFFICIENCY
            .iter()
            .map(|&axis| {
                let state = env.axis(axis);
                let name = axis.to_string().to_uppercase();
                if state.fixed {
                    format!("{} is fixed  {} = {}", name, name, state.grid.0)
                } else {
                    format!(
                        "{} is varying  {} = {} to {}",
                        name, name, state.grid.0, state.grid.1
                    )
                }
            })
            .collect();
        CommandOutput::ok(lines)
    }
}

impl GradsSession for SyntheticGrads {
    type Elem = f32;

    fn run(&mut self, statement: &str) -> Result<CommandOutput> {
        self.log.push(statement.to_string());
        if self.fail_on.iter().any(|s| s == statement) {
            return Ok(CommandOutput::failed(vec!["Syntax Error".to_string()], 1));
        }
        let words: Vec<&str> = statement.split_whitespace().collect();
        Ok(match words.as_slice() {
            ["set", args @ ..] => self.set(args),
            ["q", "dims"] | ["query", "dims"] => self.query_dims(),
            _ => CommandOutput::failed(vec![format!("Unknown command: {}", statement)], 1),
        })
    }

    fn environment(&mut self) -> Result<Environment> {
        self.env_queries += 1;
        Ok(self.snapshot())
    }

    fn read_field(&mut self, _expr: &str, axes: &[Axis]) -> Result<ArrayD<f32>> {
        self.reads += 1;
        let env = self.snapshot();
        let mut varying = env.varying();
        let mut requested = axes.to_vec();
        varying.sort();
        requested.sort();
        if varying != requested {
            return Err(RuGaXError::Session(format!(
                "read over {:?} while {:?} vary",
                axes,
                env.varying()
            )));
        }

        let shape: Vec<usize> = axes.iter().map(|&axis| env.axis(axis).len()).collect();
        let base = READ_EFFICIENCY.map(|axis| env.axis(axis).index.0);
        let field = &self.field;
        Ok(ArrayD::from_shape_fn(IxDyn(&shape), |ix| {
            let mut at = base;
            for (k, &axis) in axes.iter().enumerate() {
                at[axis.slot()] += ix[k] as i64;
            }
            field(at)
        }))
    }

    fn evaluate_series(&mut self, expr: &str) -> Result<Vec<f64>> {
        self.evaluations += 1;
        let axis = match expr {
            "lon" => Axis::X,
            "lat" => Axis::Y,
            "lev" => Axis::Z,
            "ens" => Axis::E,
            other => {
                return Err(RuGaXError::Session(format!(
                    "cannot evaluate '{}' as a series",
                    other
                )))
            }
        };
        let env = self.snapshot();
        if env.varying() != [axis] {
            return Err(RuGaXError::Session(format!(
                "'{}' needs {} as the only varying axis, found {:?}",
                expr,
                axis,
                env.varying()
            )));
        }
        let i = axis.slot();
        Ok(env
            .axis(axis)
            .indices()
            .map(|n| self.origin[i] + (n - 1) as f64 * self.step[i])
            .collect())
    }
}

