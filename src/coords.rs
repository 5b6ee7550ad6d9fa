//! Coordinate resolution for exported axes
//!
//! Time coordinates are read back from the environment one index at a time,
//! since GrADS only reports the time of the current index. Every other axis is
//! evaluated as a series (`lon`, `lat`, `lev`, `ens`) with all other axes
//! pinned to index 1. Both leave the session's dimensions changed; restoring
//! them is the caller's job.

use crate::data_source::GradsSession;
use crate::dimension::{Axis, Environment, FWRITE_ORDER};
use crate::errors::Result;
use crate::relay::Relay;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

/// GrADS expression that yields the world coordinates of `axis`.
pub fn coordinate_expression(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "lon",
        Axis::Y => "lat",
        Axis::Z => "lev",
        Axis::T => "time",
        Axis::E => "ens",
    }
}

/// A GrADS time as displayed, with its parsed value when recognizable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLabel {
    pub display: String,
    pub datetime: Option<NaiveDateTime>,
}

impl TimeLabel {
    pub fn parse(display: &str) -> Self {
        Self {
            display: display.to_string(),
            datetime: parse_grads_time(display),
        }
    }
}

/// Parse GrADS absolute time forms such as `00Z01JAN2000`,
/// `12:30Z01JAN2000`, `01JAN2000` or `JAN2000`.
pub fn parse_grads_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let (clock, date) = match s.split_once(|c: char| c == 'Z' || c == 'z') {
        Some((clock, date)) => (Some(clock), date),
        None => (None, s),
    };

    let date = NaiveDate::parse_from_str(date, "%d%b%Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("01{}", date), "%d%b%Y"))
        .ok()?;

    let time = match clock {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(c) if c.contains(':') => NaiveTime::parse_from_str(c, "%H:%M").ok()?,
        Some(c) => NaiveTime::from_hms_opt(c.parse().ok()?, 0, 0)?,
    };

    Some(date.and_time(time))
}

/// Coordinate values along one exported axis
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    Values(Vec<f64>),
    Times(Vec<TimeLabel>),
}

impl Coordinate {
    pub fn len(&self) -> usize {
        match self {
            Coordinate::Values(v) => v.len(),
            Coordinate::Times(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_values(&self) -> Option<&[f64]> {
        match self {
            Coordinate::Values(v) => Some(v),
            Coordinate::Times(_) => None,
        }
    }

    pub fn as_times(&self) -> Option<&[TimeLabel]> {
        match self {
            Coordinate::Times(t) => Some(t),
            Coordinate::Values(_) => None,
        }
    }

    /// The single entry at `index`, as a one-element coordinate.
    pub fn select(&self, index: usize) -> Option<Coordinate> {
        match self {
            Coordinate::Values(v) => v.get(index).map(|&x| Coordinate::Values(vec![x])),
            Coordinate::Times(t) => t.get(index).map(|x| Coordinate::Times(vec![x.clone()])),
        }
    }
}

/// Resolve coordinates for `axis` using the ranges recorded in `env`.
pub fn resolve_axis<S>(session: &mut S, env: &Environment, axis: Axis) -> Result<Coordinate>
where
    S: GradsSession + ?Sized,
{
    if axis == Axis::T {
        let mut times = Vec::with_capacity(env.axis(Axis::T).len());
        for i in env.axis(Axis::T).indices() {
            session.set_index(Axis::T, i)?;
            times.push(TimeLabel::parse(&session.environment()?.time));
        }
        debug!(count = times.len(), "resolved time axis");
        return Ok(Coordinate::Times(times));
    }

    for other in FWRITE_ORDER {
        if other == axis {
            session.set_grid_range(axis, env.axis(axis).grid)?;
        } else {
            session.set_index(other, 1)?;
        }
    }
    let values = session.evaluate_series(coordinate_expression(axis))?;
    debug!(%axis, count = values.len(), "resolved axis");
    Ok(Coordinate::Values(values))
}
