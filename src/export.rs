//! Export orchestration
//!
//! [`Exporter::export`] runs the whole pipeline against one session:
//!
//! 1. snapshot the dimension environment
//! 2. plan active and swept axes
//! 3. assemble the raw array
//! 4. permute it into the output layout
//! 5. resolve coordinates and wrap everything in a [`LabeledArray`]
//! 6. restore the session's dimensions
//!
//! Steps 3 and 5 change the session's dimensions. A [`RestoreGuard`] puts
//! them back on every exit path, including errors.

use crate::assemble::assemble;
use crate::config::ExportConfig;
use crate::coords::resolve_axis;
use crate::data_source::GradsSession;
use crate::dimension::{Environment, READ_EFFICIENCY};
use crate::errors::Result;
use crate::labeled::LabeledArray;
use crate::plan::DimensionPlan;
use crate::relay::Relay;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

/// Exports GrADS expressions from a session it holds exclusively
pub struct Exporter<S: GradsSession> {
    session: S,
    config: ExportConfig,
}

impl<S: GradsSession> Exporter<S> {
    pub fn new(session: S) -> Self {
        Self::with_config(session, ExportConfig::default())
    }

    pub fn with_config(session: S, config: ExportConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Export `expr` over every varying dimension of the session.
    ///
    /// With `chunk` set the result is chunked along its leading axis, by
    /// `chunk_len` from the configuration or the whole axis.
    pub fn export(&mut self, expr: &str, chunk: bool) -> Result<LabeledArray<S::Elem>> {
        let env = self.session.environment()?;
        let plan = DimensionPlan::from_environment(&env, &self.config.layout)?;
        info!(
            expr,
            varying = ?plan.varying,
            active = ?plan.active,
            sweep = ?plan.sweep,
            "exporting"
        );

        let mut guard = RestoreGuard::new(&mut self.session, env.clone());

        let raw = assemble(guard.session(), expr, &env, &plan)?;
        let data = plan.permutation()?.apply(raw)?;

        let mut coords = Vec::with_capacity(plan.output.len());
        for &axis in &plan.output {
            coords.push(resolve_axis(guard.session(), &env, axis)?);
        }
        let dims = plan
            .output
            .iter()
            .map(|&axis| self.config.names.label(axis).to_string())
            .collect();

        let mut labeled = LabeledArray::new(expr, data, dims, coords)?
            .with_attribute("expression", expr);
        if self.config.history {
            labeled = labeled.with_attribute(
                "history",
                JsonValue::from(format!("Exported by RuGaX on {}", Utc::now().to_rfc3339())),
            );
        }
        if chunk {
            let len = self
                .config
                .chunk_len
                .or_else(|| labeled.shape().first().copied())
                .unwrap_or(1);
            labeled = labeled.chunked(len);
        }

        guard.restore()?;
        info!(expr, shape = ?labeled.shape(), dims = ?labeled.dims(), "exported");
        Ok(labeled)
    }
}

/// Export `expr` from `session` with the default configuration.
pub fn export<S>(session: &mut S, expr: &str, chunk: bool) -> Result<LabeledArray<S::Elem>>
where
    S: GradsSession + ?Sized,
{
    Exporter::new(session).export(expr, chunk)
}

/// Puts a session's dimensions back to a snapshot when dropped
///
/// Call [`RestoreGuard::restore`] on the success path to see restore errors;
/// a guard dropped without it restores on a best-effort basis and only logs
/// failures.
pub struct RestoreGuard<'a, S: GradsSession + ?Sized> {
    session: &'a mut S,
    original: Environment,
    armed: bool,
}

impl<'a, S: GradsSession + ?Sized> RestoreGuard<'a, S> {
    pub fn new(session: &'a mut S, original: Environment) -> Self {
        Self {
            session,
            original,
            armed: true,
        }
    }

    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        restore_environment(&mut *self.session, &self.original)
    }
}

impl<S: GradsSession + ?Sized> Drop for RestoreGuard<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = restore_environment(&mut *self.session, &self.original) {
            warn!(error = %e, "could not restore GrADS dimensions");
        }
    }
}

/// Set every axis back to the grid range recorded in `original`.
pub fn restore_environment<S>(session: &mut S, original: &Environment) -> Result<()>
where
    S: GradsSession + ?Sized,
{
    for axis in READ_EFFICIENCY {
        session.set_grid_range(axis, original.axis(axis).grid)?;
    }
    Ok(())
}
