//! Checked statement relay
//!
//! [`Relay`] is implemented for every [`GradsSession`]. It sends statements
//! one at a time and turns the first non-zero status into
//! [`RuGaXError::CommandFailed`], so nothing after a failing statement runs.

use crate::data_source::{CommandOutput, GradsSession};
use crate::dimension::Axis;
use crate::errors::{Result, RuGaXError};
use tracing::{debug, error};

pub trait Relay: GradsSession {
    /// Run a block of newline-separated statements in order.
    ///
    /// Blank lines, including whitespace-only ones, are skipped without
    /// being sent. On success the replies are returned in statement order.
    fn relay(&mut self, text: &str) -> Result<Vec<CommandOutput>> {
        let mut replies = Vec::new();
        for statement in text.lines() {
            if statement.trim().is_empty() {
                continue;
            }
            replies.push(self.relay_one(statement)?);
        }
        Ok(replies)
    }

    /// Run a single statement, failing on a non-zero status.
    fn relay_one(&mut self, statement: &str) -> Result<CommandOutput> {
        debug!(statement, "relaying");
        let reply = self.run(statement)?;
        if reply.is_ok() {
            return Ok(reply);
        }
        error!(
            status = reply.status,
            output = %reply.lines.join("\n"),
            "GrADS rejected '{}'",
            statement
        );
        Err(RuGaXError::CommandFailed {
            command: statement.to_string(),
            status: reply.status,
            output: reply.lines,
        })
    }

    /// Pin `axis` to grid index `i`.
    fn set_index(&mut self, axis: Axis, i: i64) -> Result<()> {
        self.relay_one(&format!("set {} {}", axis, i))?;
        Ok(())
    }

    /// Set `axis` to a grid-coordinate range; equal ends pin the axis.
    fn set_grid_range(&mut self, axis: Axis, (lo, hi): (f64, f64)) -> Result<()> {
        let statement = if lo == hi {
            format!("set {} {}", axis, lo)
        } else {
            format!("set {} {} {}", axis, lo, hi)
        };
        self.relay_one(&statement)?;
        Ok(())
    }
}

impl<S: GradsSession + ?Sized> Relay for S {}
