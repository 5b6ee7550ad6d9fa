//! RuGaX: GrADS fields as labeled n-dimensional arrays
//!
//! GrADS can only write out one or two varying dimensions at a time. RuGaX
//! drives a GrADS session to export a field of any rank: it reads the two
//! cheapest varying axes directly, sweeps every other varying axis one grid
//! index at a time, stacks the slices, lays the axes out in a predictable
//! order and attaches longitude/latitude/level/time/ensemble coordinates.
//!
//! ## Module Organization
//!
//! - [`dimension`]: the five GrADS axes and the session's dimension environment
//! - [`data_source`]: the [`GradsSession`] trait a GrADS connection implements
//! - [`relay`]: checked, sequential statement execution
//! - [`plan`]: choosing active and swept axes and the output layout
//! - [`assemble`]: stacking 2-D reads into the full array
//! - [`reorder`]: axis permutation
//! - [`coords`]: coordinate resolution and GrADS time parsing
//! - [`labeled`]: the [`LabeledArray`] result type
//! - [`export`]: the [`Exporter`] pipeline
//! - [`config`]: export configuration
//! - `testing`: an in-memory session for tests (behind the `testing` feature)
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust
//! use ru_ga_x::prelude::*;
//! use ru_ga_x::testing::SyntheticGrads;
//!
//! // 4 x 3 grid with 2 levels and 5 times
//! let mut grads = SyntheticGrads::new([4, 3, 2, 5, 1]);
//! grads.relay("set z 1 2\nset t 1 5").unwrap();
//!
//! let tmp = ru_ga_x::export(&mut grads, "tmp", false).unwrap();
//! assert_eq!(tmp.dims(), &["lat", "lon", "lev", "time"]);
//! assert_eq!(tmp.shape(), &[3, 4, 2, 5]);
//! ```

pub mod assemble;
pub mod config;
pub mod coords;
pub mod data_source;
pub mod dimension;
pub mod errors;
pub mod export;
pub mod labeled;
pub mod plan;
pub mod relay;
pub mod reorder;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{AxisLayout, AxisNames, ExportConfig};
pub use coords::{Coordinate, TimeLabel};
pub use data_source::{CommandOutput, DataArrayMetadata, GradsSession};
pub use dimension::{Axis, AxisState, Environment};
pub use errors::{Result, RuGaXError};
pub use export::{export, Exporter};
pub use labeled::LabeledArray;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::{AxisLayout, AxisNames, ExportConfig};
    pub use crate::coords::Coordinate;
    pub use crate::data_source::{CommandOutput, GradsSession};
    pub use crate::dimension::{Axis, AxisState, Environment};
    pub use crate::errors::{Result, RuGaXError};
    pub use crate::export::Exporter;
    pub use crate::labeled::LabeledArray;
    pub use crate::relay::Relay;
}
