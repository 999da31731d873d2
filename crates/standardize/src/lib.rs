//! Standardized index engine.
//!
//! Turns a dated series into standardized z-scores in three steps:
//! rolling aggregation over a timescale, per-calendar-group distribution
//! fitting (optionally pooling neighboring groups through a circular
//! window), and the probability-to-z map through the inverse standard
//! normal. [`SiEngine`] exposes the fitted state between the last two
//! steps; [`transform`] runs all three in one call.
//!
//! Gaps and unfittable groups degrade to `NaN` scores with diagnostics
//! rather than failing the run, unless strict mode is enabled.

mod config;
mod engine;
mod error;
mod result;

pub use config::{SiConfig, SiMethod};
pub use engine::{transform, SiEngine};
pub use error::StandardizeError;
pub use result::{Diagnostics, SiResult};
