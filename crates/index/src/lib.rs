//! Named drought and precipitation indices.
//!
//! Three families live here:
//!
//! - Standardized presets ([`spi`], [`spei`], [`sgi`], [`ssfi`]): pin the
//!   distribution choices of an index from the literature onto an
//!   [`SiConfig`](notos_standardize::SiConfig) and run the engine in one
//!   call; everything else (timescale, fit window, strictness) stays
//!   configurable.
//! - Rainfall anomaly indices ([`rai`], [`mrai`]): anomaly scaling against
//!   observed extremes, no distribution fit involved.
//! - Precipitation extreme indices ([`rx1day`], [`rx5day`], [`sdii`],
//!   [`rnmm`], [`r10mm`]): yearly summaries of daily records.

mod climdex;
mod error;
mod preset;
mod rai;

pub use climdex::{r10mm, rnmm, rx1day, rx5day, sdii, WET_DAY_THRESHOLD};
pub use error::IndexError;
pub use preset::{sgi, spei, spi, ssfi, IndexKind};
pub use rai::{mrai, rai, MRAI_SCALE};
