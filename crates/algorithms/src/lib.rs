//! # Planoblique Algorithms
//!
//! Terrain-shearing algorithms for the planoblique toolkit.
//!
//! The one algorithm family implemented today is plan-oblique relief:
//! a DEM sheared vertically so that every sample is displaced upward in
//! proportion to its height, producing an apparent oblique view of the
//! terrain on a planimetric map.

pub mod terrain;

mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::terrain::{plan_oblique, PlanOblique, PlanObliqueParams};
    pub use planoblique_core::prelude::*;
}
