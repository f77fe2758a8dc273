//! Terrain shearing algorithms
//!
//! Plan-oblique relief: every elevation sample is displaced upward along
//! the map's y axis in proportion to its height above the grid minimum,
//! then the displaced profile is resampled back onto the uniform row
//! spacing and trimmed to the fully populated row band.

mod plan_oblique;
mod shear;
mod trim;

pub use plan_oblique::{plan_oblique, PlanOblique, PlanObliqueParams};
pub use shear::ShearGeometry;
