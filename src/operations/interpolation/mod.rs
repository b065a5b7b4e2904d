//! Inverse distance weighting over irregular clouds of grid nodes.

mod stencil;
mod weighting;

pub use stencil::{Donors, StencilInterpolator};
pub use weighting::WeightedSum;
