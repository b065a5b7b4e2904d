//! Operations on a [`Space`](crate::grid::Space), called by the outer time
//! integration loop.

mod classify;
pub mod interpolation;
mod treatment;

pub use classify::{ComputeGeometryDomain, DomainReport};
pub use treatment::{
    method_of_image, reconstruct_flow, FlowReconstruction, ImmersedBoundaryTreatment,
    TreatmentReport,
};
