//! Ghost node reconstruction, run once per time integration stage.

mod reconstruct;

pub use reconstruct::{method_of_image, reconstruct_flow, FlowReconstruction};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ReconstructionError, Result};
use crate::flow::{Conservative, FlowModel, Primitive};
use crate::geometry::{Shape, ShapeId};
use crate::grid::{Node, Partition, Region, Space, TimeLevel};

use super::interpolation::{Donors, StencilInterpolator};

/// Counts of ghost nodes reconstructed by one treatment call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreatmentReport {
    /// Reconstructed ghost nodes per layer, outermost first.
    pub per_layer: Vec<usize>,
    /// Nodes reconstructed by the method of image.
    pub image_nodes: usize,
    /// Nodes extrapolated from the layer above.
    pub extrapolated_nodes: usize,
}

impl TreatmentReport {
    /// Total number of reconstructed ghost nodes.
    #[must_use]
    pub fn total(&self) -> usize {
        self.image_nodes + self.extrapolated_nodes
    }
}

/// Refreshes the state of every ghost node at one time level.
///
/// For each shape, ghost layers are processed from the surface inward.
/// Layers up to [`FlowModel::near_surface_layers`] use the method of image:
/// the ghost point is projected onto the surface, the flow is interpolated
/// at the mirrored image point and the wall conditions are imposed at the
/// boundary point. Deeper layers are extrapolated from the ghost nodes of
/// the layer above. The density always follows from the equation of state.
///
/// Requires a prior [`ComputeGeometryDomain`](super::ComputeGeometryDomain).
pub struct ImmersedBoundaryTreatment {
    level: TimeLevel,
    model: FlowModel,
}

impl ImmersedBoundaryTreatment {
    /// Creates a new `ImmersedBoundaryTreatment` operation.
    #[must_use]
    pub fn new(level: TimeLevel, model: FlowModel) -> Self {
        Self { level, model }
    }

    /// Executes the treatment, writing ghost states at the time level.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is invalid, a ghost point cannot be
    /// projected onto its shape, or an interpolation finds no donor.
    pub fn execute(&self, space: &mut Space) -> Result<TreatmentReport> {
        self.model.validate()?;
        let (partition, geometry, nodes) = space.split_mut();
        let layers = partition.ghost_layers();
        let mut report = TreatmentReport {
            per_layer: vec![0; layers],
            ..TreatmentReport::default()
        };

        for (id, shape) in geometry.iter() {
            let candidates = partition.indices_in(&partition.interior_box(shape.bounding_box()));
            for layer in 1..=layers {
                let updates = self.treat_layer(partition, nodes, id, shape, layer, &candidates)?;
                for &(idx, state) in &updates {
                    nodes[idx].states[self.level.index()] = state;
                }

                debug!(
                    shape = id.number(),
                    layer,
                    nodes = updates.len(),
                    "ghost layer reconstructed"
                );
                report.per_layer[layer - 1] += updates.len();
                if layer <= self.model.near_surface_layers {
                    report.image_nodes += updates.len();
                } else {
                    report.extrapolated_nodes += updates.len();
                }
            }
        }

        info!(
            level = self.level.index(),
            image = report.image_nodes,
            extrapolated = report.extrapolated_nodes,
            "immersed boundary treatment done"
        );
        Ok(report)
    }

    fn treat_layer(
        &self,
        partition: &Partition,
        nodes: &[Node],
        id: ShapeId,
        shape: &Shape,
        layer: usize,
        candidates: &[usize],
    ) -> std::result::Result<Vec<(usize, Conservative)>, ReconstructionError> {
        let interp = StencilInterpolator::new(partition, nodes, &self.model, self.level);
        candidates
            .par_iter()
            .filter(|&&idx| {
                let node = &nodes[idx];
                node.region == Region::Solid(id) && node.ghost_layer == layer
            })
            .map(|&idx| {
                let ijk = partition.coords(idx);
                let prim = self.reconstruct_ghost(&interp, id, shape, &nodes[idx], ijk, layer)?;
                Ok((idx, self.model.to_conservative(&prim)))
            })
            .collect()
    }

    fn reconstruct_ghost(
        &self,
        interp: &StencilInterpolator<'_>,
        id: ShapeId,
        shape: &Shape,
        node: &Node,
        ijk: [usize; 3],
        layer: usize,
    ) -> std::result::Result<Primitive, ReconstructionError> {
        let partition = interp.partition();
        let ghost = partition.point(ijk);

        let prim = if layer <= self.model.near_surface_layers {
            let projection = shape.project(&ghost, node.facet).map_err(|source| {
                ReconstructionError::Projection {
                    node: ijk,
                    shape: id.number(),
                    source,
                }
            })?;
            let center = partition.nearest_node(&projection.image);
            let estimate = interp
                .interpolate(
                    center,
                    &projection.image,
                    self.model.image_stencil_radius,
                    Donors::Fluid,
                )
                .map_err(|e| e.for_shape(id.number()))?;
            let tiny = partition.tiny();
            let flow = reconstruct_flow(shape, &projection, estimate, &self.model, tiny);
            method_of_image(&flow.boundary, &flow.image)
        } else {
            let center = Partition::signed(ijk);
            let donors = Donors::Ghost {
                shape: id,
                layer: layer - 1,
            };
            interp
                .interpolate(center, &ghost, 1, donors)
                .map_err(|e| e.for_shape(id.number()))?
                .normalized()
        };

        Ok(prim.with_ideal_gas_density(self.model.gas_constant))
    }
}
