//! Node classification, run whenever the shapes move.

mod interfacial;
mod ownership;
mod reset;

use tracing::{debug, info};

use crate::error::Result;
use crate::flow::FlowModel;
use crate::grid::{Region, Space};

/// Summary of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainReport {
    /// Nodes released by moving shapes during the reset.
    pub released: usize,
    /// Fluid nodes claimed by a shape.
    pub claimed: usize,
    /// Released nodes left in the fluid and reconstructed.
    pub exposed: usize,
    /// Nodes owned by a shape after the pass.
    pub owned: usize,
    /// Owned nodes next to another region.
    pub interfacial: usize,
    /// Ghost nodes per layer, outermost first.
    pub ghosts_per_layer: Vec<usize>,
}

/// Classifies grid nodes against the immersed shapes.
///
/// Runs three phases separated by full barriers:
///
/// 1. reset the markers of the previous pass, releasing the interfacial
///    nodes of moving shapes;
/// 2. assign fluid nodes inside a shape to it, first shape first;
/// 3. reconstruct released nodes that stayed in the fluid, then compute the
///    interfacial and ghost layers of owned nodes.
///
/// Must run before [`ImmersedBoundaryTreatment`](super::ImmersedBoundaryTreatment)
/// whenever a shape has moved.
pub struct ComputeGeometryDomain {
    model: FlowModel,
}

impl ComputeGeometryDomain {
    /// Creates a new `ComputeGeometryDomain` operation.
    #[must_use]
    pub fn new(model: FlowModel) -> Self {
        Self { model }
    }

    /// Executes the classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is invalid or a released node has no
    /// fluid donor to be reconstructed from. In the latter case the nodes
    /// keep the ownership of this pass and the released nodes stay pending,
    /// so the flow field must be repaired or the [`Space`] rebuilt before
    /// running again. Stationary shapes are only marked as located once a
    /// pass succeeds.
    pub fn execute(&self, space: &mut Space) -> Result<DomainReport> {
        self.model.validate()?;
        let (partition, geometry, nodes) = space.split_mut();

        let released = reset::reset(geometry, nodes);
        debug!(released, "classification reset");

        let claimed = ownership::assign_ownership(partition, geometry, nodes);
        debug!(claimed, "ownership assigned");

        let exposed = interfacial::reconstruct_exposed(partition, nodes, &self.model)?;
        interfacial::classify_layers(partition, nodes);
        ownership::resolve_stationary(geometry);

        let mut report = DomainReport {
            released,
            claimed,
            exposed,
            ghosts_per_layer: vec![0; partition.ghost_layers()],
            ..DomainReport::default()
        };
        for node in nodes.iter() {
            if !matches!(node.region, Region::Solid(_)) {
                continue;
            }
            report.owned += 1;
            if node.interface_layer > 0 {
                report.interfacial += 1;
            }
            if let Some(count) = node
                .ghost_layer
                .checked_sub(1)
                .and_then(|r| report.ghosts_per_layer.get_mut(r))
            {
                *count += 1;
            }
        }

        info!(
            owned = report.owned,
            interfacial = report.interfacial,
            ghosts = ?report.ghosts_per_layer,
            exposed,
            "geometry domain computed"
        );
        Ok(report)
    }
}
