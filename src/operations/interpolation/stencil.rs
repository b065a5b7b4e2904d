use crate::error::ReconstructionError;
use crate::flow::FlowModel;
use crate::geometry::ShapeId;
use crate::grid::{Node, Partition, Region, TimeLevel};
use crate::math::Point3;

use super::WeightedSum;

/// Which nodes may contribute to an interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Donors {
    /// Settled fluid nodes (not awaiting reconstruction).
    Fluid,
    /// Ghost nodes of `shape` in ghost layer `layer`.
    Ghost { shape: ShapeId, layer: usize },
}

impl Donors {
    /// Whether `node` qualifies as a donor.
    #[must_use]
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            Self::Fluid => node.is_settled_fluid(),
            Self::Ghost { shape, layer } => {
                node.region == Region::Solid(shape) && node.ghost_layer == layer
            }
        }
    }
}

/// Inverse distance interpolation over a growing cube of grid nodes.
///
/// The cube is centred on a node and starts at a given half-width. When no
/// donor qualifies, the whole cube is scanned again one node wider, up to
/// `start + 2 * halo`.
#[derive(Debug, Clone, Copy)]
pub struct StencilInterpolator<'a> {
    partition: &'a Partition,
    nodes: &'a [Node],
    model: &'a FlowModel,
    level: TimeLevel,
}

impl<'a> StencilInterpolator<'a> {
    #[must_use]
    pub fn new(
        partition: &'a Partition,
        nodes: &'a [Node],
        model: &'a FlowModel,
        level: TimeLevel,
    ) -> Self {
        Self {
            partition,
            nodes,
            model,
            level,
        }
    }

    /// Node layout the stencil runs on.
    #[must_use]
    pub fn partition(&self) -> &'a Partition {
        self.partition
    }

    /// Accumulates donor states around `center` weighted by their squared
    /// distance to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconstructionError::NoDonor`] if no node qualifies up to
    /// the maximum half-width.
    pub fn interpolate(
        &self,
        center: [isize; 3],
        target: &Point3,
        start: usize,
        donors: Donors,
    ) -> Result<WeightedSum, ReconstructionError> {
        let max_radius = start + 2 * self.partition.halo();
        let tiny = self.partition.tiny();

        for radius in start..=max_radius {
            let r = isize::try_from(radius).unwrap_or(isize::MAX);
            let mut acc = WeightedSum::default();
            for dk in -r..=r {
                for dj in -r..=r {
                    for di in -r..=r {
                        let ijk = [center[0] + di, center[1] + dj, center[2] + dk];
                        let Some(idx) = self.partition.checked_index(ijk) else {
                            continue;
                        };
                        let node = &self.nodes[idx];
                        if !donors.accepts(node) {
                            continue;
                        }
                        let dist2 = (self.partition.point_signed(ijk) - target).norm_squared();
                        let value = self.model.to_primitive(node.state(self.level));
                        acc.add(&value, dist2, tiny);
                    }
                }
            }
            if !acc.is_empty() {
                return Ok(acc);
            }
        }

        Err(ReconstructionError::NoDonor {
            node: center,
            shape: None,
            max_radius,
        })
    }
}
