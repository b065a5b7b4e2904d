use rayon::prelude::*;

use crate::geometry::{Geometry, Motion};
use crate::grid::{Node, Region};

/// Clears last step's layer markers.
///
/// Stationary shapes keep their nodes. Interfacial nodes of moving shapes
/// are released to the fluid and flagged pending; deeper nodes stay owned.
/// Returns the number of released nodes.
pub(super) fn reset(geometry: &Geometry, nodes: &mut [Node]) -> usize {
    nodes
        .par_iter_mut()
        .map(|node| match node.region {
            Region::Exterior => 0,
            Region::Fluid => {
                node.clear_layers();
                node.facet = None;
                0
            }
            Region::Solid(id) => match geometry.get(id).map(|shape| shape.motion()) {
                Some(Motion::Stationary) => {
                    node.clear_layers();
                    0
                }
                Some(Motion::Moving) if node.interface_layer == 0 => 0,
                Some(Motion::Moving) | None => {
                    node.region = Region::Fluid;
                    node.facet = None;
                    node.pending = true;
                    node.clear_layers();
                    1
                }
            },
        })
        .sum()
}
