use rayon::prelude::*;
use tracing::debug;

use crate::geometry::{Containment, FacetId, Geometry, Motion};
use crate::grid::{Node, Partition, Region};

/// Assigns fluid nodes inside a shape to that shape.
///
/// Shapes are visited in order so an earlier shape keeps the nodes it
/// shares with a later one. Only nodes inside the shape's bounding box are
/// tested. Stationary shapes already resolved are skipped. Returns the
/// number of claimed nodes.
pub(super) fn assign_ownership(
    partition: &Partition,
    geometry: &mut Geometry,
    nodes: &mut [Node],
) -> usize {
    let mut claimed = 0;
    for (id, shape) in geometry.iter() {
        if shape.motion() == Motion::Stationary && shape.is_resolved() {
            continue;
        }

        let candidates = partition.indices_in(&partition.interior_box(shape.bounding_box()));
        let view: &[Node] = nodes;
        let claims: Vec<(usize, Option<FacetId>)> = candidates
            .par_iter()
            .filter(|&&idx| view[idx].region == Region::Fluid)
            .filter_map(|&idx| {
                match shape.locate(&partition.point(partition.coords(idx))) {
                    Containment::Inside { facet } => Some((idx, facet)),
                    Containment::Outside => None,
                }
            })
            .collect();

        for &(idx, facet) in &claims {
            let node = &mut nodes[idx];
            node.region = Region::Solid(id);
            node.facet = facet;
            node.pending = false;
        }
        debug!(
            shape = id.number(),
            tested = candidates.len(),
            claimed = claims.len(),
            "shape located"
        );
        claimed += claims.len();
    }
    claimed
}

/// Marks every stationary shape as located, so later passes skip it.
pub(super) fn resolve_stationary(geometry: &mut Geometry) {
    for shape in geometry.shapes_mut() {
        if shape.motion() == Motion::Stationary {
            shape.mark_resolved();
        }
    }
}
