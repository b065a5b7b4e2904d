use rayon::prelude::*;

use crate::error::ReconstructionError;
use crate::flow::{Conservative, FlowModel};
use crate::grid::{Node, Partition, Region, TimeLevel};
use crate::operations::interpolation::{Donors, StencilInterpolator};

/// Reconstructs fluid nodes released from a moving shape that no shape
/// reclaimed.
///
/// Every pending node is interpolated from settled fluid donors before any
/// result is written, so the outcome does not depend on sweep order.
/// Returns the number of reconstructed nodes.
///
/// Two touching bodies separating within one step can leave pending nodes
/// with no settled fluid donor in reach; that case is reported as
/// [`ReconstructionError::NoDonor`].
pub(super) fn reconstruct_exposed(
    partition: &Partition,
    nodes: &mut [Node],
    model: &FlowModel,
) -> Result<usize, ReconstructionError> {
    let level = TimeLevel::CURRENT;
    let updates: Vec<(usize, Conservative)> = {
        let view: &[Node] = nodes;
        let interp = StencilInterpolator::new(partition, view, model, level);
        view.par_iter()
            .enumerate()
            .filter(|(_, node)| node.region == Region::Fluid && node.pending)
            .map(|(idx, _)| {
                let ijk = partition.coords(idx);
                let center = Partition::signed(ijk);
                let prim = interp
                    .interpolate(
                        center,
                        &partition.point(ijk),
                        model.image_stencil_radius,
                        Donors::Fluid,
                    )?
                    .normalized()
                    .with_ideal_gas_density(model.gas_constant);
                Ok((idx, model.to_conservative(&prim)))
            })
            .collect::<Result<_, ReconstructionError>>()?
    };

    for &(idx, state) in &updates {
        let node = &mut nodes[idx];
        node.states[level.index()] = state;
        node.pending = false;
        node.facet = None;
    }
    Ok(updates.len())
}

/// Sets the interfacial and ghost layers of every owned node.
///
/// A node is interfacial at layer `r` when the first neighbour of another
/// region found along the search template lies in layer `r`. An interfacial
/// node is a ghost node at layer `r` when the first fluid neighbour lies in
/// layer `r`. Exterior neighbours are ignored.
pub(super) fn classify_layers(partition: &Partition, nodes: &mut [Node]) {
    let layers: Vec<(usize, usize, usize)> = {
        let view: &[Node] = nodes;
        view.par_iter()
            .enumerate()
            .filter(|(_, node)| matches!(node.region, Region::Solid(_)))
            .map(|(idx, node)| {
                let ijk = partition.coords(idx);
                let interface = nearest_layer(partition, view, ijk, |n| n.region != node.region);
                let ghost = if interface > 0 {
                    nearest_layer(partition, view, ijk, |n| n.region == Region::Fluid)
                } else {
                    0
                };
                (idx, interface, ghost)
            })
            .collect()
    };

    for (idx, interface, ghost) in layers {
        nodes[idx].interface_layer = interface;
        nodes[idx].ghost_layer = ghost;
    }
}

/// 1-based layer of the first template neighbour matching `found`, 0 if
/// none does.
fn nearest_layer(
    partition: &Partition,
    nodes: &[Node],
    ijk: [usize; 3],
    found: impl Fn(&Node) -> bool,
) -> usize {
    let template = partition.template();
    for (position, offset) in template.offsets().iter().enumerate() {
        let Some(idx) = partition.neighbor(ijk, *offset) else {
            continue;
        };
        let neighbor = &nodes[idx];
        if neighbor.region == Region::Exterior {
            continue;
        }
        if found(neighbor) {
            return template.layer_of(position).unwrap_or(0);
        }
    }
    0
}
