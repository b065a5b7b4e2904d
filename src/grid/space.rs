use crate::flow::Conservative;
use crate::geometry::Geometry;
use crate::math::Point3;

use super::{Node, Partition, Region, TimeLevel};

/// Simulation context owning the grid partition, the immersed shapes and
/// the node arena.
///
/// Nodes are stored by linear index (see [`Partition::index`]). Halo nodes
/// start as [`Region::Exterior`], interior nodes as [`Region::Fluid`].
#[derive(Debug, Clone)]
pub struct Space {
    partition: Partition,
    geometry: Geometry,
    nodes: Vec<Node>,
}

impl Space {
    /// Creates a space with every interior node in the fluid region.
    #[must_use]
    pub fn new(partition: Partition, geometry: Geometry) -> Self {
        let nodes = (0..partition.node_count())
            .map(|idx| {
                let region = if partition.is_interior(partition.coords(idx)) {
                    Region::Fluid
                } else {
                    Region::Exterior
                };
                Node {
                    region,
                    ..Node::default()
                }
            })
            .collect();
        Self {
            partition,
            geometry,
            nodes,
        }
    }

    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable access to the shapes, e.g. to move them between remesh events.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable node access for the outer time integrator.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Node at `[i, j, k]`.
    #[must_use]
    pub fn node(&self, ijk: [usize; 3]) -> &Node {
        &self.nodes[self.partition.index(ijk)]
    }

    /// Sets the state at `level` of every node from its physical position.
    pub fn initialize_flow(&mut self, level: TimeLevel, state: impl Fn(Point3) -> Conservative) {
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            let point = self.partition.point(self.partition.coords(idx));
            node.states[level.index()] = state(point);
        }
    }

    pub(crate) fn split_mut(&mut self) -> (&Partition, &mut Geometry, &mut [Node]) {
        (&self.partition, &mut self.geometry, &mut self.nodes)
    }
}
