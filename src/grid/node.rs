use crate::error::GridError;
use crate::flow::Conservative;
use crate::geometry::{FacetId, ShapeId};

/// Number of conservative states retained per node.
pub const TIME_LEVELS: usize = 3;

/// Index of a retained time level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeLevel(usize);

impl TimeLevel {
    /// Level holding the latest completed solution; newly exposed nodes are
    /// reconstructed here.
    pub const CURRENT: Self = Self(0);

    /// Creates a time level index.
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is not below [`TIME_LEVELS`].
    pub fn new(level: usize) -> Result<Self, GridError> {
        if level < TIME_LEVELS {
            Ok(Self(level))
        } else {
            Err(GridError::InvalidTimeLevel(level))
        }
    }

    /// Index into [`Node::states`].
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Material region a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    /// Halo node outside the interior; never a donor or a neighbour.
    Exterior,
    /// Unobstructed flow domain.
    #[default]
    Fluid,
    /// Inside or on the surface of a shape.
    Solid(ShapeId),
}

/// Classification and flow state of one grid node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Owning region.
    pub region: Region,
    /// Nearest facet of the owning polyhedron, cached at location time.
    pub facet: Option<FacetId>,
    /// Freed from a moving shape and awaiting reconstruction as fluid.
    pub pending: bool,
    /// 1-based search layer of the nearest heterogeneous neighbour, 0 if none.
    pub interface_layer: usize,
    /// 1-based ghost layer counted inward from the surface, 0 if not a ghost.
    pub ghost_layer: usize,
    /// Conservative state per retained time level.
    pub states: [Conservative; TIME_LEVELS],
}

impl Node {
    /// Shape owning this node, if any.
    #[must_use]
    pub fn owner(&self) -> Option<ShapeId> {
        match self.region {
            Region::Solid(id) => Some(id),
            Region::Fluid | Region::Exterior => None,
        }
    }

    /// Whether the node is a fluid node usable as an interpolation donor.
    #[must_use]
    pub fn is_settled_fluid(&self) -> bool {
        self.region == Region::Fluid && !self.pending
    }

    /// Conservative state at `level`.
    #[must_use]
    pub fn state(&self, level: TimeLevel) -> &Conservative {
        &self.states[level.index()]
    }

    pub(crate) fn clear_layers(&mut self) {
        self.interface_layer = 0;
        self.ghost_layer = 0;
    }
}
