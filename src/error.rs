use thiserror::Error;

/// Top-level error type for the immersed boundary core.
#[derive(Debug, Error)]
pub enum ImmerseError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to solid geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("facet not found in polyhedron")]
    FacetNotFound,

    #[error("invalid triangle mesh: {0}")]
    InvalidMesh(String),
}

/// Errors related to the structured grid partition.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("halo depth {halo} cannot hold {ghost_layers} ghost layers")]
    InsufficientHalo { halo: usize, ghost_layers: usize },

    #[error("time level {0} is not retained")]
    InvalidTimeLevel(usize),
}

/// Errors raised while reconstructing ghost or re-exposed nodes.
#[derive(Debug, Error)]
pub enum ReconstructionError {
    /// No qualifying donor was found up to the radius cutoff.
    ///
    /// Usually a disconnected or under-resolved geometry, or two bodies
    /// separating so quickly that fresh fluid nodes have no fluid neighbour.
    #[error(
        "no donor node around node {node:?} (shape {}) within half-width {max_radius}",
        shape.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    NoDonor {
        node: [isize; 3],
        shape: Option<usize>,
        max_radius: usize,
    },

    #[error("boundary projection failed at node {node:?} of shape {shape}: {source}")]
    Projection {
        node: [usize; 3],
        shape: usize,
        #[source]
        source: GeometryError,
    },
}

impl ReconstructionError {
    /// Attaches the 1-based shape number to a donor failure.
    #[must_use]
    pub fn for_shape(self, number: usize) -> Self {
        match self {
            Self::NoDonor {
                node, max_radius, ..
            } => Self::NoDonor {
                node,
                shape: Some(number),
                max_radius,
            },
            other => other,
        }
    }
}

/// Errors in user supplied model parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Convenience type alias for results using [`ImmerseError`].
pub type Result<T> = std::result::Result<T, ImmerseError>;
