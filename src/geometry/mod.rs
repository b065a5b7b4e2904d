mod aabb;
pub mod polyhedron;
mod shape;
mod sphere;

pub use aabb::Aabb;
pub use polyhedron::{Facet, FacetId, Polyhedron};
pub use shape::{
    reflect, Body, Containment, Motion, Projection, Shape, ThermalCondition, VelocityCondition,
};
pub use sphere::Sphere;

/// Identifier of a shape in a [`Geometry`] collection.
///
/// Shapes are numbered in insertion order; [`ShapeId::number`] gives the
/// 1-based number used in reports and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    /// Zero-based position in the collection.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based shape number.
    #[must_use]
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

/// Ordered collection of immersed shapes.
///
/// Order matters: when bodies overlap, the earlier shape owns the shared
/// nodes.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    shapes: Vec<Shape>,
}

impl Geometry {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape and returns its id.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        self.shapes.push(shape);
        ShapeId(self.shapes.len() - 1)
    }

    /// Returns the shape with the given id.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    /// Returns the shape with the given id mutably.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0)
    }

    /// Iterates over shapes in ownership priority order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().enumerate().map(|(n, s)| (ShapeId(n), s))
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub(crate) fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.iter_mut()
    }
}
