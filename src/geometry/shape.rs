#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3};

use super::{Aabb, FacetId, Polyhedron, Sphere};

/// Whether a body moves between remesh events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Motion {
    /// Fixed in space; its nodes are located once and reused.
    #[default]
    Stationary,
    /// Displaced by the outer driver; its near-surface nodes are
    /// re-located at every remesh.
    Moving,
}

/// Velocity condition enforced at the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VelocityCondition {
    NoSlip,
    Slip,
}

/// Thermal condition enforced at the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThermalCondition {
    /// Zero normal temperature gradient.
    Adiabatic,
    /// Constant wall temperature.
    Isothermal(f64),
}

/// Geometric representation of a solid body.
#[derive(Debug, Clone)]
pub enum Body {
    /// Analytical sphere.
    Sphere(Sphere),
    /// Closed triangulated surface.
    Polyhedron(Polyhedron),
}

/// Where a point sits relative to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    Outside,
    /// Inside or on the surface. Polyhedra report the nearest facet.
    Inside { facet: Option<FacetId> },
}

/// Boundary data of a ghost point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Point on the solid surface.
    pub boundary: Point3,
    /// Outward unit normal at the boundary point.
    pub normal: Vector3,
    /// Mirror of the ghost point through the boundary point.
    pub image: Point3,
}

/// A rigid solid body immersed in the grid, with its wall conditions.
#[derive(Debug, Clone)]
pub struct Shape {
    body: Body,
    bounding_box: Aabb,
    centroid: Point3,
    motion: Motion,
    velocity: Vector3,
    angular_velocity: Vector3,
    friction: f64,
    wall_temperature: f64,
    resolved: bool,
}

impl Shape {
    /// Creates a stationary, no-slip, adiabatic sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn sphere(center: Point3, radius: f64) -> Result<Self> {
        Ok(Self::from_body(Body::Sphere(Sphere::new(center, radius)?), center))
    }

    /// Creates a stationary, no-slip, adiabatic polyhedron rotating about
    /// `centroid`.
    #[must_use]
    pub fn polyhedron(polyhedron: Polyhedron, centroid: Point3) -> Self {
        Self::from_body(Body::Polyhedron(polyhedron), centroid)
    }

    fn from_body(body: Body, centroid: Point3) -> Self {
        let bounding_box = match &body {
            Body::Sphere(s) => s.bounding_box(),
            Body::Polyhedron(p) => p.bounding_box(),
        };
        Self {
            body,
            bounding_box,
            centroid,
            motion: Motion::Stationary,
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            friction: 1.0,
            wall_temperature: -1.0,
            resolved: false,
        }
    }

    /// Sets the motion kind.
    #[must_use]
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }

    /// Sets the translational velocity of the centroid.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the angular velocity about the centroid.
    #[must_use]
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Sets the friction parameter: positive for no-slip, otherwise slip.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the wall temperature: negative for an adiabatic wall.
    #[must_use]
    pub fn with_wall_temperature(mut self, temperature: f64) -> Self {
        self.wall_temperature = temperature;
        self
    }

    /// Returns the geometric body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns the bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> &Aabb {
        &self.bounding_box
    }

    /// Returns the centroid (rotation center).
    #[must_use]
    pub fn centroid(&self) -> &Point3 {
        &self.centroid
    }

    /// Returns the motion kind.
    #[must_use]
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Returns the translational velocity.
    #[must_use]
    pub fn velocity(&self) -> &Vector3 {
        &self.velocity
    }

    /// Returns the angular velocity.
    #[must_use]
    pub fn angular_velocity(&self) -> &Vector3 {
        &self.angular_velocity
    }

    /// Updates translational and angular velocity in place.
    pub fn set_velocity(&mut self, velocity: Vector3, angular_velocity: Vector3) {
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
    }

    /// Velocity condition selected by the friction parameter.
    #[must_use]
    pub fn velocity_condition(&self) -> VelocityCondition {
        if self.friction > 0.0 {
            VelocityCondition::NoSlip
        } else {
            VelocityCondition::Slip
        }
    }

    /// Thermal condition selected by the wall temperature.
    #[must_use]
    pub fn thermal_condition(&self) -> ThermalCondition {
        if self.wall_temperature < 0.0 {
            ThermalCondition::Adiabatic
        } else {
            ThermalCondition::Isothermal(self.wall_temperature)
        }
    }

    /// Whether this shape's nodes have been located at least once.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    /// Rigidly moves the body, its centroid and bounding box by `offset`.
    pub fn displace(&mut self, offset: Vector3) {
        match &mut self.body {
            Body::Sphere(s) => s.displace(&offset),
            Body::Polyhedron(p) => p.displace(&offset),
        }
        self.centroid += offset;
        self.bounding_box = self.bounding_box.translated(&offset);
    }

    /// Locates `point` relative to the body.
    #[must_use]
    pub fn locate(&self, point: &Point3) -> Containment {
        match &self.body {
            Body::Sphere(s) if s.contains(point) => Containment::Inside { facet: None },
            Body::Polyhedron(p) => match p.locate(point) {
                Some(facet) => Containment::Inside { facet: Some(facet) },
                None => Containment::Outside,
            },
            Body::Sphere(_) => Containment::Outside,
        }
    }

    /// Computes the boundary point, outward normal and image point of a
    /// ghost point.
    ///
    /// Polyhedra project onto `facet`; without a cached facet the nearest
    /// one is searched.
    ///
    /// # Errors
    ///
    /// Returns an error if the projection is undefined (ghost point at a
    /// sphere center, or an unknown facet).
    pub fn project(
        &self,
        ghost: &Point3,
        facet: Option<FacetId>,
    ) -> std::result::Result<Projection, GeometryError> {
        let (boundary, normal) = match &self.body {
            Body::Sphere(s) => s.project(ghost)?,
            Body::Polyhedron(p) => {
                let id = match facet {
                    Some(id) => id,
                    None => p.nearest_facet(ghost).ok_or(GeometryError::FacetNotFound)?.0,
                };
                p.project(ghost, id)?
            }
        };
        Ok(Projection {
            boundary,
            normal,
            image: reflect(ghost, &boundary),
        })
    }

    /// Velocity of the solid surface at `point`: `V + w x (point - centroid)`.
    #[must_use]
    pub fn surface_velocity(&self, point: &Point3) -> Vector3 {
        self.velocity + self.angular_velocity.cross(&(point - self.centroid))
    }
}

/// Mirrors `point` through `pivot`.
#[must_use]
pub fn reflect(point: &Point3, pivot: &Point3) -> Point3 {
    Point3::from(pivot.coords + pivot.coords - point.coords)
}
