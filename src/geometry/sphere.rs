use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Aabb;

/// An analytical solid sphere.
///
/// Containment is boundary-inclusive: a point at exactly `radius` from the
/// center is inside.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    /// Creates a new sphere.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("sphere radius must be positive".into()).into(),
            );
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the sphere.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether `point` is inside or on the sphere.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        self.radius * self.radius >= (point - self.center).norm_squared()
    }

    /// Projects `point` radially onto the surface.
    ///
    /// Returns the surface point and the outward unit normal there.
    ///
    /// # Errors
    ///
    /// Returns an error if `point` coincides with the center, where the
    /// radial direction is undefined.
    pub fn project(&self, point: &Point3) -> std::result::Result<(Point3, Vector3), GeometryError> {
        let radial = point - self.center;
        let dist = radial.norm();
        if dist < TOLERANCE {
            return Err(GeometryError::ZeroVector);
        }
        let normal = radial / dist;
        Ok((point + normal * (self.radius - dist), normal))
    }

    /// Bounding box of the sphere.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        let r = Vector3::repeat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    pub(crate) fn displace(&mut self, offset: &Vector3) {
        self.center += offset;
    }
}
