use slotmap::SlotMap;
use tracing::warn;

use crate::error::{GeometryError, Result};
use crate::math::triangle::{closest_point_on_triangle, ray_triangle_intersect};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::Aabb;

slotmap::new_key_type! {
    /// Unique identifier for a facet of a triangulated polyhedron.
    pub struct FacetId;
}

/// A triangular facet with its outward unit normal.
#[derive(Debug, Clone)]
pub struct Facet {
    /// Vertices in counter-clockwise order seen from outside.
    pub vertices: [Point3; 3],
    /// Outward unit normal.
    pub normal: Vector3,
}

impl Facet {
    /// Closest point of the facet to `point`.
    #[must_use]
    pub fn closest_point(&self, point: &Point3) -> Point3 {
        let [a, b, c] = &self.vertices;
        closest_point_on_triangle(point, a, b, c)
    }
}

/// A closed triangulated polyhedron.
///
/// Facets live in a slot map so their ids stay valid as long as the
/// polyhedron does; grid nodes cache the id of their nearest facet.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    facets: SlotMap<FacetId, Facet>,
    bounding_box: Aabb,
}

/// Skewed ray directions for parity tests. None is aligned with a grid
/// axis or a typical facet diagonal.
const RAY_DIRECTIONS: [[f64; 3]; 3] = [
    [1.0, 0.318_309_886, 0.271_828_183],
    [0.271_828_183, 1.0, 0.318_309_886],
    [0.318_309_886, 0.271_828_183, 1.0],
];

impl Polyhedron {
    /// Builds a polyhedron from an indexed triangle list.
    ///
    /// Triangles must be wound counter-clockwise when seen from outside.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no triangles, an index is out of
    /// range, or a triangle has zero area.
    pub fn from_triangles(vertices: &[Point3], triangles: &[[usize; 3]]) -> Result<Self> {
        if triangles.is_empty() {
            return Err(GeometryError::InvalidMesh("no triangles".into()).into());
        }

        let mut facets = SlotMap::with_capacity_and_key(triangles.len());
        for (n, tri) in triangles.iter().enumerate() {
            let mut corners = [Point3::origin(); 3];
            for (slot, &v) in corners.iter_mut().zip(tri) {
                *slot = *vertices.get(v).ok_or_else(|| {
                    GeometryError::InvalidMesh(format!("triangle {n} references vertex {v}"))
                })?;
            }
            let normal = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
            let len = normal.norm();
            if len < TOLERANCE {
                return Err(
                    GeometryError::InvalidMesh(format!("triangle {n} has zero area")).into(),
                );
            }
            facets.insert(Facet {
                vertices: corners,
                normal: normal / len,
            });
        }

        let bounding_box = Aabb::from_points(facets.values().flat_map(|f| f.vertices.iter()))
            .ok_or_else(|| GeometryError::InvalidMesh("no vertices".into()))?;

        Ok(Self {
            facets,
            bounding_box,
        })
    }

    /// Returns the facet with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not belong to this polyhedron.
    pub fn facet(&self, id: FacetId) -> std::result::Result<&Facet, GeometryError> {
        self.facets.get(id).ok_or(GeometryError::FacetNotFound)
    }

    /// Iterates over all facets.
    pub fn facets(&self) -> impl Iterator<Item = (FacetId, &Facet)> {
        self.facets.iter()
    }

    /// Bounding box of all vertices.
    #[must_use]
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    /// Nearest facet to `point` with its squared distance.
    #[must_use]
    pub fn nearest_facet(&self, point: &Point3) -> Option<(FacetId, f64)> {
        self.facets
            .iter()
            .map(|(id, f)| (id, (f.closest_point(point) - point).norm_squared()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Locates `point` relative to the solid.
    ///
    /// Returns the nearest facet when the point is inside or on the
    /// surface, `None` when it is outside.
    #[must_use]
    pub fn locate(&self, point: &Point3) -> Option<FacetId> {
        if !self.bounding_box.contains(point) {
            return None;
        }
        let (nearest, dist2) = self.nearest_facet(point)?;
        if dist2 < TOLERANCE * TOLERANCE || self.ray_parity_inside(point) {
            Some(nearest)
        } else {
            None
        }
    }

    /// Projects `point` onto facet `id`.
    ///
    /// Returns the closest point of the facet and the facet's outward normal.
    ///
    /// # Errors
    ///
    /// Returns an error if the facet does not exist.
    pub fn project(
        &self,
        point: &Point3,
        id: FacetId,
    ) -> std::result::Result<(Point3, Vector3), GeometryError> {
        let facet = self.facet(id)?;
        Ok((facet.closest_point(point), facet.normal))
    }

    pub(crate) fn displace(&mut self, offset: &Vector3) {
        for facet in self.facets.values_mut() {
            for v in &mut facet.vertices {
                *v += offset;
            }
        }
        self.bounding_box = self.bounding_box.translated(offset);
    }

    /// Crossing parity along the first ray that does not graze an edge.
    fn ray_parity_inside(&self, point: &Point3) -> bool {
        let edge_tol = TOLERANCE * 100.0;
        'directions: for dir in RAY_DIRECTIONS {
            let dir = Vector3::from(dir).normalize();
            let mut crossings = 0u32;
            for facet in self.facets.values() {
                let [a, b, c] = &facet.vertices;
                if let Some(hit) = ray_triangle_intersect(point, &dir, a, b, c, TOLERANCE) {
                    if hit.grazes_edge(edge_tol) {
                        continue 'directions;
                    }
                    crossings += 1;
                }
            }
            return crossings % 2 == 1;
        }

        warn!(
            x = point.x,
            y = point.y,
            z = point.z,
            "every ray grazed a polyhedron edge; treating point as outside"
        );
        false
    }
}
