// Index arithmetic converts between node counts and coordinates; grid sizes
// stay far below the precision limits of f64 and isize.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

use std::ops::Range;

use crate::error::{GridError, Result};
use crate::geometry::Aabb;
use crate::math::{Point3, Vector3};

use super::SearchTemplate;

/// Structured node layout of a rectangular domain.
///
/// `cells + 1` nodes span the domain along each axis, padded by `halo`
/// nodes on both sides. The interior range `[halo, count - halo)` holds the
/// nodes that belong to the physical domain.
#[derive(Debug, Clone)]
pub struct Partition {
    domain: Aabb,
    counts: [usize; 3],
    halo: usize,
    spacing: Vector3,
    template: SearchTemplate,
    tiny: f64,
}

impl Partition {
    /// Creates a partition.
    ///
    /// # Errors
    ///
    /// Returns an error if a cell count is zero, the domain is empty along
    /// an axis, `ghost_layers` is zero, or the halo is shallower than the
    /// ghost layers.
    pub fn new(domain: Aabb, cells: [usize; 3], halo: usize, ghost_layers: usize) -> Result<Self> {
        if cells.contains(&0) {
            return Err(GridError::InvalidDimensions(format!("cell counts {cells:?}")).into());
        }
        let extents = domain.extents();
        if extents.iter().any(|&e| e.is_nan() || e <= 0.0) {
            return Err(GridError::InvalidDimensions(format!(
                "domain extents {:?}",
                extents.as_slice()
            ))
            .into());
        }
        if ghost_layers == 0 {
            return Err(GridError::InvalidDimensions("no ghost layers".into()).into());
        }
        if halo < ghost_layers {
            return Err(GridError::InsufficientHalo { halo, ghost_layers }.into());
        }

        let spacing = Vector3::new(
            extents.x / cells[0] as f64,
            extents.y / cells[1] as f64,
            extents.z / cells[2] as f64,
        );
        let tiny = (1.0e-3 * spacing.min()).powi(2);

        Ok(Self {
            domain,
            counts: cells.map(|m| m + 1 + 2 * halo),
            halo,
            spacing,
            template: SearchTemplate::new(ghost_layers),
            tiny,
        })
    }

    /// Physical domain.
    #[must_use]
    pub fn domain(&self) -> &Aabb {
        &self.domain
    }

    /// Node counts per axis, halo included.
    #[must_use]
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.counts.iter().product()
    }

    /// Halo depth.
    #[must_use]
    pub fn halo(&self) -> usize {
        self.halo
    }

    /// Number of ghost layers.
    #[must_use]
    pub fn ghost_layers(&self) -> usize {
        self.template.layers()
    }

    /// Node spacing per axis.
    #[must_use]
    pub fn spacing(&self) -> &Vector3 {
        &self.spacing
    }

    /// Neighbour search template.
    #[must_use]
    pub fn template(&self) -> &SearchTemplate {
        &self.template
    }

    /// Floor for squared interpolation distances.
    #[must_use]
    pub fn tiny(&self) -> f64 {
        self.tiny
    }

    /// Linear index of node `[i, j, k]`.
    #[must_use]
    pub fn index(&self, node: [usize; 3]) -> usize {
        (node[2] * self.counts[1] + node[1]) * self.counts[0] + node[0]
    }

    /// Node coordinates of a linear index.
    #[must_use]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let [nx, ny, _] = self.counts;
        [index % nx, (index / nx) % ny, index / (nx * ny)]
    }

    /// Linear index of a signed node coordinate, or `None` outside the array.
    #[must_use]
    pub fn checked_index(&self, node: [isize; 3]) -> Option<usize> {
        let mut unsigned = [0usize; 3];
        for s in 0..3 {
            let n = usize::try_from(node[s]).ok()?;
            if n >= self.counts[s] {
                return None;
            }
            unsigned[s] = n;
        }
        Some(self.index(unsigned))
    }

    /// Linear index of `node + offset`, or `None` outside the array.
    #[must_use]
    pub fn neighbor(&self, node: [usize; 3], offset: [isize; 3]) -> Option<usize> {
        let [i, j, k] = Self::signed(node);
        self.checked_index([i + offset[0], j + offset[1], k + offset[2]])
    }

    /// Signed copy of a node coordinate.
    #[must_use]
    pub fn signed(node: [usize; 3]) -> [isize; 3] {
        node.map(|n| n as isize)
    }

    /// Whether the node lies in the interior range.
    #[must_use]
    pub fn is_interior(&self, node: [usize; 3]) -> bool {
        (0..3).all(|s| node[s] >= self.halo && node[s] + self.halo < self.counts[s])
    }

    /// Interior range per axis.
    #[must_use]
    pub fn interior(&self) -> [Range<usize>; 3] {
        self.counts.map(|n| self.halo..n - self.halo)
    }

    /// Physical coordinates of a node.
    #[must_use]
    pub fn point(&self, node: [usize; 3]) -> Point3 {
        self.point_signed(Self::signed(node))
    }

    /// Physical coordinates of a possibly out-of-array node.
    #[must_use]
    pub fn point_signed(&self, node: [isize; 3]) -> Point3 {
        let h = self.halo as f64;
        Point3::new(
            self.domain.min.x + (node[0] as f64 - h) * self.spacing.x,
            self.domain.min.y + (node[1] as f64 - h) * self.spacing.y,
            self.domain.min.z + (node[2] as f64 - h) * self.spacing.z,
        )
    }

    /// Node nearest to a physical point (may lie outside the array).
    #[must_use]
    pub fn nearest_node(&self, point: &Point3) -> [isize; 3] {
        let h = self.halo as isize;
        [0, 1, 2].map(|s| {
            ((point[s] - self.domain.min[s]) / self.spacing[s] + 0.5).floor() as isize + h
        })
    }

    /// Interior node ranges covering a bounding box.
    ///
    /// Box corners are rounded to the nearest node and clamped to the
    /// interior, so the result is never empty.
    #[must_use]
    pub fn interior_box(&self, aabb: &Aabb) -> [Range<usize>; 3] {
        let lo = self.nearest_node(&aabb.min);
        let hi = self.nearest_node(&aabb.max);
        let interior = self.interior();
        [0, 1, 2].map(|s| {
            let first = interior[s].start as isize;
            let last = interior[s].end as isize - 1;
            let a = lo[s].clamp(first, last) as usize;
            let b = hi[s].clamp(first, last) as usize;
            a..b + 1
        })
    }

    /// Linear indices of all nodes inside the given ranges, `i` fastest.
    #[must_use]
    pub fn indices_in(&self, ranges: &[Range<usize>; 3]) -> Vec<usize> {
        let mut out = Vec::with_capacity(ranges.iter().map(ExactSizeIterator::len).product());
        for k in ranges[2].clone() {
            for j in ranges[1].clone() {
                for i in ranges[0].clone() {
                    out.push(self.index([i, j, k]));
                }
            }
        }
        out
    }
}
