use super::Vector3;

/// Completes a unit `normal` into a right-handed orthonormal frame.
///
/// Returns `(ta, tb)` with `ta x tb = normal`. The first tangent is built
/// against whichever coordinate axis is least aligned with the normal.
#[must_use]
pub fn orthogonal_basis(normal: &Vector3) -> (Vector3, Vector3) {
    let reference = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };

    let ta = reference.cross(normal).normalize();
    let tb = normal.cross(&ta);
    (ta, tb)
}
