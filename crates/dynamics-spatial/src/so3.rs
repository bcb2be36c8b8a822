//! Defines the **skew-symmetric** (so(3)) cross-product matrix of a 3D vector.

use crate::vector3d::Vector3D;
use nalgebra::Matrix3;

/// The skew-symmetric matrix `[v]_x` such that `[v]_x * w == v.cross(w)`.
pub struct SO3(pub(crate) Matrix3<f64>);

impl SO3 {
    /// Returns the identity rotation generator (the zero matrix).
    #[must_use]
    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    #[must_use]
    pub fn from_vector3d(vec: &Vector3D) -> Self {
        let v = vec.as_slice();
        Self(Matrix3::new(
            0.0, -v[2], v[1], v[2], 0.0, -v[0], -v[1], v[0], 0.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn skew_matches_cross_product() {
        let v = Vector3D::new(1.0, 2.0, 3.0);
        let w = Vector3D::new(4.0, -1.0, 2.0);
        let skew = SO3::from_vector3d(&v).0;
        let expected = v.cross(&w);
        let got = skew * nalgebra::Vector3::new(w.as_slice()[0], w.as_slice()[1], w.as_slice()[2]);
        assert_relative_eq!(got, nalgebra::Vector3::new(
            expected.as_slice()[0],
            expected.as_slice()[1],
            expected.as_slice()[2]
        ));
    }
}
