use crate::error::AnalysisError;
use crate::Result;
use nalgebra::Vector3;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Ordered set of 3D points, one per tracked atom.
///
/// Two point sets that are compared must describe the same atoms in the same
/// order. Only the lengths are checked; correspondence is up to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<Vector3<f64>>,
}

impl PointSet {
    pub fn new(points: Vec<Vector3<f64>>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[[f64; 3]]) -> Self {
        Self {
            points: coords.iter().map(|c| Vector3::new(c[0], c[1], c[2])).collect(),
        }
    }

    /// Build from an N×3 matrix (one row per point)
    pub fn from_array(array: ArrayView2<f64>) -> Result<Self> {
        if array.ncols() != 3 {
            return Err(AnalysisError::mismatch("point matrix columns", 3, array.ncols()));
        }
        let points = array
            .rows()
            .into_iter()
            .map(|row| Vector3::new(row[0], row[1], row[2]))
            .collect();
        Ok(Self { points })
    }

    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.points.len(), 3), |(i, j)| self.points[i][j])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }

    /// Arithmetic mean of all points; zero for an empty set
    pub fn centroid(&self) -> Vector3<f64> {
        if self.points.is_empty() {
            return Vector3::zeros();
        }
        let sum = self.points.iter().fold(Vector3::zeros(), |acc, p| acc + p);
        sum / self.points.len() as f64
    }

    /// Copy of the set translated so its centroid sits at the origin
    pub fn centered(&self) -> PointSet {
        let centroid = self.centroid();
        PointSet {
            points: self.points.iter().map(|p| p - centroid).collect(),
        }
    }

    pub fn translated(&self, offset: &Vector3<f64>) -> PointSet {
        PointSet {
            points: self.points.iter().map(|p| p + offset).collect(),
        }
    }

    /// Apply `matrix` to every point as a column vector
    pub fn transformed(&self, matrix: &nalgebra::Matrix3<f64>) -> PointSet {
        PointSet {
            points: self.points.iter().map(|p| matrix * p).collect(),
        }
    }
}

impl From<Vec<[f64; 3]>> for PointSet {
    fn from(coords: Vec<[f64; 3]>) -> Self {
        PointSet::from_coords(&coords)
    }
}

impl From<Vec<Vector3<f64>>> for PointSet {
    fn from(points: Vec<Vector3<f64>>) -> Self {
        PointSet::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_centroid_and_centering() {
        let set = PointSet::from_coords(&[[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 3.0, 0.0]]);
        let centroid = set.centroid();
        assert!((centroid - Vector3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
        assert!(set.centered().centroid().norm() < 1e-12);
    }

    #[test]
    fn test_from_array_requires_three_columns() {
        let good = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let set = PointSet::from_array(good.view()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_array(), good);

        let bad = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(matches!(
            PointSet::from_array(bad.view()),
            Err(AnalysisError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_empty_centroid_is_origin() {
        let set = PointSet::new(Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.centroid(), Vector3::zeros());
    }
}
