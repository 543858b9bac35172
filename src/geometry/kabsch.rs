//! Rigid-body superposition of corresponding point sets (Kabsch).
//!
//! Both sets are centered on their own centroids, the 3×3 cross-covariance
//! `C = P'ᵀ Q'` is decomposed as `C = V S Wᵀ`, and the rotation is
//! `R = V Wᵀ` after the reflection correction. With points written as row
//! vectors, `P' R ≈ Q'`: the rotation carries the reference frame onto the
//! moving frame. [`Superposition::superimpose`] applies the inverse to bring a
//! moving set back onto the reference.
//!
//! When the cross-covariance is rank-deficient (coincident points, a single
//! point, or collinear sets) the rotation about the degenerate axes is
//! underdetermined. If the identity already reaches the optimal residual it
//! is returned, so aligning any set to itself gives `R = I`. Otherwise
//! whatever proper rotation the decomposition yields is returned; the RMSD is
//! exact either way.

use super::PointSet;
use crate::error::AnalysisError;
use crate::Result;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

const SVD_MAX_ITERATIONS: usize = 1000;
/// Relative slack when testing whether the identity is already optimal
const IDENTITY_TOLERANCE: f64 = 1e-12;

/// Result of superimposing a moving point set onto a reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Superposition {
    /// Proper rotation (det = +1), row-vector convention `P' R ≈ Q'`
    pub rotation: Matrix3<f64>,
    /// RMSD after optimal superposition
    pub rmsd: f64,
    pub reference_centroid: Vector3<f64>,
    pub moving_centroid: Vector3<f64>,
    /// Singular values of the cross-covariance, in decomposition order
    pub singular_values: Vector3<f64>,
    /// True when the naive `V Wᵀ` was a reflection and had to be corrected
    pub reflection_corrected: bool,
    pub point_count: usize,
}

impl Superposition {
    /// Map a moving point set onto the reference frame.
    ///
    /// Each point `q` becomes `R (q - q̄) + p̄`.
    pub fn superimpose(&self, moving: &PointSet) -> PointSet {
        let points = moving
            .iter()
            .map(|q| self.rotation * (q - self.moving_centroid) + self.reference_centroid)
            .collect();
        PointSet::new(points)
    }

    /// Translation component of the moving-to-reference transform
    pub fn translation(&self) -> Vector3<f64> {
        self.reference_centroid - self.rotation * self.moving_centroid
    }

    pub fn determinant(&self) -> f64 {
        self.rotation.determinant()
    }
}

/// Optimal rigid-body superposition of `moving` onto `reference`.
///
/// Fails with [`AnalysisError::DimensionMismatch`] when the sets differ in
/// length or are empty.
pub fn superpose(reference: &PointSet, moving: &PointSet) -> Result<Superposition> {
    if reference.len() != moving.len() {
        return Err(AnalysisError::mismatch(
            "superposition point count",
            reference.len(),
            moving.len(),
        ));
    }
    if reference.is_empty() {
        return Err(AnalysisError::mismatch("superposition point count", 1, 0));
    }

    let reference_centroid = reference.centroid();
    let moving_centroid = moving.centroid();
    let p = reference.centered();
    let q = moving.centered();

    let covariance = p
        .iter()
        .zip(q.iter())
        .fold(Matrix3::zeros(), |acc, (pi, qi)| acc + pi * qi.transpose());

    let svd = covariance
        .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or_else(|| {
            AnalysisError::DegenerateInput("cross-covariance SVD did not converge".to_string())
        })?;
    let singular_values = svd.singular_values;
    let (mut v, w_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(AnalysisError::DegenerateInput(
                "cross-covariance SVD returned no singular vectors".to_string(),
            ))
        }
    };

    let reflection_corrected = (v * w_t).determinant() < 0.0;
    if reflection_corrected {
        // Flip the axis of the smallest singular value (the last one when sorted).
        let weakest = singular_values.imin();
        for x in v.column_mut(weakest).iter_mut() {
            *x = -*x;
        }
        tracing::debug!(
            points = reference.len(),
            smallest_singular_value = singular_values[weakest],
            "Reflection corrected in superposition"
        );
    }
    let fitted = v * w_t;
    let residual = |r: &Matrix3<f64>| -> f64 {
        p.iter()
            .zip(q.iter())
            .map(|(pi, qi)| (r.transpose() * pi - qi).norm_squared())
            .sum()
    };

    let fitted_squared = residual(&fitted);
    let identity_squared = residual(&Matrix3::identity());
    let scale: f64 = p.iter().chain(q.iter()).map(|x| x.norm_squared()).sum();
    let (rotation, squared, reflection_corrected) =
        if identity_squared <= fitted_squared + IDENTITY_TOLERANCE * scale {
            (Matrix3::identity(), identity_squared, false)
        } else {
            (fitted, fitted_squared, reflection_corrected)
        };
    let rmsd = (squared / reference.len() as f64).max(0.0).sqrt();

    tracing::trace!(points = reference.len(), rmsd = rmsd, "Superposition computed");

    Ok(Superposition {
        rotation,
        rmsd,
        reference_centroid,
        moving_centroid,
        singular_values,
        reflection_corrected,
        point_count: reference.len(),
    })
}

/// RMSD after optimal superposition
pub fn aligned_rmsd(reference: &PointSet, moving: &PointSet) -> Result<f64> {
    superpose(reference, moving).map(|s| s.rmsd)
}

/// RMSD of the coordinates as given, without centering or rotation
pub fn raw_rmsd(reference: &PointSet, moving: &PointSet) -> Result<f64> {
    if reference.len() != moving.len() {
        return Err(AnalysisError::mismatch(
            "rmsd point count",
            reference.len(),
            moving.len(),
        ));
    }
    if reference.is_empty() {
        return Err(AnalysisError::mismatch("rmsd point count", 1, 0));
    }
    let squared: f64 = reference
        .iter()
        .zip(moving.iter())
        .map(|(p, q)| (p - q).norm_squared())
        .sum();
    Ok((squared / reference.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> PointSet {
        PointSet::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 2.5],
            [0.7, 0.3, 1.1],
        ])
    }

    #[test]
    fn test_self_superposition_is_identity() {
        let set = tetrahedron();
        let result = superpose(&set, &set).unwrap();
        assert!(result.rmsd < 1e-10);
        assert!((result.rotation - Matrix3::identity()).norm() < 1e-8);
        assert!(!result.reflection_corrected);
    }

    #[test]
    fn test_collinear_self_superposition_is_identity() {
        for set in [
            PointSet::from_coords(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.5, 2.5, 2.5], [4.0, 4.0, 4.0]]),
            PointSet::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]),
        ] {
            let result = superpose(&set, &set).unwrap();
            assert!(result.rmsd < 1e-10);
            assert!((result.rotation - Matrix3::identity()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_collinear_rotated_set_still_aligns() {
        let line = PointSet::from_coords(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [3.0, 0.0, 0.0]]);
        let turned = PointSet::from_coords(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 3.0, 0.0]]);
        let result = superpose(&line, &turned).unwrap();
        assert!(result.rmsd < 1e-10);
        assert!((result.determinant() - 1.0).abs() < 1e-10);
        assert!(raw_rmsd(&line, &result.superimpose(&turned)).unwrap() < 1e-10);
    }

    #[test]
    fn test_single_point_has_zero_rmsd() {
        let a = PointSet::from_coords(&[[1.0, 2.0, 3.0]]);
        let b = PointSet::from_coords(&[[-4.0, 9.0, 0.5]]);
        let result = superpose(&a, &b).unwrap();
        assert!(result.rmsd < 1e-12);
        assert!((result.determinant() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_length_mismatch() {
        let a = tetrahedron();
        let b = PointSet::from_coords(&[[0.0, 0.0, 0.0]]);
        assert!(matches!(
            superpose(&a, &b),
            Err(AnalysisError::DimensionMismatch { expected: 5, found: 1, .. })
        ));
    }

    #[test]
    fn test_empty_sets_rejected() {
        let empty = PointSet::new(Vec::new());
        assert!(matches!(
            superpose(&empty, &empty),
            Err(AnalysisError::DimensionMismatch { .. })
        ));
        assert!(raw_rmsd(&empty, &empty).is_err());
    }

    #[test]
    fn test_pure_translation() {
        let set = tetrahedron();
        let shifted = set.translated(&Vector3::new(3.0, -1.0, 7.0));
        let result = superpose(&set, &shifted).unwrap();
        assert!(result.rmsd < 1e-10);
        assert!(raw_rmsd(&set, &shifted).unwrap() > 7.0);
    }

    #[test]
    fn test_superimpose_recovers_reference() {
        let set = tetrahedron();
        let angle: f64 = 0.8;
        let rot = Matrix3::new(
            angle.cos(), 0.0, angle.sin(),
            0.0, 1.0, 0.0,
            -angle.sin(), 0.0, angle.cos(),
        );
        let moved = set.transformed(&rot).translated(&Vector3::new(1.0, 2.0, 3.0));
        let result = superpose(&set, &moved).unwrap();
        let back = result.superimpose(&moved);
        assert!(raw_rmsd(&set, &back).unwrap() < 1e-8);
    }
}
