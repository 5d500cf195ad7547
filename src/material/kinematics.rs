use crate::StrError;
use russell_lab::{mat_inverse, Matrix};

/// Returns the Kronecker delta δᵢⱼ
#[inline]
pub(crate) fn delta(i: usize, j: usize) -> f64 {
    if i == j {
        1.0
    } else {
        0.0
    }
}

/// Returns the row/column of the (i,j) index pair in the 9×9 matrix representation of fourth-order tensors
#[inline]
pub(crate) fn pair(i: usize, j: usize) -> usize {
    3 * i + j
}

/// Computes the deformation gradient F = I + H and its inverse
///
/// Returns the determinant J = det(F)
///
/// # Output
///
/// * `ff` -- (3×3) the deformation gradient
/// * `ff_inv` -- (3×3) the inverse of the deformation gradient
///
/// # Input
///
/// * `du_dx` -- (3×3) the displacement gradient H
pub fn deformation_gradient(ff: &mut Matrix, ff_inv: &mut Matrix, du_dx: &Matrix) -> Result<f64, StrError> {
    for i in 0..3 {
        for j in 0..3 {
            ff.set(i, j, delta(i, j) + du_dx.get(i, j));
        }
    }
    let det = mat_inverse(ff_inv, ff)?;
    if det <= 0.0 {
        return Err("the deformation gradient must have a positive determinant");
    }
    Ok(det)
}

/// Converts the Kirchhoff stress τ into the first Piola-Kirchhoff stress P = τ · F⁻ᵀ
pub fn kirchhoff_to_piola(pp: &mut Matrix, tau: &Matrix, ff_inv: &Matrix) {
    for i in 0..3 {
        for jj in 0..3 {
            let mut sum = 0.0;
            for m in 0..3 {
                sum += tau.get(i, m) * ff_inv.get(jj, m);
            }
            pp.set(i, jj, sum);
        }
    }
}

/// Computes the tangent of the first Piola-Kirchhoff stress with respect to the displacement gradient
///
/// ```text
/// ∂Pᵢⱼ     ∂τᵢₘ
/// ———— = Σₘ ———— F⁻¹ⱼₘ  -  F⁻¹ⱼₖ Pᵢₗ
/// ∂Hₖₗ     ∂Hₖₗ
/// ```
///
/// # Output
///
/// * `aa` -- (9×9) the tangent ∂P/∂H
///
/// # Input
///
/// * `dtau` -- (9×9) the tangent ∂τ/∂H
/// * `pp` -- (3×3) the first Piola-Kirchhoff stress
/// * `ff_inv` -- (3×3) the inverse of the deformation gradient
pub fn piola_tangent(aa: &mut Matrix, dtau: &Matrix, pp: &Matrix, ff_inv: &Matrix) {
    for i in 0..3 {
        for jj in 0..3 {
            for k in 0..3 {
                for ll in 0..3 {
                    let mut sum = 0.0;
                    for m in 0..3 {
                        sum += dtau.get(pair(i, m), pair(k, ll)) * ff_inv.get(jj, m);
                    }
                    aa.set(pair(i, jj), pair(k, ll), sum - ff_inv.get(jj, k) * pp.get(i, ll));
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
