//! Dense matrix inversion and conditioning
//!
//! Gauss-Jordan elimination with partial pivoting. The matrices handled
//! here are 2^n x 2^n confusion matrices with n rarely above 5, so a dense
//! direct method is the right tool.

use ndarray::{s, Array2};

use crate::error::{MitigationError, Result};

/// Pivot magnitude below which a matrix is treated as singular
const SINGULAR_PIVOT_EPS: f64 = 1e-12;

/// Invert a square matrix
///
/// Fails with `SingularMatrix` when a pivot vanishes; the caller decides
/// whether that means recalibration or a configuration bug.
pub fn invert(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let dim = matrix.nrows();
    if matrix.ncols() != dim || dim == 0 {
        return Err(MitigationError::Precondition(format!(
            "cannot invert a {}x{} matrix",
            matrix.nrows(),
            matrix.ncols()
        )));
    }

    // Augmented system [A | I]
    let mut aug = Array2::<f64>::zeros((dim, 2 * dim));
    aug.slice_mut(s![.., ..dim]).assign(matrix);
    for i in 0..dim {
        aug[[i, dim + i]] = 1.0;
    }

    for col in 0..dim {
        // Partial pivoting
        let mut pivot_row = col;
        for row in (col + 1)..dim {
            if aug[[row, col]].abs() > aug[[pivot_row, col]].abs() {
                pivot_row = row;
            }
        }
        if aug[[pivot_row, col]].abs() < SINGULAR_PIVOT_EPS {
            return Err(MitigationError::SingularMatrix);
        }
        if pivot_row != col {
            for j in 0..(2 * dim) {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        for j in 0..(2 * dim) {
            aug[[col, j]] /= pivot;
        }

        for row in 0..dim {
            if row == col {
                continue;
            }
            let factor = aug[[row, col]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..(2 * dim) {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    Ok(aug.slice(s![.., dim..]).to_owned())
}

/// Maximum absolute column sum
pub fn one_norm(matrix: &Array2<f64>) -> f64 {
    let mut max = 0.0;
    for column in matrix.columns() {
        let sum: f64 = column.iter().map(|v| v.abs()).sum();
        if sum > max {
            max = sum;
        }
    }
    max
}

/// 1-norm condition number, `f64::INFINITY` when the matrix is singular
pub fn condition_number(matrix: &Array2<f64>) -> f64 {
    match invert(matrix) {
        Ok(inverse) => one_norm(matrix) * one_norm(&inverse),
        Err(_) => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_invert_identity() {
        let identity = Array2::eye(4);
        let inverse = invert(&identity).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((inverse[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_invert_known_2x2() {
        let matrix = arr2(&[[0.9, 0.1], [0.1, 0.9]]);
        let inverse = invert(&matrix).unwrap();
        // det = 0.8, inverse = [[0.9, -0.1], [-0.1, 0.9]] / 0.8
        assert!((inverse[[0, 0]] - 1.125).abs() < 1e-12);
        assert!((inverse[[0, 1]] + 0.125).abs() < 1e-12);
        assert!((inverse[[1, 0]] + 0.125).abs() < 1e-12);
        assert!((inverse[[1, 1]] - 1.125).abs() < 1e-12);
    }

    #[test]
    fn test_invert_times_original_is_identity() {
        let matrix = arr2(&[
            [0.90, 0.05, 0.03, 0.02],
            [0.04, 0.88, 0.05, 0.03],
            [0.02, 0.06, 0.89, 0.03],
            [0.01, 0.04, 0.05, 0.90],
        ]);
        let inverse = invert(&matrix).unwrap();
        let product = inverse.dot(&matrix);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (product[[i, j]] - expected).abs() < 1e-10,
                    "product[{},{}] = {}",
                    i,
                    j,
                    product[[i, j]]
                );
            }
        }
    }

    #[test]
    fn test_invert_singular_fails() {
        let matrix = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
        assert!(matches!(
            invert(&matrix),
            Err(MitigationError::SingularMatrix)
        ));
    }

    #[test]
    fn test_invert_rejects_non_square() {
        let matrix = Array2::zeros((2, 3));
        assert!(matches!(
            invert(&matrix),
            Err(MitigationError::Precondition(_))
        ));
    }

    #[test]
    fn test_one_norm() {
        let matrix = arr2(&[[1.0, -2.0], [3.0, 4.0]]);
        // column sums: |1| + |3| = 4, |-2| + |4| = 6
        assert!((one_norm(&matrix) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_number_identity() {
        let identity = Array2::eye(8);
        assert!((condition_number(&identity) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_number_singular_is_infinite() {
        let matrix = arr2(&[[0.5, 0.5], [0.5, 0.5]]);
        assert!(condition_number(&matrix).is_infinite());
    }
}
