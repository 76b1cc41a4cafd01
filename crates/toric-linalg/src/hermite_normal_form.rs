//! Row-style Hermite Normal Form over a Euclidean domain.
//!
//! `H = U * A` with `U` unimodular, `H` in row echelon form, pivots
//! positive and the entries above each pivot reduced modulo it. The
//! non-zero rows of `H` are a canonical basis of the row lattice of `A`,
//! and the rows of `U` past the rank are a basis of its integer left kernel.

use toric_rings::traits::{EuclideanDomain, OrderedRing};

use crate::dense_matrix::DenseMatrix;

/// Result of a Hermite Normal Form computation.
#[derive(Clone, Debug)]
pub struct HermiteNormalForm<R> {
    /// The echelon form `H`.
    pub form: DenseMatrix<R>,
    /// The unimodular transform `U` with `H = U * A`.
    pub transform: DenseMatrix<R>,
    /// Pivot column of each non-zero row of `H`.
    pub pivots: Vec<usize>,
}

impl<R: EuclideanDomain + OrderedRing> HermiteNormalForm<R> {
    /// Rank of the input matrix.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// The non-zero rows of `H`: a basis of the row lattice.
    #[must_use]
    pub fn basis(&self) -> DenseMatrix<R> {
        let rows: Vec<usize> = (0..self.rank()).collect();
        self.form.select_rows(&rows)
    }

    /// Rows of `U` that map to zero: a basis of the left kernel.
    #[must_use]
    pub fn left_kernel(&self) -> DenseMatrix<R> {
        let rows: Vec<usize> = (self.rank()..self.transform.num_rows()).collect();
        self.transform.select_rows(&rows)
    }
}

/// Computes the row Hermite Normal Form of `matrix`.
#[must_use]
pub fn hermite_normal_form<R: EuclideanDomain + OrderedRing>(
    matrix: &DenseMatrix<R>,
) -> HermiteNormalForm<R> {
    let m = matrix.num_rows();
    let n = matrix.num_cols();

    let mut h = matrix.clone();
    let mut u = DenseMatrix::identity(m);
    let mut pivots = Vec::new();

    for col in 0..n {
        let r = pivots.len();
        if r == m {
            break;
        }
        let Some(first) = (r..m).find(|&i| !h[(i, col)].is_zero()) else {
            continue;
        };
        h.swap_rows(r, first);
        u.swap_rows(r, first);

        for i in r + 1..m {
            if h[(i, col)].is_zero() {
                continue;
            }
            let (g, s, t) = h[(r, col)].extended_gcd(&h[(i, col)]);
            let p = h[(r, col)].div(&g);
            let q = -h[(i, col)].div(&g);
            h.combine_rows(r, i, [&s, &t, &q, &p]);
            u.combine_rows(r, i, [&s, &t, &q, &p]);
        }

        if h[(r, col)].is_negative() {
            let minus_one = -R::one();
            h.scale_row(r, &minus_one);
            u.scale_row(r, &minus_one);
        }

        for i in 0..r {
            if h[(i, col)].is_zero() {
                continue;
            }
            let factor = -h[(i, col)].div(&h[(r, col)]);
            h.add_scaled_row(i, r, &factor);
            u.add_scaled_row(i, r, &factor);
        }

        pivots.push(col);
    }

    HermiteNormalForm {
        form: h,
        transform: u,
        pivots,
    }
}

/// A basis of `{x ∈ R^m : x * matrix = 0}`, itself in Hermite form.
#[must_use]
pub fn integer_left_kernel<R: EuclideanDomain + OrderedRing>(
    matrix: &DenseMatrix<R>,
) -> DenseMatrix<R> {
    let kernel = hermite_normal_form(matrix).left_kernel();
    hermite_normal_form(&kernel).basis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use toric_rings::integers::Z;
    use toric_rings::traits::Ring;

    fn zm(rows: &[&[i64]]) -> DenseMatrix<Z> {
        DenseMatrix::from_rows(rows.iter().map(|r| r.iter().map(|&x| Z::new(x)).collect()).collect())
    }

    #[test]
    fn test_hnf_shape() {
        let a = zm(&[&[2, 3, 6], &[3, 0, 1], &[4, 6, 12]]);
        let hnf = hermite_normal_form(&a);
        assert_eq!(hnf.rank(), 2);
        assert_eq!(hnf.transform.mm(&a), hnf.form);
        assert_eq!(hnf.form.row(2), &[Z::new(0), Z::new(0), Z::new(0)]);

        for (row, &col) in hnf.pivots.iter().enumerate() {
            let pivot = &hnf.form[(row, col)];
            assert!(pivot.is_positive());
            for above in 0..row {
                let entry = &hnf.form[(above, col)];
                assert!(!entry.is_negative() && entry < pivot);
            }
        }
    }

    #[test]
    fn test_hnf_of_unimodular_is_identity() {
        let hnf = hermite_normal_form(&zm(&[&[2, 1], &[1, 1]]));
        assert_eq!(hnf.form, DenseMatrix::identity(2));
    }

    #[test]
    fn test_hnf_row_lattice() {
        // Rows (2, 0) and (1, 1) span the index-2 sublattice.
        let hnf = hermite_normal_form(&zm(&[&[2, 0], &[1, 1]]));
        assert_eq!(hnf.basis(), zm(&[&[1, 1], &[0, 2]]));
    }

    #[test]
    fn test_integer_left_kernel() {
        let a = zm(&[&[2, 0, 0], &[1, 1, 0], &[0, 2, 0], &[4, 0, 0]]);
        let kernel = integer_left_kernel(&a);
        assert_eq!(kernel.num_rows(), 2);
        for row in kernel.rows() {
            assert!(a.vm(row).iter().all(Ring::is_zero));
        }
    }

    #[test]
    fn test_left_kernel_of_injective_map_is_empty() {
        let kernel = integer_left_kernel(&zm(&[&[1, 0, 0], &[0, 1, 0]]));
        assert_eq!((kernel.num_rows(), kernel.num_cols()), (0, 2));
    }
}
