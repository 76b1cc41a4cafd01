//! Smith Normal Form computation.
//!
//! The Smith Normal Form (SNF) of an integer matrix A is a diagonal matrix D
//! such that:
//!   - D = U * A * V for unimodular matrices U, V
//!   - D[i,i] divides D[i+1,i+1] for all i
//!   - every D[i,i] is non-negative
//!
//! The diagonal entries are called the invariant factors and characterize
//! the abelian group `Z^n / rowspan(A)`.
//!
//! # Algorithm
//!
//! Classical elimination. The pivot is the smallest non-zero entry of the
//! trailing block. Entries of its row and column that it divides are
//! subtracted away; the others go through an extended-gcd combination,
//! which strictly shrinks the pivot. A row is folded into the pivot row
//! whenever the pivot fails to divide the rest of the block.

use toric_rings::traits::{EuclideanDomain, OrderedRing};

use crate::dense_matrix::DenseMatrix;

/// Result of Smith Normal Form computation.
#[derive(Clone, Debug)]
pub struct SmithNormalForm<R> {
    /// Non-zero diagonal entries (invariant factors) d_1, d_2, ..., d_r.
    /// Satisfies d_i | d_{i+1} for all i.
    pub invariant_factors: Vec<R>,
    /// Left transformation matrix U, with `D = U * A * V`.
    pub left_transform: Option<DenseMatrix<R>>,
    /// Right transformation matrix V.
    pub right_transform: Option<DenseMatrix<R>>,
    /// Rank of the matrix.
    pub rank: usize,
}

impl<R: EuclideanDomain + OrderedRing> SmithNormalForm<R> {
    /// Product of the invariant factors.
    #[must_use]
    pub fn determinant(&self) -> R {
        self.invariant_factors
            .iter()
            .fold(R::one(), |acc, d| acc * d.clone())
    }

    /// Invariant factors that are not units, i.e. the torsion part.
    #[must_use]
    pub fn torsion(&self) -> Vec<R> {
        self.invariant_factors
            .iter()
            .filter(|d| !d.is_one())
            .cloned()
            .collect()
    }
}

/// Computes the Smith Normal Form of a matrix over a Euclidean domain.
///
/// # Arguments
///
/// * `matrix` - The input matrix
/// * `compute_transforms` - Whether to compute the transformation matrices U and V
#[must_use]
pub fn smith_normal_form<R: EuclideanDomain + OrderedRing>(
    matrix: &DenseMatrix<R>,
    compute_transforms: bool,
) -> SmithNormalForm<R> {
    let m = matrix.num_rows();
    let n = matrix.num_cols();

    let mut a = matrix.clone();
    let mut u = compute_transforms.then(|| DenseMatrix::identity(m));
    let mut v = compute_transforms.then(|| DenseMatrix::identity(n));

    let mut rank = 0;

    for k in 0..m.min(n) {
        let Some((pi, pj)) = find_pivot(&a, k) else {
            break;
        };
        move_pivot(&mut a, &mut u, &mut v, k, (pi, pj));

        loop {
            clear_column(&mut a, &mut u, k);
            if clear_row(&mut a, &mut v, k) {
                // Column operations may have refilled column k.
                continue;
            }
            match find_non_divisible(&a, k) {
                Some(row) => {
                    let one = R::one();
                    a.add_scaled_row(k, row, &one);
                    if let Some(u) = u.as_mut() {
                        u.add_scaled_row(k, row, &one);
                    }
                }
                None => break,
            }
        }

        if a[(k, k)].is_negative() {
            let minus_one = -R::one();
            a.scale_row(k, &minus_one);
            if let Some(u) = u.as_mut() {
                u.scale_row(k, &minus_one);
            }
        }

        rank += 1;
    }

    let invariant_factors: Vec<R> = (0..rank).map(|i| a[(i, i)].clone()).collect();

    SmithNormalForm {
        invariant_factors,
        left_transform: u,
        right_transform: v,
        rank,
    }
}

/// Finds the non-zero entry of smallest absolute value in A[k:, k:].
fn find_pivot<R: OrderedRing>(a: &DenseMatrix<R>, k: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for i in k..a.num_rows() {
        for j in k..a.num_cols() {
            if a[(i, j)].is_zero() {
                continue;
            }
            let better = best.map_or(true, |(bi, bj)| a[(i, j)].abs() < a[(bi, bj)].abs());
            if better {
                best = Some((i, j));
            }
        }
    }
    best
}

fn move_pivot<R: EuclideanDomain>(
    a: &mut DenseMatrix<R>,
    u: &mut Option<DenseMatrix<R>>,
    v: &mut Option<DenseMatrix<R>>,
    k: usize,
    (pi, pj): (usize, usize),
) {
    a.swap_rows(k, pi);
    if let Some(u) = u.as_mut() {
        u.swap_rows(k, pi);
    }
    a.swap_cols(k, pj);
    if let Some(v) = v.as_mut() {
        v.swap_cols(k, pj);
    }
}

/// Zeroes column k below the pivot with unimodular row operations.
fn clear_column<R: EuclideanDomain>(a: &mut DenseMatrix<R>, u: &mut Option<DenseMatrix<R>>, k: usize) {
    for i in k + 1..a.num_rows() {
        if a[(i, k)].is_zero() {
            continue;
        }
        if a[(k, k)].divides(&a[(i, k)]) {
            let factor = -a[(i, k)].div(&a[(k, k)]);
            a.add_scaled_row(i, k, &factor);
            if let Some(u) = u.as_mut() {
                u.add_scaled_row(i, k, &factor);
            }
            continue;
        }
        // The gcd combination leaves a strictly smaller pivot.
        let (g, s, t) = a[(k, k)].extended_gcd(&a[(i, k)]);
        let p = a[(k, k)].div(&g);
        let q = -a[(i, k)].div(&g);
        a.combine_rows(k, i, [&s, &t, &q, &p]);
        if let Some(u) = u.as_mut() {
            u.combine_rows(k, i, [&s, &t, &q, &p]);
        }
    }
}

/// Zeroes row k right of the pivot with unimodular column operations.
///
/// Returns true if column k was refilled below the pivot.
fn clear_row<R: EuclideanDomain>(a: &mut DenseMatrix<R>, v: &mut Option<DenseMatrix<R>>, k: usize) -> bool {
    let mut changed = false;
    for j in k + 1..a.num_cols() {
        if a[(k, j)].is_zero() {
            continue;
        }
        if a[(k, k)].divides(&a[(k, j)]) {
            let factor = -a[(k, j)].div(&a[(k, k)]);
            a.add_scaled_col(j, k, &factor);
            if let Some(v) = v.as_mut() {
                v.add_scaled_col(j, k, &factor);
            }
            continue;
        }
        let (g, s, t) = a[(k, k)].extended_gcd(&a[(k, j)]);
        let p = a[(k, k)].div(&g);
        let q = -a[(k, j)].div(&g);
        a.combine_cols(k, j, [&s, &t, &q, &p]);
        if let Some(v) = v.as_mut() {
            v.combine_cols(k, j, [&s, &t, &q, &p]);
        }
        changed = true;
    }
    changed && (k + 1..a.num_rows()).any(|i| !a[(i, k)].is_zero())
}

/// Finds a row of the trailing block with an entry the pivot does not divide.
fn find_non_divisible<R: EuclideanDomain>(a: &DenseMatrix<R>, k: usize) -> Option<usize> {
    let pivot = &a[(k, k)];
    (k + 1..a.num_rows()).find(|&i| (k + 1..a.num_cols()).any(|j| !pivot.divides(&a[(i, j)])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use toric_rings::integers::Z;

    fn zm(rows: &[&[i64]]) -> DenseMatrix<Z> {
        DenseMatrix::from_rows(rows.iter().map(|r| r.iter().map(|&x| Z::new(x)).collect()).collect())
    }

    fn check_transforms(a: &DenseMatrix<Z>) -> SmithNormalForm<Z> {
        let snf = smith_normal_form(a, true);
        let u = snf.left_transform.clone().unwrap();
        let v = snf.right_transform.clone().unwrap();
        let d = u.mm(a).mm(&v);
        for i in 0..d.num_rows() {
            for j in 0..d.num_cols() {
                let expected = if i == j && i < snf.rank {
                    snf.invariant_factors[i].clone()
                } else {
                    Z::new(0)
                };
                assert_eq!(d[(i, j)], expected, "entry ({i}, {j})");
            }
        }
        snf
    }

    #[test]
    fn test_identity_snf() {
        let snf = check_transforms(&DenseMatrix::identity(3));
        assert_eq!(snf.rank, 3);
        assert!(snf.invariant_factors.iter().all(|d| *d == Z::new(1)));
    }

    #[test]
    fn test_zero_matrix_snf() {
        let snf = smith_normal_form(&DenseMatrix::<Z>::zeros(3, 3), false);
        assert_eq!(snf.rank, 0);
        assert!(snf.invariant_factors.is_empty());
        assert_eq!(snf.determinant(), Z::new(1));
    }

    #[test]
    fn test_snf_divisibility() {
        let snf = check_transforms(&zm(&[&[6, 0], &[0, 4]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(2), Z::new(12)]);
    }

    #[test]
    fn test_non_diagonal_snf() {
        let snf = check_transforms(&zm(&[&[1, 2], &[3, 4]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(1), Z::new(2)]);
        assert_eq!(snf.determinant(), Z::new(2));
        assert_eq!(snf.torsion(), vec![Z::new(2)]);
    }

    #[test]
    fn test_rectangular_snf() {
        let snf = check_transforms(&zm(&[&[2, 4, 4], &[-6, 6, 12], &[10, -4, -16]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(2), Z::new(6), Z::new(12)]);

        let snf = check_transforms(&zm(&[&[2, 0, 0]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(2)]);

        let snf = check_transforms(&zm(&[&[1, 1], &[1, -1], &[0, 2]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(1), Z::new(2)]);
    }

    #[test]
    fn test_relation_matrix_of_projective_plane() {
        // Pivot divides every entry: elimination must not swap columns.
        let snf = check_transforms(&zm(&[&[1, 0, -1], &[0, 1, -1]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(1), Z::new(1)]);
        assert!(snf.torsion().is_empty());

        let snf = check_transforms(&zm(&[&[2, 2, -9], &[0, 3, -14]]));
        assert_eq!(snf.rank, 2);
        assert_eq!(snf.determinant(), Z::new(1));
    }

    #[test]
    fn test_unit_pivot_with_negative_entries() {
        let snf = check_transforms(&zm(&[&[1, -1], &[-1, 1], &[1, 0]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(1), Z::new(1)]);
    }

    #[test]
    fn test_negative_entries_give_positive_factors() {
        let snf = check_transforms(&zm(&[&[-3]]));
        assert_eq!(snf.invariant_factors, vec![Z::new(3)]);
    }
}
