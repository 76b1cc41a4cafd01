//! Property-based tests for the integer normal forms.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use toric_rings::{EuclideanDomain, Ring, Z};

    use crate::{hermite_normal_form, integer_left_kernel, smith_normal_form, DenseMatrix};

    // Strategy for small integer matrices with up to 4 rows and columns
    fn small_matrix() -> impl Strategy<Value = DenseMatrix<Z>> {
        (1usize..=4, 1usize..=4).prop_flat_map(|(m, n)| {
            prop::collection::vec(prop::collection::vec(-6i64..=6, n), m).prop_map(move |rows| {
                DenseMatrix::from_rows_with_cols(
                    n,
                    rows.into_iter()
                        .map(|r| r.into_iter().map(Z::new).collect::<Vec<_>>()),
                )
            })
        })
    }

    proptest! {
        #[test]
        fn hnf_transform_reproduces_form(a in small_matrix()) {
            let hnf = hermite_normal_form(&a);
            prop_assert_eq!(hnf.transform.mm(&a), hnf.form.clone());
            for row in hnf.rank()..a.num_rows() {
                prop_assert!(hnf.form.row(row).iter().all(Ring::is_zero));
            }
        }

        #[test]
        fn left_kernel_annihilates(a in small_matrix()) {
            let kernel = integer_left_kernel(&a);
            let rank = hermite_normal_form(&a).rank();
            prop_assert_eq!(kernel.num_rows(), a.num_rows() - rank);
            for row in kernel.rows() {
                prop_assert!(a.vm(row).iter().all(Ring::is_zero));
            }
        }

        #[test]
        fn snf_diagonalizes(a in small_matrix()) {
            let snf = smith_normal_form(&a, true);
            let u = snf.left_transform.clone().unwrap();
            let v = snf.right_transform.clone().unwrap();
            let d = u.mm(&a).mm(&v);
            for i in 0..d.num_rows() {
                for j in 0..d.num_cols() {
                    if i == j && i < snf.rank {
                        prop_assert_eq!(&d[(i, j)], &snf.invariant_factors[i]);
                    } else {
                        prop_assert!(d[(i, j)].is_zero());
                    }
                }
            }
            for pair in snf.invariant_factors.windows(2) {
                prop_assert!(pair[0].divides(&pair[1]));
            }
        }

        #[test]
        fn snf_and_hnf_agree_on_rank(a in small_matrix()) {
            prop_assert_eq!(smith_normal_form(&a, false).rank, hermite_normal_form(&a).rank());
        }
    }
}
