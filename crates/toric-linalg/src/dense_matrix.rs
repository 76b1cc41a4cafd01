//! Dense matrices over an exact ring.
//!
//! The matrices in a toric computation are small (a handful of rows per
//! lattice or cone), so everything here is stored row-major in a single
//! `Vec` and manipulated in place.

use std::ops::{Add, Index, IndexMut, Sub};

use toric_rings::traits::{Field, Ring};

/// Dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DenseMatrix<R> {
    /// Matrix entries in row-major order.
    data: Vec<R>,
    /// Number of rows.
    num_rows: usize,
    /// Number of columns.
    num_cols: usize,
}

impl<R: Ring> DenseMatrix<R> {
    /// Creates a new matrix filled with zeros.
    #[must_use]
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![R::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from a list of rows.
    ///
    /// An empty list gives the `0 × 0` matrix; use [`Self::from_rows_with_cols`]
    /// when the column count must survive an empty row list.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<R>>) -> Self {
        let num_cols = rows.first().map_or(0, Vec::len);
        Self::from_rows_with_cols(num_cols, rows)
    }

    /// Creates a matrix with a fixed number of columns from a list of rows.
    ///
    /// # Panics
    ///
    /// Panics if some row does not have `num_cols` entries.
    #[must_use]
    pub fn from_rows_with_cols<I>(num_cols: usize, rows: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Vec<R>>,
    {
        let mut data = Vec::new();
        let mut num_rows = 0;
        for row in rows {
            let row = row.into();
            assert_eq!(row.len(), num_cols, "ragged matrix rows");
            data.extend(row);
            num_rows += 1;
        }
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = R::one();
        }
        m
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Returns true if every entry is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(Ring::is_zero)
    }

    /// Returns a reference to the entry at (row, col).
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&R> {
        if row < self.num_rows && col < self.num_cols {
            Some(&self.data[row * self.num_cols + col])
        } else {
            None
        }
    }

    /// Returns a slice of the specified row.
    #[must_use]
    pub fn row(&self, row: usize) -> &[R] {
        let start = row * self.num_cols;
        &self.data[start..start + self.num_cols]
    }

    /// Iterates over the rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[R]> + '_ {
        (0..self.num_rows).map(move |i| self.row(i))
    }

    /// Copies the rows out into owned vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<R>> {
        self.rows().map(<[R]>::to_vec).collect()
    }

    /// Returns a column as a vector.
    #[must_use]
    pub fn col(&self, col: usize) -> Vec<R> {
        (0..self.num_rows)
            .map(|row| self[(row, col)].clone())
            .collect()
    }

    /// Returns the matrix made of the given rows, in the given order.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self::from_rows_with_cols(self.num_cols, indices.iter().map(|&i| self.row(i).to_vec()))
    }

    /// Returns the matrix made of the given columns, in the given order.
    #[must_use]
    pub fn select_cols(&self, indices: &[usize]) -> Self {
        Self::from_rows_with_cols(
            indices.len(),
            self.rows()
                .map(|row| indices.iter().map(|&j| row[j].clone()).collect::<Vec<_>>()),
        )
    }

    /// Stacks `other` below `self`.
    ///
    /// # Panics
    ///
    /// Panics if the column counts differ.
    #[must_use]
    pub fn stack(&self, other: &Self) -> Self {
        assert_eq!(self.num_cols, other.num_cols);
        let mut data = self.data.clone();
        data.extend(other.data.iter().cloned());
        Self {
            data,
            num_rows: self.num_rows + other.num_rows,
            num_cols: self.num_cols,
        }
    }

    /// Applies `f` to every entry.
    #[must_use]
    pub fn map<S: Ring>(&self, f: impl Fn(&R) -> S) -> DenseMatrix<S> {
        DenseMatrix {
            data: self.data.iter().map(f).collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }

    /// Matrix-vector multiply: y = A * x.
    #[must_use]
    pub fn mv(&self, x: &[R]) -> Vec<R> {
        assert_eq!(x.len(), self.num_cols);
        (0..self.num_rows)
            .map(|row| dot(self.row(row), x))
            .collect()
    }

    /// Vector-matrix multiply: y = x * A.
    ///
    /// This is how lattice maps act on points.
    #[must_use]
    pub fn vm(&self, x: &[R]) -> Vec<R> {
        assert_eq!(x.len(), self.num_rows);
        let mut y = vec![R::zero(); self.num_cols];
        for (xi, row) in x.iter().zip(self.rows()) {
            if xi.is_zero() {
                continue;
            }
            for (yj, a) in y.iter_mut().zip(row) {
                *yj = yj.clone() + xi.clone() * a.clone();
            }
        }
        y
    }

    /// Matrix-matrix multiply: C = A * B.
    #[must_use]
    pub fn mm(&self, other: &Self) -> Self {
        assert_eq!(self.num_cols, other.num_rows);
        Self::from_rows_with_cols(other.num_cols, self.rows().map(|row| other.vm(row)))
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.num_cols, self.num_rows);
        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                result[(j, i)] = self[(i, j)].clone();
            }
        }
        result
    }

    /// Scales all entries by a scalar.
    #[must_use]
    pub fn scale(&self, scalar: &R) -> Self {
        self.map(|v| v.clone() * scalar.clone())
    }

    /// Swaps two rows in-place.
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let i_start = i * self.num_cols;
        let j_start = j * self.num_cols;
        for k in 0..self.num_cols {
            self.data.swap(i_start + k, j_start + k);
        }
    }

    /// Swaps two columns in-place.
    pub fn swap_cols(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for row in 0..self.num_rows {
            let start = row * self.num_cols;
            self.data.swap(start + i, start + j);
        }
    }

    /// Adds a scaled row to another: row[target] += scale * row[source].
    pub fn add_scaled_row(&mut self, target: usize, source: usize, scale: &R) {
        for k in 0..self.num_cols {
            let val = self[(source, k)].clone() * scale.clone();
            self[(target, k)] = self[(target, k)].clone() + val;
        }
    }

    /// Adds a scaled column to another: col[target] += scale * col[source].
    pub fn add_scaled_col(&mut self, target: usize, source: usize, scale: &R) {
        for k in 0..self.num_rows {
            let val = self[(k, source)].clone() * scale.clone();
            self[(k, target)] = self[(k, target)].clone() + val;
        }
    }

    /// Scales a row by a scalar.
    pub fn scale_row(&mut self, row: usize, scale: &R) {
        for k in 0..self.num_cols {
            self[(row, k)] = self[(row, k)].clone() * scale.clone();
        }
    }

    /// Replaces rows `i` and `j` by `(a·ri + b·rj, c·ri + d·rj)`.
    ///
    /// With `ad - bc` a unit this is an invertible row operation.
    pub fn combine_rows(&mut self, i: usize, j: usize, coeffs: [&R; 4]) {
        let [a, b, c, d] = coeffs;
        for k in 0..self.num_cols {
            let ri = self[(i, k)].clone();
            let rj = self[(j, k)].clone();
            self[(i, k)] = a.clone() * ri.clone() + b.clone() * rj.clone();
            self[(j, k)] = c.clone() * ri + d.clone() * rj;
        }
    }

    /// Replaces columns `i` and `j` by `(a·ci + b·cj, c·ci + d·cj)`.
    pub fn combine_cols(&mut self, i: usize, j: usize, coeffs: [&R; 4]) {
        let [a, b, c, d] = coeffs;
        for k in 0..self.num_rows {
            let ci = self[(k, i)].clone();
            let cj = self[(k, j)].clone();
            self[(k, i)] = a.clone() * ci.clone() + b.clone() * cj.clone();
            self[(k, j)] = c.clone() * ci + d.clone() * cj;
        }
    }
}

impl<R: Field> DenseMatrix<R> {
    /// Gaussian elimination.
    ///
    /// Returns (row-echelon form, transformation matrix, rank), where the
    /// transformation `T` satisfies `T * self == echelon`.
    #[must_use]
    pub fn row_echelon(&self) -> (Self, Self, usize) {
        let mut m = self.clone();
        let mut transform = Self::identity(self.num_rows);
        let mut pivot_row = 0;
        let mut pivot_col = 0;

        while pivot_row < m.num_rows && pivot_col < m.num_cols {
            let Some(found) = (pivot_row..m.num_rows).find(|&row| !m[(row, pivot_col)].is_zero())
            else {
                pivot_col += 1;
                continue;
            };

            if found != pivot_row {
                m.swap_rows(pivot_row, found);
                transform.swap_rows(pivot_row, found);
            }

            // Scale pivot row to make pivot = 1
            if let Some(inv) = m[(pivot_row, pivot_col)].inv() {
                m.scale_row(pivot_row, &inv);
                transform.scale_row(pivot_row, &inv);
            }

            for row in pivot_row + 1..m.num_rows {
                if !m[(row, pivot_col)].is_zero() {
                    let factor = -m[(row, pivot_col)].clone();
                    m.add_scaled_row(row, pivot_row, &factor);
                    transform.add_scaled_row(row, pivot_row, &factor);
                }
            }

            pivot_row += 1;
            pivot_col += 1;
        }

        (m, transform, pivot_row)
    }

    /// Reduced row echelon form using Gauss-Jordan elimination.
    #[must_use]
    pub fn rref(&self) -> (Self, Self, usize) {
        let (mut m, mut transform, rank) = self.row_echelon();

        for pivot_row in (0..rank).rev() {
            let Some(pivot_col) = (0..m.num_cols).find(|&col| !m[(pivot_row, col)].is_zero())
            else {
                continue;
            };
            for row in 0..pivot_row {
                if !m[(row, pivot_col)].is_zero() {
                    let factor = -m[(row, pivot_col)].clone();
                    m.add_scaled_row(row, pivot_row, &factor);
                    transform.add_scaled_row(row, pivot_row, &factor);
                }
            }
        }

        (m, transform, rank)
    }

    /// Returns the rank.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.row_echelon().2
    }

    /// A basis of `{x : A x = 0}`, one vector per free column.
    #[must_use]
    pub fn null_space(&self) -> Vec<Vec<R>> {
        let (rref, _, rank) = self.rref();
        let pivots: Vec<usize> = (0..rank)
            .filter_map(|row| (0..self.num_cols).find(|&col| !rref[(row, col)].is_zero()))
            .collect();

        (0..self.num_cols)
            .filter(|col| !pivots.contains(col))
            .map(|free| {
                let mut v = vec![R::zero(); self.num_cols];
                v[free] = R::one();
                for (row, &pivot) in pivots.iter().enumerate() {
                    v[pivot] = -rref[(row, free)].clone();
                }
                v
            })
            .collect()
    }

    /// The determinant of a square matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    #[must_use]
    pub fn det(&self) -> R {
        assert_eq!(self.num_rows, self.num_cols, "determinant of a non-square matrix");
        let n = self.num_rows;
        let mut m = self.clone();
        let mut det = R::one();

        for col in 0..n {
            let Some(pivot) = (col..n).find(|&row| !m[(row, col)].is_zero()) else {
                return R::zero();
            };
            if pivot != col {
                m.swap_rows(col, pivot);
                det = -det;
            }
            let lead = m[(col, col)].clone();
            let Some(inv) = lead.inv() else {
                return R::zero();
            };
            for row in col + 1..n {
                if !m[(row, col)].is_zero() {
                    let factor = -(m[(row, col)].clone() * inv.clone());
                    m.add_scaled_row(row, col, &factor);
                }
            }
            det = det * lead;
        }
        det
    }

    /// The inverse of a square matrix, if it is invertible.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        assert_eq!(self.num_rows, self.num_cols, "inverse of a non-square matrix");
        let (_, transform, rank) = self.rref();
        (rank == self.num_rows).then_some(transform)
    }

    /// Solves the linear system `A x = b`.
    ///
    /// Free variables are set to zero. Returns `None` if no solution exists.
    #[must_use]
    pub fn solve(&self, b: &[R]) -> Option<Vec<R>> {
        assert_eq!(b.len(), self.num_rows);

        // Augmented matrix [A | b]
        let mut aug = Self::zeros(self.num_rows, self.num_cols + 1);
        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                aug[(i, j)] = self[(i, j)].clone();
            }
            aug[(i, self.num_cols)] = b[i].clone();
        }

        let (rref, _, rank) = aug.rref();

        let mut x = vec![R::zero(); self.num_cols];
        for row in 0..rank {
            let pivot_col = (0..=self.num_cols).find(|&col| !rref[(row, col)].is_zero())?;
            if pivot_col == self.num_cols {
                // [0 ... 0 | c] with c != 0
                return None;
            }
            x[pivot_col] = rref[(row, self.num_cols)].clone();
        }

        Some(x)
    }

    /// Solves `x A = b` for a row vector `x`.
    #[must_use]
    pub fn solve_left(&self, b: &[R]) -> Option<Vec<R>> {
        self.transpose().solve(b)
    }
}

/// Inner product of two equally long slices.
#[must_use]
pub fn dot<R: Ring>(a: &[R], b: &[R]) -> R {
    a.iter()
        .zip(b)
        .fold(R::zero(), |acc, (x, y)| acc + x.clone() * y.clone())
}

impl<R> Index<(usize, usize)> for DenseMatrix<R> {
    type Output = R;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl<R> IndexMut<(usize, usize)> for DenseMatrix<R> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}

impl<R: Ring> Add for &DenseMatrix<R> {
    type Output = DenseMatrix<R>;

    fn add(self, other: Self) -> DenseMatrix<R> {
        assert_eq!(self.num_rows, other.num_rows);
        assert_eq!(self.num_cols, other.num_cols);

        DenseMatrix {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a.clone() + b.clone())
                .collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }
}

impl<R: Ring> Sub for &DenseMatrix<R> {
    type Output = DenseMatrix<R>;

    fn sub(self, other: Self) -> DenseMatrix<R> {
        assert_eq!(self.num_rows, other.num_rows);
        assert_eq!(self.num_cols, other.num_cols);

        DenseMatrix {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a.clone() - b.clone())
                .collect(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toric_rings::integers::Z;
    use toric_rings::rationals::Q;

    fn zm(rows: &[&[i64]]) -> DenseMatrix<Z> {
        DenseMatrix::from_rows(rows.iter().map(|r| r.iter().map(|&x| Z::new(x)).collect()).collect())
    }

    fn qm(rows: &[&[i64]]) -> DenseMatrix<Q> {
        zm(rows).map(|x| Q::from(x))
    }

    #[test]
    fn test_zeros_and_identity() {
        let m: DenseMatrix<Z> = DenseMatrix::zeros(3, 4);
        assert_eq!((m.num_rows(), m.num_cols()), (3, 4));
        assert!(m.is_zero());

        let id: DenseMatrix<Z> = DenseMatrix::identity(3);
        assert_eq!(id, zm(&[&[1, 0, 0], &[0, 1, 0], &[0, 0, 1]]));
    }

    #[test]
    fn test_empty_rows_keep_width() {
        let m: DenseMatrix<Z> = DenseMatrix::from_rows_with_cols(3, Vec::<Vec<Z>>::new());
        assert_eq!((m.num_rows(), m.num_cols()), (0, 3));
        assert_eq!(m.vm(&[]), vec![Z::new(0); 3]);
    }

    #[test]
    fn test_mv_and_vm() {
        let m = zm(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(m.mv(&[Z::new(1), Z::new(2), Z::new(3)]), vec![Z::new(14), Z::new(32)]);
        assert_eq!(m.vm(&[Z::new(1), Z::new(-1)]), vec![Z::new(-3), Z::new(-3), Z::new(-3)]);
    }

    #[test]
    fn test_mm() {
        let a = zm(&[&[1, 2], &[3, 4]]);
        let b = zm(&[&[5, 6], &[7, 8]]);
        assert_eq!(a.mm(&b), zm(&[&[19, 22], &[43, 50]]));
    }

    #[test]
    fn test_transpose_and_stack() {
        let m = zm(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(m.transpose(), zm(&[&[1, 4], &[2, 5], &[3, 6]]));
        assert_eq!(m.stack(&zm(&[&[7, 8, 9]])).num_rows(), 3);
        assert_eq!(m.select_rows(&[1, 0]), zm(&[&[4, 5, 6], &[1, 2, 3]]));
    }

    #[test]
    fn test_det() {
        assert_eq!(qm(&[&[3, 8], &[4, 6]]).det(), Q::from_integer(-14));
        assert_eq!(qm(&[&[0, 1, 0], &[1, 0, 0], &[0, 0, 2]]).det(), Q::from_integer(-2));
        assert_eq!(qm(&[&[1, 2], &[2, 4]]).det(), Q::from_integer(0));
    }

    #[test]
    fn test_inverse() {
        let m = qm(&[&[2, 1], &[1, 1]]);
        let inv = m.inverse().unwrap();
        assert_eq!(m.mm(&inv), DenseMatrix::identity(2));
        assert!(qm(&[&[1, 2], &[2, 4]]).inverse().is_none());
    }

    #[test]
    fn test_null_space() {
        let m = qm(&[&[1, 2, 3], &[2, 4, 6]]);
        let null = m.null_space();
        assert_eq!(null.len(), 2);
        for v in &null {
            assert!(m.mv(v).iter().all(Ring::is_zero));
        }
    }

    #[test]
    fn test_solve() {
        let a = qm(&[&[1, 2], &[3, 4]]);
        let x = a.solve(&[Q::from_integer(5), Q::from_integer(11)]).unwrap();
        assert_eq!(x, vec![Q::from_integer(1), Q::from_integer(2)]);

        let singular = qm(&[&[1, 1], &[1, 1]]);
        assert!(singular.solve(&[Q::from_integer(1), Q::from_integer(2)]).is_none());
    }

    #[test]
    fn test_solve_left() {
        // x * [[1, 0], [1, 1], [0, 1]] = [2, 3]
        let a = qm(&[&[1, 0], &[1, 1], &[0, 1]]);
        let b = [Q::from_integer(2), Q::from_integer(3)];
        let x = a.solve_left(&b).unwrap();
        assert_eq!(a.vm(&x), b.to_vec());
    }

    #[test]
    fn test_rank() {
        assert_eq!(qm(&[&[1, 2, 3], &[2, 4, 6]]).rank(), 1);
        assert_eq!(qm(&[&[1, 0], &[0, 1], &[1, 1]]).rank(), 2);
        assert_eq!(DenseMatrix::<Q>::zeros(0, 4).rank(), 0);
    }

    #[test]
    fn test_combine_rows_is_invertible_op() {
        let mut m = zm(&[&[2, 3], &[5, 7]]);
        let (a, b, c, d) = (Z::new(2), Z::new(-1), Z::new(-5), Z::new(3));
        m.combine_rows(0, 1, [&a, &b, &c, &d]);
        assert_eq!(m, zm(&[&[-1, -1], &[5, 6]]));
    }
}
