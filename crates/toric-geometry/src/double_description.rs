//! Exact double description over the integers.
//!
//! Converts the H-description `{x : ⟨a_i, x⟩ ≥ 0, ⟨e_j, x⟩ = 0}` of a
//! polyhedral cone into its V-description: a basis of the lineality space
//! and the extreme rays modulo that space.
//!
//! All vectors stay integral. Every combination step is followed by a
//! primitive normalization, so coefficients never grow beyond what the
//! input forces. Adjacency of two rays is decided combinatorially from the
//! sets of inequalities they make tight.

use rustc_hash::FxHashSet;
use toric_lattice::LatticePoint;
use toric_rings::{OrderedRing, Ring, Z};
use tracing::trace;

/// Output of a double description run.
#[derive(Clone, Debug, Default)]
pub struct DoubleDescription {
    /// Basis of the lineality space, primitive vectors.
    pub lineality: Vec<LatticePoint>,
    /// Extreme rays modulo the lineality space, primitive and distinct.
    pub rays: Vec<LatticePoint>,
}

/// Computes lineality and extreme rays of `{x ∈ R^dim : ⟨a, x⟩ ≥ 0, ⟨e, x⟩ = 0}`.
///
/// Equations are processed first, then the inequalities in the given order.
#[must_use]
pub fn double_description(
    dim: usize,
    inequalities: &[LatticePoint],
    equations: &[LatticePoint],
) -> DoubleDescription {
    let mut state = State::new(dim, inequalities.len());
    for e in equations {
        debug_assert_eq!(e.dim(), dim);
        state.add_equation(e);
    }
    for (k, a) in inequalities.iter().enumerate() {
        debug_assert_eq!(a.dim(), dim);
        state.add_inequality(k, a);
    }

    trace!(
        dim,
        inequalities = inequalities.len(),
        equations = equations.len(),
        lineality = state.lineality.len(),
        rays = state.rays.len(),
        "double description finished"
    );

    DoubleDescription {
        lineality: state.lineality,
        rays: state.rays.into_iter().map(|r| r.vector).collect(),
    }
}

/// Set of inequality indices a ray makes tight.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ZeroSet(Vec<u64>);

impl ZeroSet {
    fn empty(words: usize) -> Self {
        Self(vec![0; words])
    }

    /// The set `{0, ..., k - 1}`.
    fn prefix(words: usize, k: usize) -> Self {
        let mut set = Self::empty(words);
        for i in 0..k {
            set.insert(i);
        }
        set
    }

    fn insert(&mut self, i: usize) {
        self.0[i / 64] |= 1 << (i % 64);
    }

    fn intersection(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a & b).collect())
    }

    fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().zip(&other.0).all(|(a, b)| a & !b == 0)
    }
}

#[derive(Clone, Debug)]
struct Ray {
    vector: LatticePoint,
    zeros: ZeroSet,
}

struct State {
    words: usize,
    lineality: Vec<LatticePoint>,
    rays: Vec<Ray>,
}

impl State {
    fn new(dim: usize, num_inequalities: usize) -> Self {
        Self {
            words: num_inequalities.div_ceil(64).max(1),
            lineality: (0..dim).map(|i| LatticePoint::unit(dim, i)).collect(),
            rays: Vec::new(),
        }
    }

    /// Uses a line not orthogonal to `a` to make every other generator
    /// orthogonal to `a`. Returns that line, oriented so `⟨a, l⟩ > 0`.
    fn eliminate_line(&mut self, a: &LatticePoint) -> Option<LatticePoint> {
        let pos = self.lineality.iter().position(|l| !a.dot(l).is_zero())?;
        let mut l0 = self.lineality.swap_remove(pos);
        let mut s = a.dot(&l0);
        if s.is_negative() {
            l0 = -l0;
            s = -s;
        }

        for l in &mut self.lineality {
            let t = a.dot(l);
            if !t.is_zero() {
                *l = combine(&s, l, &t, &l0);
            }
        }
        for r in &mut self.rays {
            let t = a.dot(&r.vector);
            if !t.is_zero() {
                r.vector = combine(&s, &r.vector, &t, &l0);
            }
        }
        Some(l0)
    }

    fn add_equation(&mut self, e: &LatticePoint) {
        if self.eliminate_line(e).is_none() {
            self.cut(None, e, false);
        }
    }

    fn add_inequality(&mut self, k: usize, a: &LatticePoint) {
        if let Some(l0) = self.eliminate_line(a) {
            for r in &mut self.rays {
                r.zeros.insert(k);
            }
            self.rays.push(Ray {
                vector: l0,
                zeros: ZeroSet::prefix(self.words, k),
            });
            return;
        }
        self.cut(Some(k), a, true);
    }

    /// Intersects the current cone with `⟨a, x⟩ ≥ 0` (or `= 0` when
    /// `keep_positive` is false).
    fn cut(&mut self, k: Option<usize>, a: &LatticePoint, keep_positive: bool) {
        let values: Vec<Z> = self.rays.iter().map(|r| a.dot(&r.vector)).collect();
        let (mut pos, mut zero, mut neg) = (Vec::new(), Vec::new(), Vec::new());
        for (i, v) in values.iter().enumerate() {
            match v.signum() {
                1 => pos.push(i),
                0 => zero.push(i),
                _ => neg.push(i),
            }
        }
        if neg.is_empty() && (keep_positive || pos.is_empty()) {
            if let Some(k) = k {
                for &i in &zero {
                    self.rays[i].zeros.insert(k);
                }
            }
            return;
        }

        let mut next: Vec<Ray> = Vec::new();
        let mut seen: FxHashSet<LatticePoint> = FxHashSet::default();

        for &p in &pos {
            for &n in &neg {
                let common = self.rays[p].zeros.intersection(&self.rays[n].zeros);
                if !self.adjacent(p, n, &common) {
                    continue;
                }
                let vector = combine(
                    &values[p],
                    &self.rays[n].vector,
                    &values[n],
                    &self.rays[p].vector,
                );
                if vector.is_zero() || !seen.insert(vector.clone()) {
                    continue;
                }
                let mut zeros = common;
                if let Some(k) = k {
                    zeros.insert(k);
                }
                next.push(Ray { vector, zeros });
            }
        }

        let mut kept: Vec<Ray> = Vec::with_capacity(pos.len() + zero.len() + next.len());
        if keep_positive {
            kept.extend(pos.iter().map(|&i| self.rays[i].clone()));
        }
        for &i in &zero {
            let mut ray = self.rays[i].clone();
            if let Some(k) = k {
                ray.zeros.insert(k);
            }
            kept.push(ray);
        }
        for ray in next {
            if !kept.iter().any(|r| r.vector == ray.vector) {
                kept.push(ray);
            }
        }

        trace!(
            positive = pos.len(),
            zero = zero.len(),
            negative = neg.len(),
            result = kept.len(),
            "double description cut"
        );
        self.rays = kept;
    }

    /// Two rays are adjacent when no third ray is tight on everything
    /// they are both tight on.
    fn adjacent(&self, p: usize, n: usize, common: &ZeroSet) -> bool {
        self.rays
            .iter()
            .enumerate()
            .all(|(i, r)| i == p || i == n || !common.is_subset(&r.zeros))
    }
}

/// `(s·x − t·y)` made primitive.
fn combine(s: &Z, x: &LatticePoint, t: &Z, y: &LatticePoint) -> LatticePoint {
    (&x.scale(s) - &y.scale(t)).primitive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(coords: &[i64]) -> LatticePoint {
        LatticePoint::from_i64s(coords)
    }

    fn sorted(mut v: Vec<LatticePoint>) -> Vec<LatticePoint> {
        v.sort();
        v
    }

    #[test]
    fn test_positive_orthant() {
        let dd = double_description(3, &[p(&[1, 0, 0]), p(&[0, 1, 0]), p(&[0, 0, 1])], &[]);
        assert!(dd.lineality.is_empty());
        assert_eq!(
            sorted(dd.rays),
            vec![p(&[0, 0, 1]), p(&[0, 1, 0]), p(&[1, 0, 0])]
        );
    }

    #[test]
    fn test_whole_space() {
        let dd = double_description(2, &[], &[]);
        assert_eq!(dd.lineality.len(), 2);
        assert!(dd.rays.is_empty());
    }

    #[test]
    fn test_half_plane() {
        let dd = double_description(2, &[p(&[1, 0])], &[]);
        assert_eq!(dd.lineality.len(), 1);
        assert!(dd.lineality[0][0].is_zero());
        assert_eq!(dd.rays.len(), 1);
        assert!(dd.rays[0][0].is_positive());
    }

    #[test]
    fn test_square_pyramid() {
        // Dual of the cone over a square has four rays.
        let ineq = [p(&[1, 0, 1]), p(&[-1, 0, 1]), p(&[0, 1, 1]), p(&[0, -1, 1])];
        let dd = double_description(3, &ineq, &[]);
        assert!(dd.lineality.is_empty());
        assert_eq!(
            sorted(dd.rays),
            vec![p(&[-1, -1, 1]), p(&[-1, 1, 1]), p(&[1, -1, 1]), p(&[1, 1, 1])]
        );
    }

    #[test]
    fn test_equation_cuts_down() {
        // x, y, z >= 0 and x = y.
        let ineq = [p(&[1, 0, 0]), p(&[0, 1, 0]), p(&[0, 0, 1])];
        let dd = double_description(3, &ineq, &[p(&[1, -1, 0])]);
        assert!(dd.lineality.is_empty());
        assert_eq!(sorted(dd.rays), vec![p(&[0, 0, 1]), p(&[1, 1, 0])]);
    }

    #[test]
    fn test_empty_interior_is_origin() {
        // x >= 0 and -x >= 0 on the line.
        let dd = double_description(1, &[p(&[1]), p(&[-1])], &[]);
        assert!(dd.lineality.is_empty());
        assert!(dd.rays.is_empty());
    }
}
