//! Weight-vector arithmetic shared by the graph model and the evaluator.
//!
//! Vertex and hyperedge weights are multi-dimensional (one entry per resource
//! kind, e.g. LUTs, FFs, BRAM). Block balances are stored as a [`Matrix`] with
//! one row per block and one column per weight dimension.

/// A dense row-major matrix stored as a vector of rows.
pub type Matrix<T> = Vec<Vec<T>>;

/// Returns a `rows x cols` matrix filled with `T::default()`.
pub fn zero_matrix<T: Clone + Default>(rows: usize, cols: usize) -> Matrix<T> {
    vec![vec![T::default(); cols]; rows]
}

/// Dot product of two weight vectors.
///
/// Extra entries in the longer vector are ignored; callers validate
/// dimensions up front.
pub fn dot(factors: &[f64], weights: &[f64]) -> f64 {
    factors.iter().zip(weights).map(|(f, w)| f * w).sum()
}

/// Adds `rhs` into `lhs` element-wise.
pub fn add_assign(lhs: &mut [f64], rhs: &[f64]) {
    for (l, r) in lhs.iter_mut().zip(rhs) {
        *l += r;
    }
}

/// Subtracts `rhs` from `lhs` element-wise.
pub fn sub_assign(lhs: &mut [f64], rhs: &[f64]) {
    for (l, r) in lhs.iter_mut().zip(rhs) {
        *l -= r;
    }
}

/// Element-wise sum of two weight vectors.
pub fn add(lhs: &[f64], rhs: &[f64]) -> Vec<f64> {
    let mut out = lhs.to_vec();
    add_assign(&mut out, rhs);
    out
}

/// Returns `true` if every entry of `value` is at most the matching entry of `limit`.
pub fn fits_within(value: &[f64], limit: &[f64]) -> bool {
    value.iter().zip(limit).all(|(v, l)| v <= l)
}

/// Multiplies every entry of `weights` by `factor`.
pub fn scale(weights: &[f64], factor: f64) -> Vec<f64> {
    weights.iter().map(|w| w * factor).collect()
}

/// Sum over all dimensions of a weight vector.
pub fn weight_sum(weights: &[f64]) -> f64 {
    weights.iter().sum()
}
