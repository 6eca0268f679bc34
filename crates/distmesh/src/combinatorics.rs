//! k-subsets of index sets, used to enumerate edges and facets of a simplex in
//! any dimension.

use nalgebra::DMatrix;

use crate::error::MeshError;

/// k-combinations of items (lexicographic in item position).
///
/// Returns an empty list when `k == 0` or `k > items.len()`.
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n || k == 0 {
        return Vec::new();
    }
    let mut idxs: Vec<usize> = (0..k).collect();
    let mut out = Vec::with_capacity(binomial(n, k));
    loop {
        out.push(idxs.iter().map(|&i| items[i]).collect());
        // rightmost position that can still advance
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            break;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
    out
}

/// Binomial coefficient C(n, k); 0 for `k > n`.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    // multiplicative form stays exact: each prefix product is itself a binomial
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}

/// All k-element subsets of `{0, …, n-1}` as a `(C(n,k), k)` table.
///
/// Rows are strictly increasing and the table is in lexicographic order.
/// Deterministic; rejects `k == 0` and `k > n`.
pub fn k_subsets(n: usize, k: usize) -> Result<DMatrix<usize>, MeshError> {
    if k == 0 || k > n {
        return Err(MeshError::InvalidSubsetSize { n, k });
    }
    let items: Vec<usize> = (0..n).collect();
    let rows = combinations(&items, k);
    Ok(DMatrix::from_fn(rows.len(), k, |r, c| rows[r][c]))
}
