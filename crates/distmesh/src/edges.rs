//! Edge and facet extraction from simplex tables, generic in dimension.
//!
//! A simplex row has `D + 1` vertices; its edges are the 2-subsets and its
//! facets the `D`-subsets of that row. Sub-faces are canonicalized by sorting
//! their indices, so permuted duplicates collapse.

use std::collections::{BTreeSet, HashMap};

use nalgebra::DMatrix;

use crate::combinatorics::combinations;

fn sorted_row(simplices: &DMatrix<usize>, r: usize) -> Vec<usize> {
    let mut row: Vec<usize> = simplices.row(r).iter().copied().collect();
    row.sort_unstable();
    row
}

fn to_table(rows: &[Vec<usize>], width: usize) -> DMatrix<usize> {
    DMatrix::from_fn(rows.len(), width, |r, c| rows[r][c])
}

/// Unique unordered edges of a simplex table as an `(E, 2)` table.
///
/// Each row is `(low, high)`; rows are in ascending lexicographic order.
/// Repeated indices inside a simplex row (degenerate input) never produce a
/// self-loop.
pub fn unique_edges(simplices: &DMatrix<usize>) -> DMatrix<usize> {
    let mut set = BTreeSet::new();
    for r in 0..simplices.nrows() {
        let row = sorted_row(simplices, r);
        for pair in combinations(&row, 2) {
            if pair[0] != pair[1] {
                set.insert((pair[0], pair[1]));
            }
        }
    }
    let edges: Vec<Vec<usize>> = set.into_iter().map(|(a, b)| vec![a, b]).collect();
    to_table(&edges, 2)
}

/// Facets that belong to exactly one simplex, as a `(B, D)` table.
///
/// Rows are sorted ascending and appear in the order their facet is first met
/// while scanning simplices top to bottom. An empty or single-column table
/// yields no facets.
pub fn boundary_edges(simplices: &DMatrix<usize>) -> DMatrix<usize> {
    let k = simplices.ncols().saturating_sub(1);
    if k == 0 {
        return DMatrix::zeros(0, k);
    }
    let mut counts: HashMap<Vec<usize>, usize> = HashMap::new();
    let mut order: Vec<Vec<usize>> = Vec::new();
    for r in 0..simplices.nrows() {
        let row = sorted_row(simplices, r);
        for facet in combinations(&row, k) {
            let n = counts.entry(facet.clone()).or_insert(0);
            if *n == 0 {
                order.push(facet);
            }
            *n += 1;
        }
    }
    let boundary: Vec<Vec<usize>> = order.into_iter().filter(|f| counts[f] == 1).collect();
    to_table(&boundary, k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(rows: &[&[usize]]) -> DMatrix<usize> {
        let w = rows.first().map_or(0, |r| r.len());
        DMatrix::from_fn(rows.len(), w, |r, c| rows[r][c])
    }

    fn rows(t: &DMatrix<usize>) -> Vec<Vec<usize>> {
        (0..t.nrows())
            .map(|r| t.row(r).iter().copied().collect())
            .collect()
    }

    #[test]
    fn single_triangle() {
        let t = table(&[&[2, 0, 1]]);
        assert_eq!(rows(&unique_edges(&t)), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
        assert_eq!(boundary_edges(&t).nrows(), 3);
    }

    #[test]
    fn shared_edge_is_interior() {
        let t = table(&[&[0, 1, 2], &[2, 1, 3]]);
        assert_eq!(unique_edges(&t).nrows(), 5);
        let b = rows(&boundary_edges(&t));
        assert_eq!(b.len(), 4);
        assert!(!b.contains(&vec![1, 2]));
        assert_eq!(b, vec![vec![0, 1], vec![0, 2], vec![1, 3], vec![2, 3]]);
    }

    #[test]
    fn disjoint_triangles_keep_all_facets() {
        let t = table(&[&[0, 1, 2], &[3, 4, 5]]);
        assert_eq!(boundary_edges(&t).nrows(), 6);
        assert_eq!(unique_edges(&t).nrows(), 6);
    }

    #[test]
    fn tetrahedra_faces() {
        let one = table(&[&[0, 1, 2, 3]]);
        assert_eq!(unique_edges(&one).nrows(), 6);
        let b = boundary_edges(&one);
        assert_eq!((b.nrows(), b.ncols()), (4, 3));

        // two tetrahedra glued on face {1, 2, 3}, listed in different orders
        let two = table(&[&[0, 1, 2, 3], &[3, 2, 4, 1]]);
        let b = rows(&boundary_edges(&two));
        assert_eq!(b.len(), 6);
        assert!(!b.contains(&vec![1, 2, 3]));
        assert_eq!(unique_edges(&two).nrows(), 9);
    }

    #[test]
    fn empty_and_degenerate_tables() {
        let empty: DMatrix<usize> = DMatrix::zeros(0, 3);
        assert_eq!(unique_edges(&empty).nrows(), 0);
        assert_eq!(boundary_edges(&empty).nrows(), 0);
        let repeated = table(&[&[4, 4, 4]]);
        assert_eq!(unique_edges(&repeated).nrows(), 0);
    }

    proptest! {
        #[test]
        fn prop_unique_edges_have_no_duplicates(
            raw in proptest::collection::vec(proptest::collection::vec(0usize..8, 3), 0..12)
        ) {
            let t = DMatrix::from_fn(raw.len(), 3, |r, c| raw[r][c]);
            let e = unique_edges(&t);
            let mut seen = std::collections::HashSet::new();
            for r in 0..e.nrows() {
                let (a, b) = (e[(r, 0)], e[(r, 1)]);
                prop_assert!(a < b);
                prop_assert!(seen.insert((a, b)));
            }
            for row in &raw {
                for i in 0..3 {
                    for j in i + 1..3 {
                        if row[i] != row[j] {
                            let key = (row[i].min(row[j]), row[i].max(row[j]));
                            prop_assert!(seen.contains(&key));
                        }
                    }
                }
            }
        }
    }
}
