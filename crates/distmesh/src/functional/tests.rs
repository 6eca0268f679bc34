use super::*;
use nalgebra::dmatrix;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn circular_is_signed_distance() {
    let d = circular(1.0, None);
    let v = d.eval(&dmatrix![0.0, 0.0; 2.0, 0.0; 0.6, 0.8]);
    assert!(close(v[0], -1.0));
    assert!(close(v[1], 1.0));
    assert!(close(v[2], 0.0));

    let shifted = circular(0.5, Some(&[1.0, 1.0]));
    assert!(close(shifted.eval(&dmatrix![1.0, 1.5])[0], 0.0));
}

#[test]
fn circular_works_in_three_dimensions() {
    let d = circular(2.0, None);
    let v = d.eval(&dmatrix![0.0, 0.0, 2.0; 0.0, 0.0, 0.0]);
    assert!(close(v[0], 0.0));
    assert!(close(v[1], -2.0));
}

#[test]
fn elliptical_level_set() {
    let d = elliptical(&[2.0, 1.0], None);
    let v = d.eval(&dmatrix![2.0, 0.0; 0.0, 1.0; 0.0, 0.0]);
    assert!(close(v[0], 0.0));
    assert!(close(v[1], 0.0));
    assert!(close(v[2], -1.0));
}

#[test]
fn rectangular_inside_and_outside() {
    let d = rectangular(&dmatrix![-1.0, -2.0; 1.0, 2.0]);
    let v = d.eval(&dmatrix![0.0, 0.0; 0.5, 1.9; 1.5, 0.0; 1.0, 2.0]);
    assert!(close(v[0], -1.0));
    assert!(close(v[1], -0.1));
    assert!(close(v[2], 0.5));
    assert!(close(v[3], 0.0));
}

#[test]
fn polygon_distance_matches_square() {
    let square = dmatrix![-1.0, -1.0; 1.0, -1.0; 1.0, 1.0; -1.0, 1.0];
    let d = polygon(&square);
    let v = d.eval(&dmatrix![0.0, 0.0; 3.0, 0.0; 2.0, 2.0; 0.5, 0.25]);
    assert!(close(v[0], -1.0));
    assert!(close(v[1], 2.0));
    assert!(close(v[2], 2f64.sqrt()));
    assert!(close(v[3], -0.5));
}

#[test]
fn combinators_build_domains() {
    let bbox = dmatrix![-1.0, -1.0; 1.0, 1.0];
    // square with a circular hole
    let ring = rectangular(&bbox).diff(&circular(0.5, None));
    let v = ring.eval(&dmatrix![0.0, 0.0; 0.75, 0.0; 2.0, 0.0]);
    assert!(close(v[0], 0.5));
    assert!(close(v[1], -0.25));
    assert!(close(v[2], 1.0));

    // two disjoint disks
    let both = circular(0.5, Some(&[-1.0, 0.0])).union(&circular(0.5, Some(&[1.0, 0.0])));
    let w = both.eval(&dmatrix![-1.0, 0.0; 1.0, 0.0; 0.0, 0.0]);
    assert!(w[0] < 0.0 && w[1] < 0.0 && w[2] > 0.0);

    let lens = circular(1.0, Some(&[-0.5, 0.0])).intersect(&circular(1.0, Some(&[0.5, 0.0])));
    assert!(lens.eval(&dmatrix![0.0, 0.0])[0] < 0.0);
    assert!(lens.eval(&dmatrix![1.2, 0.0])[0] > 0.0);
}

#[test]
fn arithmetic_operators() {
    let x = Functional::new(|p: &DMatrix<f64>| DVector::from_fn(p.nrows(), |r, _| p[(r, 0)]));
    let pts = dmatrix![2.0, 0.0; -3.0, 0.0];
    let f = 0.05 + 0.3 * x.clone();
    assert!(close(f.eval(&pts)[0], 0.65));
    let g = (x.clone() - 1.0) / 2.0;
    assert!(close(g.eval(&pts)[1], -2.0));
    let h = &x * &x;
    assert!(close(h.eval(&pts)[1], 9.0));
    let n = -x.clone();
    assert!(close(n.eval(&pts)[0], -2.0));
    assert!(close(x.abs().eval(&pts)[1], 3.0));
    let m = x.min(&Functional::constant(0.0));
    assert!(close(m.eval(&pts)[0], 0.0));
    assert!(close((1.0 - x).eval(&pts)[0], -1.0));
}

#[test]
fn shift_and_rotate() {
    let d = rectangular(&dmatrix![-1.0, -0.25; 1.0, 0.25]);
    let moved = d.shift(&[2.0, 0.0]);
    assert!(close(moved.eval(&dmatrix![2.0, 0.0])[0], -0.25));
    let turned = d.rotate(std::f64::consts::FRAC_PI_2);
    // long axis now along y
    assert!(turned.eval(&dmatrix![0.0, 0.9])[0] < 0.0);
    assert!(turned.eval(&dmatrix![0.9, 0.0])[0] > 0.0);
}

#[test]
fn rotation_keeps_higher_axes() {
    let slab = rectangular(&dmatrix![-1.0, -0.25, -0.5; 1.0, 0.25, 0.5]);
    let turned = slab.rotate(std::f64::consts::FRAC_PI_2);
    assert!(turned.eval(&dmatrix![0.0, 0.9, 0.4])[0] < 0.0);
    assert!(turned.eval(&dmatrix![0.0, 0.9, 0.6])[0] > 0.0);
}

#[test]
fn planar_only_fields_give_nan_on_a_line() {
    let line = DMatrix::from_column_slice(2, 1, &[0.0, 0.5]);
    let turned = circular(1.0, None).rotate(0.3);
    assert!(turned.eval(&line).iter().all(|v| v.is_nan()));
    let square = polygon(&dmatrix![0.0, 0.0; 1.0, 0.0; 1.0, 1.0]);
    let v = square.eval(&line);
    assert_eq!(v.len(), 2);
    assert!(v.iter().all(|v| v.is_nan()));
}

#[test]
fn closures_are_evaluable() {
    let f = |p: &DMatrix<f64>| DVector::from_element(p.nrows(), 4.0);
    assert_eq!(f.eval(&dmatrix![0.0, 0.0]).len(), 1);
    assert!(close(uniform().eval(&dmatrix![5.0, 5.0])[0], 1.0));
}
