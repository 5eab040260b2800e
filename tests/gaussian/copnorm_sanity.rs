use approx::assert_abs_diff_eq;
use ndarray::Axis;

use hoinfo::estimators::approaches::gaussian::copnorm::{GaussianCopula, Identity};
use hoinfo::estimators::traits::Normalizer;

use crate::test_helpers::gaussian_array3;

#[test]
fn copula_marginals_are_centered_and_shape_preserving() {
    let raw = gaussian_array3((101, 3, 4), 21).mapv(|v| v.exp());
    let x = GaussianCopula.normalize(raw.view()).unwrap();
    assert_eq!(x.dim(), raw.dim());
    // Every lane holds the same quantiles, which are symmetric around zero.
    let mean = x.mean_axis(Axis(0)).unwrap();
    for m in mean.iter() {
        assert_abs_diff_eq!(*m, 0.0, epsilon = 1e-10);
    }
}

#[test]
fn identity_is_a_copy() {
    let raw = gaussian_array3((10, 2, 3), 1);
    let x = Identity.normalize(raw.view()).unwrap();
    assert_eq!(x, raw);
}
