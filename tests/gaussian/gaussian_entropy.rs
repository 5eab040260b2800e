use approx::assert_abs_diff_eq;
use ndarray::{Array3, Axis, array, stack};
use std::f64::consts::{E, PI};

use hoinfo::estimators::approaches::gaussian::gaussian::{
    entropy_gauss, entropy_gauss_loop, entropy_gauss_nd,
};
use hoinfo::estimators::entropy::Entropy;
use hoinfo::estimators::traits::GlobalValue;
use hoinfo::{ErrorKind, InfoError};

use crate::test_helpers::{demeaned_sample, gaussian_array3};

#[test]
fn batched_entropy_matches_loop() {
    // (n_times, n_vars, n_trials)
    let x = gaussian_array3((6, 4, 300), 7);
    let batched = entropy_gauss_nd(x.view().into_dyn()).unwrap();
    let looped = entropy_gauss_loop(x.view()).unwrap();
    assert_eq!(batched.shape(), &[6]);
    for (b, l) in batched.iter().zip(looped.iter()) {
        assert_abs_diff_eq!(b, l, epsilon = 1e-10);
    }
}

#[test]
fn batched_entropy_keeps_all_leading_axes() {
    let x = gaussian_array3((3, 2, 200), 11);
    let y = stack(Axis(0), &[x.view(), x.view()]).unwrap(); // (2, 3, 2, 200)
    let h = entropy_gauss_nd(y.view().into_dyn()).unwrap();
    assert_eq!(h.shape(), &[2, 3]);
    let h3 = entropy_gauss_nd(x.view().into_dyn()).unwrap();
    for i in 0..3 {
        assert_abs_diff_eq!(h[[0, i]], h3[[i]], epsilon = 1e-12);
        assert_abs_diff_eq!(h[[1, i]], h3[[i]], epsilon = 1e-12);
    }

    // A single sample yields a 0-d result.
    let single = entropy_gauss_nd(x.index_axis(Axis(0), 0).into_dyn()).unwrap();
    assert_eq!(single.ndim(), 0);
    assert_abs_diff_eq!(single[[]], h3[[0]], epsilon = 1e-12);
}

#[test]
fn entropy_of_standard_normal_is_close_to_closed_form() {
    let x = demeaned_sample(2, 20_000, 3);
    let h = entropy_gauss(x.view()).unwrap();
    let expected = (2.0 * PI * E).ln();
    assert_abs_diff_eq!(h, expected, epsilon = 0.05);
}

#[test]
fn estimator_demeans_its_input() {
    let x = demeaned_sample(3, 500, 5);
    let shifted = x.mapv(|v| v + 10.0);
    let h0 = Entropy::new_gaussian(x).unwrap().global_value();
    let h1 = Entropy::new_gaussian(shifted).unwrap().global_value();
    assert_abs_diff_eq!(h0, h1, epsilon = 1e-9);
}

#[test]
fn duplicated_variable_is_not_positive_definite() {
    // Sample variance 4 for both rows, so the second Cholesky pivot is exactly 0.
    let row = [2.0, -2.0, 2.0, -2.0, 0.0];
    let x = array![row, row];
    let err = entropy_gauss(x.view()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NonPositiveDefiniteCovariance);

    let batch = Array3::from_shape_fn((3, 2, 5), |(b, v, t)| {
        if b == 2 { row[t] } else { row[t] * (1.0 + v as f64) + (t as f64 - 2.0) * v as f64 }
    });
    match entropy_gauss_nd(batch.view().into_dyn()).unwrap_err() {
        InfoError::NonPositiveDefiniteCovariance { shape, batch_index } => {
            assert_eq!(shape, vec![3, 2, 5]);
            assert_eq!(batch_index, vec![2]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn duplicated_random_row_is_not_positive_definite() {
    for seed in 0..200 {
        let row = demeaned_sample(1, 50, seed);
        let x = ndarray::concatenate(Axis(0), &[row.view(), row.view()]).unwrap();
        let err = entropy_gauss(x.view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonPositiveDefiniteCovariance, "seed {seed}");
    }

    // Same failure inside a batch, reported at its batch index.
    let row = demeaned_sample(1, 50, 3);
    let ok = demeaned_sample(2, 50, 4);
    let dup = ndarray::concatenate(Axis(0), &[row.view(), row.view()]).unwrap();
    let batch = stack(Axis(0), &[ok.view(), dup.view(), ok.view()]).unwrap();
    match entropy_gauss_nd(batch.view().into_dyn()).unwrap_err() {
        InfoError::NonPositiveDefiniteCovariance { batch_index, .. } => {
            assert_eq!(batch_index, vec![1]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn invalid_shapes_are_rejected() {
    let one_trial = Array3::<f64>::zeros((2, 2, 1));
    assert!(matches!(
        entropy_gauss_nd(one_trial.view().into_dyn()),
        Err(InfoError::InsufficientTrials { n_trials: 1 })
    ));
    let flat = ndarray::Array1::<f64>::zeros(4);
    assert_eq!(
        entropy_gauss_nd(flat.view().into_dyn()).unwrap_err().kind(),
        ErrorKind::Shape
    );
}
