use approx::assert_abs_diff_eq;
use ndarray::{Array2, array, s};

use hoinfo::estimators::config::{
    FailurePolicy, PermutationEntropyConfig, PermutationEntropyMapConfig,
};
use hoinfo::estimators::entropy::Entropy;
use hoinfo::{ErrorKind, InfoError};

const REFERENCE_PE_BITS: f64 = 1.521_928_094_887_362_6;

fn raw_bits() -> PermutationEntropyConfig {
    PermutationEntropyConfig::new(3, 1).with_normalized(false)
}

#[test]
fn single_window_map_is_constant() {
    let row = [4.0, 7.0, 9.0, 10.0, 6.0, 11.0, 3.0];
    let x = Array2::from_shape_fn((3, 7), |(_, t)| row[t]);
    let cfg = PermutationEntropyMapConfig::new(1.0, 7.0).with_entropy(raw_bits());
    let map = Entropy::permutation_map(x.view(), &cfg).unwrap();
    assert_eq!(map.values.dim(), (3, 7));
    assert_eq!(map.windows, vec![0..7]);
    for v in map.values.iter() {
        assert_abs_diff_eq!(*v, REFERENCE_PE_BITS, epsilon = 1e-12);
    }
}

#[test]
fn windows_are_independent_and_remainder_stays_zero() {
    // Window 0 is monotone, window 1 is the reference series, window 2 alternates.
    let x = array![[
        0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, //
        4.0, 7.0, 9.0, 10.0, 6.0, 11.0, 3.0, //
        0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, //
        9.0, 9.0
    ]];
    let cfg = PermutationEntropyMapConfig::new(2.0, 3.5).with_entropy(raw_bits());
    let map = Entropy::permutation_map(x.view(), &cfg).unwrap();
    assert_eq!(map.windows, vec![0..7, 7..14, 14..21]);

    assert!(map.values.slice(s![0, 0..7]).iter().all(|&v| v == 0.0));
    for v in map.values.slice(s![0, 7..14]) {
        assert_abs_diff_eq!(*v, REFERENCE_PE_BITS, epsilon = 1e-12);
    }
    // Alternating: pattern [0, 2, 1] three times, [1, 0, 2] twice.
    let alternating = -(0.6 * 0.6f64.log2() + 0.4 * 0.4f64.log2());
    for v in map.values.slice(s![0, 14..21]) {
        assert_abs_diff_eq!(*v, alternating, epsilon = 1e-12);
    }
    assert_eq!(map.values[[0, 21]], 0.0);
    assert_eq!(map.values[[0, 22]], 0.0);
}

#[test]
fn short_windows_abort_by_default() {
    let x = Array2::from_shape_fn((2, 10), |(r, t)| (r * 10 + t) as f64);
    // 2.5 samples per window: windows of 2, 3, 2 and 3 samples.
    let cfg = PermutationEntropyMapConfig::new(1.0, 2.5);
    let err = Entropy::permutation_map(x.view(), &cfg).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);
    match err {
        InfoError::Window { row, window, source } => {
            assert_eq!((row, window), (0, 0));
            assert!(matches!(*source, InfoError::SeriesTooShort { len: 2, .. }));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn skipped_windows_are_nan() {
    let x = Array2::from_shape_fn((2, 10), |(r, t)| (r * 10 + t) as f64);
    let cfg = PermutationEntropyMapConfig::new(1.0, 2.5).with_failure_policy(FailurePolicy::Skip);
    let map = Entropy::permutation_map(x.view(), &cfg).unwrap();
    assert_eq!(map.skipped, vec![(0, 0), (0, 2), (1, 0), (1, 2)]);
    for row in map.values.rows() {
        assert!(row.slice(s![0..2]).iter().all(|v| v.is_nan()));
        assert!(row.slice(s![2..5]).iter().all(|&v| v == 0.0));
        assert!(row.slice(s![5..7]).iter().all(|v| v.is_nan()));
        assert!(row.slice(s![7..10]).iter().all(|&v| v == 0.0));
    }
}

#[test]
fn invalid_map_configuration_fails_before_computing() {
    let x = Array2::<f64>::zeros((1, 10));
    let cfg = PermutationEntropyMapConfig::new(1.0, 0.5);
    assert!(matches!(
        Entropy::permutation_map(x.view(), &cfg),
        Err(InfoError::InvalidWindow { .. })
    ));
}
