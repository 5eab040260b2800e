use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};

use hoinfo::estimators::approaches::ordinal::ordinal_utils::{
    PatternDistribution, lehmer_code, ordinal_patterns, ordinal_patterns_with_probs,
    symbolize_series, window_count,
};
use hoinfo::{ErrorKind, InfoError};

use crate::test_helpers::{Distribution, Normal, SeedableRng, StdRng};

#[test]
fn patterns_of_the_reference_series() {
    let series = array![4.0, 7.0, 9.0, 10.0, 6.0, 11.0, 3.0];
    let (patterns, dist) = ordinal_patterns_with_probs(series.view(), 3, 1).unwrap();
    assert_eq!(
        patterns,
        array![[0, 1, 2], [0, 1, 2], [1, 2, 0], [1, 0, 2], [1, 2, 0]]
    );
    // Distinct patterns are listed in lexicographic order.
    assert_eq!(dist.patterns, array![[0, 1, 2], [1, 0, 2], [1, 2, 0]]);
    assert_eq!(dist.counts, vec![2, 1, 2]);
    for (p, e) in dist.probs.iter().zip([0.4, 0.2, 0.4]) {
        assert_abs_diff_eq!(*p, e, epsilon = 1e-12);
    }
    assert_eq!(dist.inverse, vec![0, 0, 2, 1, 2]);
    assert_eq!(dist.n_windows, 5);
}

#[test]
fn delay_skips_samples() {
    // tau = 2: windows (x0, x2), (x1, x3), (x2, x4)
    let series = array![1.0, 5.0, 2.0, 4.0, 3.0];
    let patterns = ordinal_patterns(series.view(), 2, 2).unwrap();
    assert_eq!(patterns, array![[0, 1], [1, 0], [0, 1]]);
}

#[test]
fn ties_rank_by_position() {
    let series = array![1.0, 1.0, 2.0, 2.0];
    let patterns = ordinal_patterns(series.view(), 2, 1).unwrap();
    assert_eq!(patterns, array![[0, 1], [0, 1], [0, 1]]);
}

#[test]
fn symbols_are_lehmer_codes_of_patterns() {
    let series = array![3.0, 1.0, 2.0, 5.0, 4.0, 0.0, 6.0];
    let patterns = ordinal_patterns(series.view(), 3, 1).unwrap();
    let codes = symbolize_series(series.view(), 3, 1).unwrap();
    assert_eq!(codes.len(), patterns.nrows());
    for (row, &code) in patterns.rows().into_iter().zip(codes.iter()) {
        assert_eq!(lehmer_code(&row.to_vec()), code);
    }
}

#[test]
fn random_series_distribution_properties() {
    let mut rng = StdRng::seed_from_u64(17);
    let normal = Normal::new(0.0, 1.0).unwrap();
    for dim in 2..6 {
        let series: Array1<f64> = (0..400).map(|_| normal.sample(&mut rng)).collect();
        let (patterns, dist) = ordinal_patterns_with_probs(series.view(), dim, 1).unwrap();
        let factorial: usize = (1..=dim).product();
        assert!(dist.n_distinct() <= factorial);
        assert_abs_diff_eq!(dist.probs.sum(), 1.0, epsilon = 1e-12);

        // Counting the patterns again reproduces the probabilities.
        let recount = PatternDistribution::from_patterns(patterns.view());
        assert_eq!(recount, dist);
        for (k, row) in dist.patterns.rows().into_iter().enumerate() {
            let n = patterns.rows().into_iter().filter(|r| *r == row).count();
            assert_abs_diff_eq!(dist.probs[k], n as f64 / patterns.nrows() as f64, epsilon = 1e-12);
        }
    }
}

#[test]
fn short_series_and_bad_embeddings_fail() {
    assert!(matches!(
        window_count(4, 3, 2),
        Err(InfoError::SeriesTooShort { len: 4, dim: 3, tau: 2 })
    ));
    assert_eq!(window_count(5, 3, 2).unwrap(), 1);

    let series = array![1.0, 2.0];
    let err = ordinal_patterns(series.view(), 3, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Shape);

    for (dim, tau) in [(1, 1), (3, 0), (21, 1)] {
        let err = ordinal_patterns(Array1::zeros(50).view(), dim, tau).unwrap_err();
        assert!(matches!(err, InfoError::InvalidEmbedding { .. }));
    }
}
