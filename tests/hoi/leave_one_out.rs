use std::collections::HashSet;

use hoinfo::estimators::approaches::hoi::indexer::{LeaveOneOutCache, leave_one_out_indices};
use hoinfo::InfoError;

#[test]
fn row_r_omits_variable_r() {
    for m in 2..10 {
        let ind = leave_one_out_indices(m).unwrap();
        assert_eq!(ind.dim(), (m, m - 1));
        for (r, row) in ind.rows().into_iter().enumerate() {
            let distinct: HashSet<usize> = row.iter().copied().collect();
            assert_eq!(distinct.len(), m - 1);
            assert!(!distinct.contains(&r));
            assert!(distinct.iter().all(|&i| i < m));
        }
    }
}

#[test]
fn indices_are_deterministic() {
    assert_eq!(leave_one_out_indices(5).unwrap(), leave_one_out_indices(5).unwrap());
    let ind = leave_one_out_indices(3).unwrap();
    assert_eq!(ind, ndarray::array![[1, 2], [2, 0], [0, 1]]);
}

#[test]
fn singletons_have_no_leave_one_out_set() {
    assert!(matches!(
        leave_one_out_indices(1),
        Err(InfoError::InvalidMultipletSize { size: 1 })
    ));
}

#[test]
fn cache_builds_each_size_once() {
    let mut cache = LeaveOneOutCache::new();
    assert!(cache.is_empty());
    let first = cache.get(4).unwrap().clone();
    cache.get(4).unwrap();
    cache.get(3).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(&first, cache.get(4).unwrap());
}
