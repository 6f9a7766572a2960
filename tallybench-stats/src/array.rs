//! Array Utilities
//!
//! Sorting, partial sorting, single-pass extremes and index generation over
//! dense numeric slices. Everything else in this crate builds on these.

use std::cmp::Ordering;

/// Ordering used for all sorts: `NaN` compares equal to everything, so a
/// stray `NaN` never panics a sort but its final position is unspecified.
#[inline]
fn compare<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Sort a copy of `values` into non-decreasing order.
///
/// Stability is not guaranteed.
pub fn sort<T: PartialOrd + Copy>(values: &[T]) -> Vec<T> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(compare);
    sorted
}

/// Partially sort a copy of `values`.
///
/// The first `k` positions of the result hold the `k` smallest elements in
/// sorted order. The order of the remaining positions is unspecified. A `k`
/// larger than the input length sorts everything.
pub fn partial_sort<T: PartialOrd + Copy>(k: usize, values: &[T]) -> Vec<T> {
    let mut out = values.to_vec();
    let n = out.len();
    if k == 0 || n == 0 {
        return out;
    }
    if k >= n {
        out.sort_unstable_by(compare);
        return out;
    }

    // Everything before k-1 is <= out[k-1] afterwards; sort just that prefix.
    out.select_nth_unstable_by(k - 1, compare);
    out[..k].sort_unstable_by(compare);
    out
}

/// Minimum and maximum in one pass.
///
/// Returns `(+inf, -inf)` for an empty slice. That pair means "no data" and
/// must never be used as a real bound.
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

/// The index sequence `[0, len - 1]` for a slice.
pub fn indices<T>(values: &[T]) -> Vec<usize> {
    (0..values.len()).collect()
}

/// Allocate `len` slots, fill slot `i` with `f(i)`, and freeze the result.
pub fn create<T, F>(len: usize, mut f: F) -> Box<[T]>
where
    F: FnMut(usize) -> T,
{
    let mut buf = Vec::with_capacity(len);
    for i in 0..len {
        buf.push(f(i));
    }
    buf.into_boxed_slice()
}

/// Like [`create`], but the fill effect may fail.
///
/// The first error aborts construction and the partially filled buffer is
/// dropped, so callers never observe it.
pub fn try_create<T, E, F>(len: usize, mut f: F) -> Result<Box<[T]>, E>
where
    F: FnMut(usize) -> Result<T, E>,
{
    let mut buf = Vec::with_capacity(len);
    for i in 0..len {
        buf.push(f(i)?);
    }
    Ok(buf.into_boxed_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sort() {
        assert_eq!(sort(&[3.0, 1.0, 2.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(sort::<f64>(&[]), Vec::<f64>::new());
    }

    #[test]
    fn test_partial_sort_prefix() {
        let out = partial_sort(2, &[5.0, 4.0, 1.0, 3.0, 2.0]);
        assert_eq!(&out[..2], &[1.0, 2.0]);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_partial_sort_k_larger_than_len() {
        assert_eq!(partial_sort(10, &[2, 1, 3]), vec![1, 2, 3]);
        assert_eq!(partial_sort(0, &[2, 1, 3]), vec![2, 1, 3]);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, 1.0, 2.0]), (1.0, 3.0));
    }

    #[test]
    fn test_min_max_empty_sentinel() {
        let (lo, hi) = min_max(&[]);
        assert_eq!(lo, f64::INFINITY);
        assert_eq!(hi, f64::NEG_INFINITY);
    }

    #[test]
    fn test_indices() {
        assert_eq!(indices(&["a", "b", "c"]), vec![0, 1, 2]);
        assert!(indices::<f64>(&[]).is_empty());
    }

    #[test]
    fn test_create() {
        let squares = create(4, |i| (i * i) as f64);
        assert_eq!(&*squares, &[0.0, 1.0, 4.0, 9.0]);
        assert!(create(0, |i| i).is_empty());
    }

    #[test]
    fn test_try_create_stops_on_error() {
        let mut calls = 0;
        let result: Result<Box<[usize]>, String> = try_create(5, |i| {
            calls += 1;
            if i == 2 { Err(format!("slot {i}")) } else { Ok(i) }
        });
        assert_eq!(result.unwrap_err(), "slot 2");
        assert_eq!(calls, 3);
    }

    proptest! {
        #[test]
        fn prop_sort_is_ordered_permutation(values in prop::collection::vec(-1e6f64..1e6, 0..64)) {
            let sorted = sort(&values);
            prop_assert_eq!(sorted.len(), values.len());
            prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
            let mut a = values.clone();
            a.sort_by(|x, y| x.total_cmp(y));
            prop_assert_eq!(a, sorted);
        }

        #[test]
        fn prop_partial_sort_prefix_matches_full_sort(
            values in prop::collection::vec(-1e6f64..1e6, 1..64),
            k in 0usize..80,
        ) {
            let partial = partial_sort(k, &values);
            let full = sort(&values);
            let k = k.min(values.len());
            prop_assert_eq!(&partial[..k], &full[..k]);
        }

        #[test]
        fn prop_min_max_bounds(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let (lo, hi) = min_max(&values);
            prop_assert!(values.iter().all(|&x| lo <= x && x <= hi));
            prop_assert!(values.contains(&lo) && values.contains(&hi));
        }
    }
}
