use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

/// Extends ordered maps with a closest-key lookup
pub trait NearestExt<K> {
    /// Find the key closest to `goal`
    ///
    /// Only the immediate neighbours of `goal` in the key order are compared,
    /// using the `distance` function provided. When both neighbours are equally
    /// distant the lower key wins.
    ///
    /// Returns `None` for an empty map, or when neither neighbour has a
    /// comparable (non-NaN) distance.
    ///
    /// ```rust
    /// # use nscheme_utils::NearestExt;
    /// # use std::collections::BTreeMap;
    /// let map = BTreeMap::from([(10, 'a'), (20, 'b'), (40, 'c')]);
    /// let distance = |a: &i32, b: &i32| (a - b).abs() as f64;
    ///
    /// assert_eq!(map.nearest_key(&12, distance), Some(&10));
    /// assert_eq!(map.nearest_key(&31, distance), Some(&40));
    /// assert_eq!(map.nearest_key(&100, distance), Some(&40));
    ///
    /// // ties go to the lower key
    /// assert_eq!(map.nearest_key(&15, distance), Some(&10));
    /// ```
    fn nearest_key<F>(&self, goal: &K, distance: F) -> Option<&K>
    where
        F: Fn(&K, &K) -> f64;
}

impl<K: Ord, V> NearestExt<K> for BTreeMap<K, V> {
    fn nearest_key<F>(&self, goal: &K, distance: F) -> Option<&K>
    where
        F: Fn(&K, &K) -> f64,
    {
        let below = self
            .range((Unbounded, Included(goal)))
            .next_back()
            .map(|(k, _)| k);
        let above = self
            .range((Excluded(goal), Unbounded))
            .next()
            .map(|(k, _)| k);

        match (below, above) {
            (Some(low), Some(high)) => {
                let d_low = distance(goal, low);
                let d_high = distance(goal, high);
                match (d_low.is_nan(), d_high.is_nan()) {
                    (false, false) if d_low <= d_high => Some(low),
                    (false, false) => Some(high),
                    (false, true) => Some(low),
                    (true, false) => Some(high),
                    (true, true) => None,
                }
            }
            (Some(key), None) | (None, Some(key)) => {
                if distance(goal, key).is_nan() {
                    None
                } else {
                    Some(key)
                }
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &i64, b: &i64) -> f64 {
        (a - b).abs() as f64
    }

    #[test]
    fn empty_map() {
        let map: BTreeMap<i64, ()> = BTreeMap::new();
        assert_eq!(map.nearest_key(&5, distance), None);
    }

    #[test]
    fn exact_match() {
        let map = BTreeMap::from([(0, ()), (5, ()), (10, ())]);
        assert_eq!(map.nearest_key(&5, distance), Some(&5));
    }

    #[test]
    fn outside_range() {
        let map = BTreeMap::from([(0, ()), (5, ())]);
        assert_eq!(map.nearest_key(&-20, distance), Some(&0));
        assert_eq!(map.nearest_key(&20, distance), Some(&5));
    }

    #[test]
    fn ties_resolve_low() {
        let map = BTreeMap::from([(0, ()), (10, ())]);
        assert_eq!(map.nearest_key(&5, distance), Some(&0));
        assert_eq!(map.nearest_key(&6, distance), Some(&10));
    }
}
