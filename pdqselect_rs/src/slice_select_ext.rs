use core::cmp::Ordering;

use crate::select::{select, select_by};

/// Trait for moving the `k`-th smallest element of a slice into place.
pub trait SliceSelectExt<T> {
  /// Reorders the slice so that the `k`-th smallest element is at position `k - 1`, every
  /// element before it is no greater than it and every element after it is no less than it.
  /// Equal elements may end up on either side of the chosen position.
  ///
  /// The reordering is in-place (i.e., does not allocate), *O*(*n*) on average and
  /// *O*(*n* \* log(*n*)) worst-case. Ranks out of the range `1..=self.len()` are silently
  /// ignored.
  ///
  /// # Current implementation
  ///
  /// The current algorithm is a selection variant of [pattern-defeating quicksort][pdqsort] by
  /// Orson Peters: it descends into the single partition that contains the target rank and
  /// falls back to a bounded heap-select once too many partitions come out lopsided. It uses
  /// some randomization to avoid degenerate cases, but with a fixed seed to always provide
  /// deterministic behaviour.
  ///
  /// # Examples
  ///
  /// ```rust
  /// use pdqselect_rs::SliceSelectExt;
  ///
  /// let mut x = [-5, 4, 1, -3, 2];
  /// x.select_kth(2);
  /// assert_eq!(x[1], -3);
  /// ```
  ///
  /// [pdqsort]: https://github.com/orlp/pdqsort
  fn select_kth(&mut self, k: usize)
  where
    T: Ord;

  /// Reorders the slice with a comparator function so that the `k`-th smallest element is at
  /// position `k - 1`, as described for [`select_kth`](SliceSelectExt::select_kth).
  ///
  /// The comparator function must define a total ordering for the elements in the slice. If
  /// the ordering is not total, the order of the elements is unspecified. An order is a
  /// total order if it is (for all `a`, `b` and `c`):
  ///
  /// * total and antisymmetric: exactly one of `a < b`, `a == b` or `a > b` is true, and
  /// * transitive, `a < b` and `b < c` implies `a < c`. The same must hold for both `==` and `>`.
  ///
  /// For example, while [`f64`] doesn't implement [`Ord`] because `NaN != NaN`, we can use
  /// `partial_cmp` as our selection function when we know the slice doesn't contain a `NaN`.
  ///
  /// # Examples
  ///
  /// ```
  /// use pdqselect_rs::SliceSelectExt;
  ///
  /// let mut floats = [5f64, 4.0, 1.0, 3.0, 2.0];
  /// floats.select_kth_by(3, |a, b| a.partial_cmp(b).unwrap());
  /// assert_eq!(floats[2], 3.0);
  ///
  /// // reverse ordering selects the k-th largest instead
  /// let mut v = [5, 4, 1, 3, 2];
  /// v.select_kth_by(1, |a, b| b.cmp(a));
  /// assert_eq!(v[0], 5);
  /// ```
  fn select_kth_by<F>(&mut self, k: usize, compare: F)
  where
    F: FnMut(&T, &T) -> Ordering;

  /// Reorders the slice with a key extraction function so that the element with the `k`-th
  /// smallest key is at position `k - 1`, as described for
  /// [`select_kth`](SliceSelectExt::select_kth).
  ///
  /// The key function is called on both sides of every comparison, so it should be cheap.
  ///
  /// # Examples
  ///
  /// ```
  /// use pdqselect_rs::SliceSelectExt;
  ///
  /// let mut v = [-5i32, 4, 1, -3, 2];
  /// v.select_kth_by_key(2, |k| k.abs());
  /// assert_eq!(v[1], 2);
  /// ```
  fn select_kth_by_key<K, F>(&mut self, k: usize, f: F)
  where
    F: FnMut(&T) -> K,
    K: Ord;
}

impl<T> SliceSelectExt<T> for [T] {
  #[inline]
  fn select_kth(&mut self, k: usize)
  where
    T: Ord,
  {
    select(self, k);
  }

  #[inline]
  fn select_kth_by<F>(&mut self, k: usize, compare: F)
  where
    F: FnMut(&T, &T) -> Ordering,
  {
    select_by(self, k, compare);
  }

  #[inline]
  fn select_kth_by_key<K, F>(&mut self, k: usize, mut f: F)
  where
    F: FnMut(&T) -> K,
    K: Ord,
  {
    select_by(self, k, |a, b| f(a).cmp(&f(b)));
  }
}
