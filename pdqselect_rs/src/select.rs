//! Slice selection
//!
//! This module contains a selection algorithm derived from Orson Peters' pattern-defeating
//! quicksort, published at: <https://github.com/orlp/pdqsort>
//!
//! Instead of sorting, the driver descends into the single partition that contains the target
//! rank, so the average cost is *O*(*n*) and the worst case is bounded by a heap-based fallback.
//! The algorithm never copies elements out of the sequence: it only compares two positions and
//! swaps two positions, which is what the [`SelectData`] capability surface captures.

use core::cmp::Ordering;

/// Random-access view of a mutable sequence, as seen by the selection engine.
///
/// The engine drives any implementor purely through positional comparisons and swaps, so
/// implementors decide how elements are stored and how they are ordered. Indices passed by the
/// engine are always within `0..self.len()`.
///
/// `less` takes `&mut self` so that implementations can carry stateful [`FnMut`] comparators.
///
/// The order described by `less` must be total: exactly one of `less(i, j)`, `less(j, i)` and
/// "neither" holds for every pair, and it must be transitive. If it is not, the engine still
/// terminates and stays in bounds, but the rank guarantees are void.
pub trait SelectData {
  /// Returns the number of elements in the sequence.
  fn len(&self) -> usize;

  /// Returns `true` if the sequence contains no elements.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns whether the element at position `i` is strictly less than the element at
  /// position `j`.
  fn less(&mut self, i: usize, j: usize) -> bool;

  /// Swaps the elements at positions `i` and `j`.
  fn swap(&mut self, i: usize, j: usize);
}

impl<T: Ord> SelectData for [T] {
  fn len(&self) -> usize {
    self.len()
  }

  fn less(&mut self, i: usize, j: usize) -> bool {
    self[i] < self[j]
  }

  fn swap(&mut self, i: usize, j: usize) {
    (*self).swap(i, j);
  }
}

/// Adapter that realises the capability surface over a slice and an element-level predicate.
struct SliceData<'a, T, F> {
  v: &'a mut [T],
  is_less: F,
}

impl<T, F: FnMut(&T, &T) -> bool> SelectData for SliceData<'_, T, F> {
  fn len(&self) -> usize {
    self.v.len()
  }

  fn less(&mut self, i: usize, j: usize) -> bool {
    (self.is_less)(&self.v[i], &self.v[j])
  }

  fn swap(&mut self, i: usize, j: usize) {
    self.v.swap(i, j);
  }
}

/// Ordering classification of the probes examined by [`choose_pivot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Hint {
  Increasing,
  Decreasing,
  Unknown,
}

/// Sorts `data[a..b]` using insertion sort, which is *O*(*n*^2) worst-case.
fn insertion_sort<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize) {
  for i in a + 1..b {
    let mut j = i;
    while j > a && data.less(j, j - 1) {
      data.swap(j, j - 1);
      j -= 1;
    }
  }
}

/// Partially sorts `data[a..b]` by shifting several out-of-order elements around.
///
/// Returns `true` if the range is sorted at the end. This function is *O*(*n*) worst-case.
#[cold]
fn partial_insertion_sort<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize) -> bool {
  // Maximum number of adjacent out-of-order pairs that will get shifted.
  const MAX_STEPS: usize = 5;
  // If the range is shorter than this, don't shift any elements.
  const SHORTEST_SHIFTING: usize = 50;

  let mut i = a + 1;

  for _ in 0..MAX_STEPS {
    // Find the next pair of adjacent out-of-order elements.
    while i < b && !data.less(i, i - 1) {
      i += 1;
    }

    // Are we done?
    if i == b {
      return true;
    }

    // Don't shift elements on short ranges, that has a performance cost.
    if b - a < SHORTEST_SHIFTING {
      return false;
    }

    // Swap the found pair of elements. This puts them in correct order.
    data.swap(i, i - 1);

    // Shift the smaller element to the left.
    for j in (a + 1..i).rev() {
      if !data.less(j, j - 1) {
        break;
      }
      data.swap(j, j - 1);
    }

    // Shift the greater element to the right.
    for j in i + 1..b {
      if !data.less(j, j - 1) {
        break;
      }
      data.swap(j, j - 1);
    }
  }

  // Didn't manage to sort the range in the limited number of steps.
  false
}

/// Sifts the element at heap position `node` down a max-heap of `len` elements rooted at
/// position `base` of the sequence.
///
/// The heap respects the invariant `parent >= child`.
fn sift_down<D: SelectData + ?Sized>(data: &mut D, base: usize, mut node: usize, len: usize) {
  loop {
    // Children of `node`.
    let mut child = 2 * node + 1;
    if child >= len {
      break;
    }

    // Choose the greater child.
    if child + 1 < len && data.less(base + child, base + child + 1) {
      child += 1;
    }

    // Stop if the invariant holds at `node`.
    if !data.less(base + node, base + child) {
      break;
    }

    // Swap `node` with the greater child, move one step down, and continue sifting.
    data.swap(base + node, base + child);
    node = child;
  }
}

/// Moves the element of rank `rank` within `data[a..b]` to position `a + rank` using a bounded
/// max-heap, which guarantees *O*(*n* \* log(*rank*)) worst-case.
#[cold]
fn heap_select<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize, rank: usize) {
  let heap = rank + 1;

  // Build a max-heap over the first `rank + 1` elements of the range.
  for node in (0..=rank / 2).rev() {
    sift_down(data, a, node, heap);
  }

  // Stream the remaining elements through the heap: anything smaller than the current maximum
  // displaces it.
  for i in heap..b - a {
    if data.less(a + i, a) {
      data.swap(a + i, a);
      sift_down(data, a, 0, heap);
    }
  }

  // The heap maximum is the element of rank `rank`; move it to its final position.
  data.swap(a, a + rank);
}

/// Scatters some elements around in an attempt to break patterns that might cause imbalanced
/// partitions in quickselect.
#[cold]
fn break_patterns<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize) {
  let len = b - a;
  if len >= 8 {
    // Pseudorandom number generator from the "Xorshift RNGs" paper by George Marsaglia.
    let mut random = len as u64;
    let mut gen_usize = || {
      random ^= random << 13;
      random ^= random >> 7;
      random ^= random << 17;
      random as usize
    };

    // Take random numbers modulo this number.
    // The number fits into `usize` because `len` is not greater than `isize::MAX`.
    let modulus = len.next_power_of_two();

    // Some pivot candidates will be in the nearby of this index. Let's randomize them.
    let pos = a + len / 4 * 2 - 1;

    for i in 0..3 {
      // Generate a random number modulo `len`. However, in order to avoid costly operations
      // we first take it modulo a power of two, and then decrease by `len` until it fits
      // into the range `[0, len - 1]`.
      let mut other = gen_usize() & (modulus - 1);

      // `other` is guaranteed to be less than `2 * len`.
      if other >= len {
        other -= len;
      }

      data.swap(pos + i, a + other);
    }
  }
}

/// Compare-swaps the elements at `a` and `b` so that the smaller one ends up at `a`.
fn sort2<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize, swaps: &mut usize) {
  if data.less(b, a) {
    data.swap(a, b);
    *swaps += 1;
  }
}

/// Compare-swaps the elements at `a`, `b` and `c` so that the median ends up at `b`.
fn sort3<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize, c: usize, swaps: &mut usize) {
  sort2(data, a, b, swaps);
  sort2(data, b, c, swaps);
  sort2(data, a, b, swaps);
}

/// Chooses a pivot in `data[a..b]` and returns its position together with a hint about the
/// ordering of the probed elements.
///
/// Elements in `data[a..b]` might be reordered in the process: the probes are compare-swapped
/// into place, which presorts a sparse skeleton of the range and biases the following partition
/// toward balance.
fn choose_pivot<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize) -> (usize, Hint) {
  // Minimum length to choose the median-of-medians method.
  // Shorter ranges use the simple median-of-three method.
  const SHORTEST_MEDIAN_OF_MEDIANS: usize = 50;

  let len = b - a;
  let mid = a + len / 2;

  if len < 8 {
    return (mid, Hint::Unknown);
  }

  // Counts the total number of swaps performed while sorting the probes.
  let mut swaps = 0;
  let max_swaps;

  if len >= SHORTEST_MEDIAN_OF_MEDIANS {
    // Tukey ninther: median each of three evenly spaced adjacent triples, then take the median
    // of the three medians. Each `sort3` performs up to three compare-swaps.
    let lo = a + len / 4;
    let hi = a + len / 4 * 3;
    sort3(data, lo - 1, lo, lo + 1, &mut swaps);
    sort3(data, mid - 1, mid, mid + 1, &mut swaps);
    sort3(data, hi - 1, hi, hi + 1, &mut swaps);
    // The median of the three medians ends up at `mid`.
    sort3(data, lo, mid, hi, &mut swaps);
    max_swaps = 4 * 3;
  } else {
    // Median of the boundaries and the midpoint; the median ends up at `mid`.
    sort3(data, a, mid, b - 1, &mut swaps);
    max_swaps = 3;
  }

  if swaps == 0 {
    // The probes were already in order, so the range is likely increasing.
    (mid, Hint::Increasing)
  } else if swaps == max_swaps {
    // Every compare-swap fired, so the probes were strictly decreasing.
    (mid, Hint::Decreasing)
  } else {
    (mid, Hint::Unknown)
  }
}

/// Reverses `data[a..b]` in place.
fn reverse_range<D: SelectData + ?Sized>(data: &mut D, a: usize, b: usize) {
  let mut i = a;
  let mut j = b - 1;
  while i < j {
    data.swap(i, j);
    i += 1;
    j -= 1;
  }
}

/// Partitions `data[a..b]` around the element at position `pivot`.
///
/// Returns a tuple of:
///
/// 1. The final position of the pivot.
/// 2. True if the range was already partitioned.
///
/// Postcondition: elements before the returned position are at most the pivot, the pivot sits at
/// the returned position and elements after it are at least the pivot.
fn partition<D: SelectData + ?Sized>(
  data: &mut D,
  a: usize,
  b: usize,
  pivot: usize,
) -> (usize, bool) {
  // Place the pivot at the beginning of the range.
  data.swap(a, pivot);

  let mut i = a + 1;
  let mut j = b - 1;

  // Find the first element greater than or equal to the pivot.
  while i <= j && data.less(i, a) {
    i += 1;
  }

  // Find the last element smaller than the pivot.
  while i <= j && !data.less(j, a) {
    j -= 1;
  }

  if i > j {
    // The cursors crossed before any element had to move: the range was already partitioned.
    // The only swap left is placing the pivot between the two sides.
    data.swap(j, a);
    return (j, true);
  }

  data.swap(i, j);
  i += 1;
  j -= 1;

  loop {
    while i <= j && data.less(i, a) {
      i += 1;
    }
    while i <= j && !data.less(j, a) {
      j -= 1;
    }
    if i > j {
      break;
    }

    // Swap the found pair of out-of-order elements.
    data.swap(i, j);
    i += 1;
    j -= 1;
  }

  // Place the pivot between the two sides.
  data.swap(j, a);
  (j, false)
}

/// Partitions `data[a..b]` into elements equal to the element at position `pivot` followed by
/// elements strictly greater than it.
///
/// Returns the first position past the equal block. It is assumed that `data[a..b]` does not
/// contain elements smaller than the pivot.
fn partition_equal<D: SelectData + ?Sized>(
  data: &mut D,
  a: usize,
  b: usize,
  pivot: usize,
) -> usize {
  // Place the pivot at the beginning of the range.
  data.swap(a, pivot);

  let mut i = a + 1;
  let mut j = b - 1;

  loop {
    // Find the first element strictly greater than the pivot.
    while i <= j && !data.less(a, i) {
      i += 1;
    }

    // Find the last element equal to the pivot.
    while i <= j && data.less(a, j) {
      j -= 1;
    }

    // Are we done?
    if i > j {
      break;
    }

    // Swap the found pair of out-of-order elements.
    data.swap(i, j);
    i += 1;
    j -= 1;
  }

  // `data[a..=j]` is the equal block, so the first strictly greater element is at `j + 1`.
  j + 1
}

/// Moves the element of rank `t` of `data[a..b]` to position `t`, with smaller-or-equal elements
/// before it and greater-or-equal elements after it.
///
/// `limit` is the number of allowed imbalanced partitions before switching to heap-select.
/// If zero, this function will immediately switch to heap-select.
fn select_loop<D: SelectData + ?Sized>(
  data: &mut D,
  mut a: usize,
  mut b: usize,
  t: usize,
  mut limit: u32,
) {
  // Ranges of up to this length get sorted outright using insertion sort.
  const MAX_INSERTION: usize = 12;

  // True if the last partitioning was reasonably balanced.
  let mut was_balanced = true;
  // True if the last partitioning didn't shuffle elements (the range was already partitioned).
  let mut was_partitioned = true;

  loop {
    let len = b - a;

    // Very short ranges get sorted, which settles every rank in them at once.
    if len <= MAX_INSERTION {
      insertion_sort(data, a, b);
      return;
    }

    // If too many bad pivot choices were made, fall back to heap-select in order to guarantee
    // `O(n * log(k))` worst-case.
    if limit == 0 {
      heap_select(data, a, b, t - a);
      return;
    }

    // If the last partitioning was imbalanced, try breaking patterns in the range by shuffling
    // some elements around. Hopefully we'll choose a better pivot this time.
    if !was_balanced {
      break_patterns(data, a, b);
      limit -= 1;
    }

    // Choose a pivot and try guessing whether the range is already sorted.
    let (mut pivot, mut hint) = choose_pivot(data, a, b);

    // If the probes came out strictly decreasing, reversing will probably help.
    // The pivot moves to the mirrored position.
    if hint == Hint::Decreasing {
      reverse_range(data, a, b);
      pivot = (b - 1) - (pivot - a);
      hint = Hint::Increasing;
    }

    // If the last partitioning was decently balanced and didn't shuffle elements, and if pivot
    // selection predicts the range is likely already sorted...
    if was_balanced && was_partitioned && hint == Hint::Increasing {
      // Try identifying several out-of-order elements and shifting them to correct
      // positions. If the range ends up being completely sorted, we're done.
      if partial_insertion_sort(data, a, b) {
        return;
      }
    }

    // If the chosen pivot is equal to the predecessor, then it's the smallest element in the
    // range. Partition the range into elements equal to and elements greater than the pivot.
    // This case is usually hit when the range contains many duplicate elements.
    if a > 0 && !data.less(a - 1, pivot) {
      let mid = partition_equal(data, a, b, pivot);

      // If the target rank landed inside the finalised equal block, its element is in place.
      if t < mid {
        return;
      }

      // Continue on the elements greater than the pivot.
      a = mid;
      continue;
    }

    // Partition the range.
    let (mid, was_p) = partition(data, a, b, pivot);
    was_partitioned = was_p;

    // Descend into the side that contains the target rank.
    let (left_len, right_len) = (mid - a, b - mid);
    let balance_threshold = len / 8;
    match t.cmp(&mid) {
      Ordering::Less => {
        was_balanced = left_len >= balance_threshold;
        b = mid;
      }
      Ordering::Greater => {
        was_balanced = right_len >= balance_threshold;
        a = mid + 1;
      }
      Ordering::Equal => {
        // The pivot landed exactly on the target rank.
        return;
      }
    }
  }
}

/// Reorders `data` so that the `k`-th smallest element is at position `k - 1`, every element
/// before it is no greater than it and every element after it is no less than it. Neither side
/// ends up in any particular order.
///
/// Ranks out of the range `1..=data.len()` are silently ignored. The reordering is in-place,
/// allocation-free, deterministic for a given input, *O*(*n*) on average and
/// *O*(*n* \* log(*n*)) worst-case.
///
/// # Examples
///
/// ```
/// use pdqselect_rs::select;
///
/// let mut v = [9, 4, 7, 1, 3];
/// select(&mut v[..], 3);
/// assert_eq!(v[2], 4);
///
/// // Out-of-range ranks are ignored.
/// let mut v = [2, 1];
/// select(&mut v[..], 0);
/// assert_eq!(v, [2, 1]);
/// ```
pub fn select<D: SelectData + ?Sized>(data: &mut D, k: usize) {
  let len = data.len();

  if k < 1 || k > len {
    return;
  }

  // Limit the number of imbalanced partitions to `floor(log2(len)) + 1`.
  let limit = usize::BITS - len.leading_zeros();

  select_loop(data, 0, len, k - 1, limit);
}

/// Reorders `v` by its natural order so that the `k`-th smallest element is at position `k - 1`,
/// as described for [`select`].
///
/// # Examples
///
/// ```
/// use pdqselect_rs::select_ordered;
///
/// let mut v = [3, 1, 2];
/// select_ordered(&mut v, 2);
/// assert_eq!(v[1], 2);
/// ```
pub fn select_ordered<T: Ord>(v: &mut [T], k: usize) {
  select(v, k);
}

/// Reorders `v` by a comparator function so that the `k`-th smallest element is at position
/// `k - 1`, as described for [`select`].
///
/// The comparator must define a total ordering for the elements in the slice; if it does not,
/// the call still terminates and leaves the elements in an unspecified order.
///
/// # Examples
///
/// ```
/// use pdqselect_rs::select_by;
///
/// let mut v = [3, 1, 2];
/// select_by(&mut v, 1, |a, b| b.cmp(a));
/// assert_eq!(v[0], 3);
/// ```
pub fn select_by<T, F>(v: &mut [T], k: usize, mut compare: F)
where
  F: FnMut(&T, &T) -> Ordering,
{
  select(
    &mut SliceData {
      v,
      is_less: |a: &T, b: &T| compare(a, b) == Ordering::Less,
    },
    k,
  );
}
