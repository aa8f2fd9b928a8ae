extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use rand::{prelude::StdRng, Rng, SeedableRng};

use crate::{select, select_by, select_ordered, SelectData, SliceSelectExt};

const RAND_CNT: usize = 10_000;

fn gen_array(n: usize) -> Vec<u32> {
  let mut rng = StdRng::seed_from_u64(69420);
  (0..n).map(|_| rng.gen()).collect()
}

/// Checks the selection contract around rank `k`: everything before position `k - 1` is no
/// greater than the element there, everything after is no less.
fn assert_selected(v: &[u32], k: usize) {
  let kth = v[k - 1];
  for &x in &v[..k - 1] {
    assert!(x <= kth);
  }
  for &x in &v[k..] {
    assert!(x >= kth);
  }
}

#[test]
fn selects_the_kth_smallest_of_random_input() {
  let sorted = {
    let mut v = gen_array(RAND_CNT);
    v.sort_unstable();
    v
  };

  for k in (1..=RAND_CNT).step_by(RAND_CNT / 10) {
    let mut v = gen_array(RAND_CNT);
    select_ordered(&mut v, k);

    assert_eq!(v[k - 1], sorted[k - 1]);
    assert_selected(&v, k);
  }
}

#[test]
fn preserves_the_multiset() {
  let mut v = gen_array(RAND_CNT);
  select_ordered(&mut v, RAND_CNT / 2);
  v.sort_unstable();

  let mut w = gen_array(RAND_CNT);
  w.sort_unstable();
  assert_eq!(v, w);
}

#[test]
fn repeated_calls_keep_the_rank_in_place() {
  let mut v = gen_array(1000);
  select_ordered(&mut v, 400);
  let kth = v[399];

  // The second call may shuffle within the two sides, but the contract must keep holding
  // and the value at the target position must not move.
  select_ordered(&mut v, 400);
  assert_eq!(v[399], kth);
  assert_selected(&v, 400);
}

#[test]
fn extreme_ranks_select_the_minimum_and_maximum() {
  let orig = gen_array(1000);
  let min = *orig.iter().min().unwrap();
  let max = *orig.iter().max().unwrap();

  let mut v = orig.clone();
  select_ordered(&mut v, 1);
  assert_eq!(v[0], min);

  let mut v = orig;
  select_ordered(&mut v, 1000);
  assert_eq!(v[999], max);
}

#[test]
fn out_of_range_ranks_are_ignored() {
  let orig = gen_array(100);

  let mut v = orig.clone();
  select_ordered(&mut v, 0);
  assert_eq!(v, orig);
  select_ordered(&mut v, 101);
  assert_eq!(v, orig);

  let mut empty: [u32; 0] = [];
  select_ordered(&mut empty, 0);
  select_ordered(&mut empty, 1);
}

#[test]
fn all_equal_elements_stay_equal() {
  let mut v = vec![7u32; 500];
  select_ordered(&mut v, 250);
  assert!(v.iter().all(|&x| x == 7));
}

#[test]
fn identical_inputs_produce_identical_outputs() {
  let mut a = gen_array(5000);
  let mut b = a.clone();

  select_ordered(&mut a, 1234);
  select_ordered(&mut b, 1234);
  assert_eq!(a, b);
}

#[test]
fn skewed_duplicate_heavy_input() {
  // Geometric value distribution: roughly half the elements share the smallest keys, which
  // drives the equal-pivot partition hard.
  let mut rng = StdRng::seed_from_u64(0xDEC0DE);
  let orig: Vec<u32> = (0..RAND_CNT).map(|_| rng.gen::<u32>().leading_zeros()).collect();

  let sorted = {
    let mut v = orig.clone();
    v.sort_unstable();
    v
  };

  let k = RAND_CNT / 2;
  let mut v = orig;
  select_ordered(&mut v, k);

  assert_eq!(v[k - 1], sorted[k - 1]);
  assert_selected(&v, k);
}

#[test]
fn sorted_input_middle_rank() {
  let mut v = [1, 2, 3, 4, 5];
  select_ordered(&mut v, 3);

  assert_eq!(v[2], 3);
  let mut left = [v[0], v[1]];
  left.sort_unstable();
  assert_eq!(left, [1, 2]);
  let mut right = [v[3], v[4]];
  right.sort_unstable();
  assert_eq!(right, [4, 5]);
}

#[test]
fn reversed_input_middle_rank() {
  let mut v = [5, 4, 3, 2, 1];
  select_ordered(&mut v, 3);

  assert_eq!(v[2], 3);
  let mut left = [v[0], v[1]];
  left.sort_unstable();
  assert_eq!(left, [1, 2]);
  let mut right = [v[3], v[4]];
  right.sort_unstable();
  assert_eq!(right, [4, 5]);
}

#[test]
fn duplicates_with_outliers() {
  let mut v = [2, 2, 2, 2, 1, 2, 2, 3, 2, 2];
  select_ordered(&mut v, 6);

  assert_eq!(v[5], 2);
  assert_eq!(v[..5].iter().filter(|&&x| x == 1).count(), 1);
  assert!(v[6..].contains(&3));
  assert_eq!(v.iter().sum::<i32>(), 20);
}

#[test]
fn single_element() {
  let mut v = [42];
  select_ordered(&mut v, 1);
  assert_eq!(v, [42]);
}

#[test]
fn two_elements() {
  let mut v = [2, 1];
  select_ordered(&mut v, 1);
  assert_eq!(v, [1, 2]);
}

#[test]
fn slice_select_ext_variants() {
  let orig = gen_array(500);
  let sorted = {
    let mut v = orig.clone();
    v.sort_unstable();
    v
  };

  let mut v = orig.clone();
  v.select_kth(100);
  assert_eq!(v[99], sorted[99]);

  let mut v = orig.clone();
  v.select_kth_by(7, |a, b| b.cmp(a));
  assert_eq!(v[6], sorted[sorted.len() - 7]);

  let mut v: Vec<i32> = orig.iter().map(|&x| (x % 1000) as i32 - 500).collect();
  let kth_abs = {
    let mut keys: Vec<i32> = v.iter().map(|x| x.abs()).collect();
    keys.sort_unstable();
    keys[41]
  };
  v.select_kth_by_key(42, |k| k.abs());
  assert_eq!(v[41].abs(), kth_abs);
}

/// Capability-backed sequence that counts how often the engine compares.
struct Counting {
  v: Vec<u32>,
  compares: usize,
}

impl SelectData for Counting {
  fn len(&self) -> usize {
    self.v.len()
  }

  fn less(&mut self, i: usize, j: usize) -> bool {
    self.compares += 1;
    self.v[i] < self.v[j]
  }

  fn swap(&mut self, i: usize, j: usize) {
    self.v.swap(i, j);
  }
}

#[test]
fn comparison_count_stays_within_the_worst_case_bound() {
  let n = RAND_CNT;
  let log2n = (usize::BITS - n.leading_zeros()) as usize;
  let bound = 10 * n * log2n;

  let mut rng = StdRng::seed_from_u64(31337);
  let patterns: [Vec<u32>; 5] = [
    (0..n).map(|_| rng.gen()).collect(),
    (0..n).map(|i| i as u32).collect(),
    (0..n).map(|i| (n - i) as u32).collect(),
    (0..n).map(|i| (i % 7) as u32).collect(),
    vec![1; n],
  ];

  for v in patterns {
    let mut data = Counting { v, compares: 0 };
    select(&mut data, n / 2);

    assert_selected(&data.v, n / 2);
    assert!(data.compares <= bound);
  }
}

mod from_rustc {
  use super::*;

  #[test]
  #[cfg(not(target_arch = "wasm32"))]
  #[cfg_attr(miri, ignore)] // Miri is too slow
  #[allow(clippy::cognitive_complexity)]
  fn select_kth() {
    use core::cmp::Ordering::{Equal, Greater, Less};
    use rand::seq::SliceRandom;

    let mut rng = StdRng::from_entropy();

    for len in (2..21).chain(500..501) {
      let mut orig = vec![0; len];

      for &modulus in &[5, 10, 1000] {
        for _ in 0..10 {
          for item in orig.iter_mut().take(len) {
            *item = rng.gen::<i32>() % modulus;
          }

          let v_sorted = {
            let mut v = orig.clone();
            v.sort_unstable();
            v
          };

          // Select in default order.
          for pivot in 0..len {
            let mut v = orig.clone();
            select_ordered(&mut v, pivot + 1);

            assert_eq!(v_sorted[pivot], v[pivot]);
            for i in 0..pivot {
              for j in pivot..len {
                assert!(v[i] <= v[j]);
              }
            }
          }

          // Select in ascending order with a comparator.
          for pivot in 0..len {
            let mut v = orig.clone();
            select_by(&mut v, pivot + 1, Ord::cmp);
            assert_eq!(v_sorted[pivot], v[pivot]);
          }

          // Select in descending order.
          let sort_descending_comparator = |a: &i32, b: &i32| b.cmp(a);
          let v_sorted_descending = {
            let mut v = orig.clone();
            v.sort_unstable_by(sort_descending_comparator);
            v
          };

          for pivot in 0..len {
            let mut v = orig.clone();
            select_by(&mut v, pivot + 1, sort_descending_comparator);

            assert_eq!(v_sorted_descending[pivot], v[pivot]);
            for i in 0..pivot {
              for j in pivot..len {
                assert!(v[j] <= v[i]);
              }
            }
          }
        }
      }
    }

    // Select with a completely random comparison function.
    // This will reorder the elements *somehow*, but won't panic.
    let mut v = [0; 500];
    for (i, item) in v.iter_mut().enumerate() {
      *item = i32::try_from(i).unwrap();
    }

    for pivot in 0..v.len() {
      select_by(&mut v, pivot + 1, |_, _| {
        *[Less, Equal, Greater].choose(&mut rng).unwrap()
      });
      v.sort_unstable();
      for (i, &item) in v.iter().enumerate() {
        assert_eq!(item, i32::try_from(i).unwrap());
      }
    }

    // Should not panic.
    [(); 10].select_kth(1);
    [(); 10].select_kth(6);
    [(); 10].select_kth(10);
    [(); 100].select_kth(1);
    [(); 100].select_kth(51);
    [(); 100].select_kth(100);

    let mut v = [0xDEAD_BEEF_u64];
    v.select_kth(1);
    assert!(v == [0xDEAD_BEEF]);
  }
}
