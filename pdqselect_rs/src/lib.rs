#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks, clippy::pedantic, clippy::nursery)]
#![allow(clippy::items_after_statements)]

/*!
## What can this crate do?

This crate moves the `k`-th smallest element of a slice into position `k - 1` without sorting
the slice: everything before that position ends up no greater than it, everything after ends up
no less, and neither side is ordered any further. The engine is a pattern-defeating quickselect,
combining the linear average case of Hoare's quickselect with a heap-based worst-case guarantee
and pattern-breaking for adversarial inputs. It allocates nothing and works on `no_std` targets.

Anything indexable can be driven through the [`SelectData`] capability trait; plain slices get
the [`SliceSelectExt`] convenience methods on top.

## Example

```rust
use pdqselect_rs::SliceSelectExt;

let mut x = [-5, 4, 1, -3, 2];
x.select_kth(2);
assert_eq!(x[1], -3);
```

## Authors

[raldone01](https://github.com/raldone01) and [onestacked](https://github.com/chriss0612) are the
primary authors and maintainers of this library.

## License

This project is released under either:

- [MIT License](https://github.com/ink-feather-org/pdqselect_rs/blob/main/LICENSE-MIT)
- [Apache License (Version 2.0)](https://github.com/ink-feather-org/pdqselect_rs/blob/main/LICENSE-APACHE)

at your choosing.

### Contribution

Unless you explicitly state otherwise, any contribution intentionally
submitted for inclusion in the work by you, as defined in the Apache-2.0
license, shall be dual licensed as above, without any additional terms or
conditions.

*/

#[allow(
  clippy::too_many_lines,
  clippy::doc_markdown,
  clippy::cognitive_complexity,
  clippy::cast_possible_truncation
)]
pub mod select;

mod slice_select_ext;

pub use select::{select, select_by, select_ordered, SelectData};
pub use slice_select_ext::SliceSelectExt;

#[cfg(test)]
mod test;
