//! Generic algorithms for the Vessel container library.
//!
//! Algorithms take `(first, last)` cursor pairs and require only the
//! cursor tier they need, so they work the same over an `Array`, a `List`
//! or a plain slice. Where a faster strategy exists for a stronger tier
//! ([`find_end`] reverse-scans bidirectional cursors) the choice is made
//! at compile time through the cursor's category tag.
//!
//! - [`algobase`]: `copy`, `copy_backward`, `copy_within`, `fill`,
//!   `fill_n`, `equal`, `max`, `min`, `gcd`.
//! - [`algo`]: `for_each`, the `find` family, `find_end`,
//!   `find_first_of`.
//! - [`numeric`]: `accumulate`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod algo;
pub mod algobase;
pub mod numeric;

pub use algo::{
    find, find_end, find_end_by, find_first_of, find_first_of_by, find_if, find_if_not, for_each,
};
pub use algobase::{
    copy, copy_backward, copy_within, equal, equal_by, fill, fill_n, gcd, max, max_by, min, min_by,
};
pub use numeric::{accumulate, accumulate_with};
