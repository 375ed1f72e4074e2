//! Classification code model.
//!
//! Pure functions over the fixed-width, segmented budget classification
//! code scheme. No I/O, no state.

mod code;

pub use code::{derived_level, is_ancestor, significant_prefix_len, validate};
