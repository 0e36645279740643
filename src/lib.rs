#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

#[cfg_attr(test, macro_use)]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::helper;

mod tree;
pub use tree::RecencyTree;

mod engine;
pub use engine::{DistanceHistories, ReuseDistances};

mod oracle;
pub use oracle::rescan_histories;

mod summary;
pub use summary::TraceSummary;
