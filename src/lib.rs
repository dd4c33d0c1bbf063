#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod capacity;
pub mod error;
pub mod hash_map;
pub mod hash_set;
pub mod hash_table;
pub mod strategy;

pub use capacity::CapacitySchedule;
pub use error::Error;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use strategy::Strategy;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else {
        /// The hasher builder used when none is specified.
        ///
        /// Without the `foldhash` feature there is no default; construct
        /// tables through the `with_hasher` constructors instead.
        pub type DefaultHashBuilder = ();
    }
}
