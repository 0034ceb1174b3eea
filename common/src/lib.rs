//! Platform-independent building blocks shared by the driver crates.

#![cfg_attr(not(test), no_std)]

pub mod sync;
