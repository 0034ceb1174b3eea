//! Hardware Driver Subsystem
//!
//! This module provides a layered architecture for hardware abstraction:
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`platform`]: Platform-specific drivers (SoC level)
//! - [`peripheral`]: Reusable peripheral drivers
//! - [`resource`]: Board pin and peripheral tables
//! - [`serial`]: Interrupt-driven serial channels built on the layers above
//!
//! # Design Principles
//!
//! 1. **Separation of Concerns**: Platform code is separate from peripheral code
//! 2. **Zero-Cost Abstractions**: HAL traits compile to direct hardware access
//! 3. **No Hidden Globals**: Drivers receive their board context by reference
//!
//! # Usage Example
//!
//! ```ignore
//! use xmc_drivers::platform::{CurrentPlatform, Platform};
//! use xmc_drivers::peripheral::usic::UsicUart;
//! use xmc_drivers::serial::SerialChannel;
//!
//! static PLATFORM: CurrentPlatform = CurrentPlatform::xmc2go();
//!
//! let uart = *PLATFORM.resources().uart(0).unwrap();
//! let serial: SerialChannel<'_, _, _> =
//!     SerialChannel::new(&PLATFORM, unsafe { UsicUart::new(&uart) }, uart);
//! serial.begin(115200)?;
//! serial.write(b"Hello, world!\r\n");
//! ```

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod peripheral;
pub mod platform;
pub mod resource;
pub mod serial;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use hal::serial::{ConfigurationError, SerialConfig, SerialError};
pub use platform::{CurrentPlatform, Platform};
pub use resource::{BoardId, ResourceTable, board_table};
pub use serial::SerialChannel;
