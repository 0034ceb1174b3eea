//! Platform Abstraction Layer
//!
//! This module provides a platform-agnostic interface for board services.
//! Each platform (XMC1100, ...) implements the Platform trait on a board
//! context object that is built once and handed by reference to the drivers
//! that need it.
//!
//! # Usage
//!
//! ```ignore
//! use xmc_drivers::platform::{CurrentPlatform, Platform};
//!
//! static PLATFORM: CurrentPlatform = CurrentPlatform::xmc2go();
//!
//! let led = PLATFORM.resources().lookup_pin(14)?;
//! PLATFORM.enable_peripheral(PeripheralId::Ccu40);
//! ```

use crate::hal::gate::PeripheralGate;
use crate::hal::gpio::PinMux;
use crate::hal::interrupt::InterruptController;
use crate::resource::ResourceTable;

/// Platform trait - implemented by each supported platform
///
/// Bundles the collaborators a driver needs: peripheral clock/reset control,
/// pin routing, interrupt masking, and the board's resource table.
pub trait Platform: PeripheralGate + PinMux + InterruptController {
    /// Platform name for debugging
    fn name(&self) -> &'static str;

    /// Resource table of the board this platform drives.
    fn resources(&self) -> &'static ResourceTable;

    /// Clock feeding the serial baud-rate generators, in Hz.
    fn peripheral_clock_hz(&self) -> u32 {
        self.resources().peripheral_clock_hz
    }
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "xmc1100")] {
        pub mod xmc1100;
        pub use xmc1100::Xmc1100Platform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features xmc1100"
        );
    }
}
