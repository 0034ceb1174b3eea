//! XMC1100 System Control Unit - Peripheral Clock Gating
//!
//! XMC1 devices have no per-module software reset; a module is held idle by
//! gating its clock. Gate control registers are write-protected and must be
//! unlocked through `PASSWD` around every access.

use crate::hal::gate::{PeripheralGate, PeripheralId};
use core::ptr::{read_volatile, write_volatile};

/// SCU general control base address.
pub const SCU_GENERAL_BASE: usize = 0x4001_0000;

/// SCU clock control base address.
pub const SCU_CLK_BASE: usize = 0x4001_0300;

const PASSWD_OFFSET: usize = 0x24;
const CGATSTAT0_OFFSET: usize = 0x08;
const CGATSET0_OFFSET: usize = 0x0C;
const CGATCLR0_OFFSET: usize = 0x10;

// PASSWD: PASS = 0b11000, MODE = 0 (unprotected) / 3 (protected)
const PASSWD_UNLOCK: u32 = 0xC0;
const PASSWD_LOCK: u32 = 0xC3;

/// Clock gate bit of a module in `CGATSTAT0`/`CGATSET0`/`CGATCLR0`.
///
/// `None` for modules whose clock cannot be gated on this device.
pub const fn clock_mask(id: PeripheralId) -> Option<u32> {
    match id {
        PeripheralId::Vadc => Some(1 << 0),
        PeripheralId::Ccu40 => Some(1 << 2),
        PeripheralId::Usic0 => Some(1 << 3),
        PeripheralId::Wdt => Some(1 << 9),
        PeripheralId::Rtc => Some(1 << 10),
        PeripheralId::Eru1 => None,
    }
}

#[inline]
fn read_clk(offset: usize) -> u32 {
    unsafe { read_volatile((SCU_CLK_BASE + offset) as *const u32) }
}

#[inline]
fn write_clk(offset: usize, value: u32) {
    unsafe { write_volatile((SCU_CLK_BASE + offset) as *mut u32, value) }
}

fn with_unlocked<R>(f: impl FnOnce() -> R) -> R {
    let passwd = (SCU_GENERAL_BASE + PASSWD_OFFSET) as *mut u32;
    unsafe { write_volatile(passwd, PASSWD_UNLOCK) };
    let result = f();
    unsafe { write_volatile(passwd, PASSWD_LOCK) };
    result
}

// ============================================================================
// Raw Hardware Functions
// ============================================================================

/// Start the clock of the modules in `mask` and wait until it runs.
pub fn ungate(mask: u32) {
    with_unlocked(|| write_clk(CGATCLR0_OFFSET, mask));

    while read_clk(CGATSTAT0_OFFSET) & mask != 0 {
        core::hint::spin_loop();
    }
}

/// Stop the clock of the modules in `mask`.
pub fn gate(mask: u32) {
    with_unlocked(|| write_clk(CGATSET0_OFFSET, mask));
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// XMC1100 clock gate controller.
#[derive(Debug)]
pub struct Xmc1100Scu;

impl Xmc1100Scu {
    /// Create a new gate controller.
    ///
    /// # Safety
    ///
    /// SCU registers must be accessible.
    pub const unsafe fn new() -> Self {
        Self
    }
}

impl PeripheralGate for Xmc1100Scu {
    fn enable_peripheral(&self, id: PeripheralId) {
        if let Some(mask) = clock_mask(id) {
            ungate(mask);
        }
    }

    fn disable_peripheral(&self, id: PeripheralId) {
        if let Some(mask) = clock_mask(id) {
            gate(mask);
        }
    }
}
