//! Cortex-M0 Nested Vectored Interrupt Controller

use crate::hal::interrupt::{InterruptController, IrqNumber};
use core::ptr::write_volatile;

/// Set-enable register.
const NVIC_ISER: usize = 0xE000_E100;
/// Clear-enable register.
const NVIC_ICER: usize = 0xE000_E180;
/// Clear-pending register.
const NVIC_ICPR: usize = 0xE000_E280;

/// Number of device interrupt lines.
pub const IRQ_COUNT: u32 = 32;

// ============================================================================
// Raw Hardware Functions
// ============================================================================

/// Discard a pending request, then unmask the line.
pub fn enable_irq(irq: u32) {
    if irq >= IRQ_COUNT {
        return;
    }
    unsafe {
        write_volatile(NVIC_ICPR as *mut u32, 1 << irq);
        write_volatile(NVIC_ISER as *mut u32, 1 << irq);
    }
}

/// Mask an interrupt line.
pub fn disable_irq(irq: u32) {
    if irq >= IRQ_COUNT {
        return;
    }
    unsafe {
        write_volatile(NVIC_ICER as *mut u32, 1 << irq);
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

#[derive(Debug)]
pub struct Nvic;

impl Nvic {
    /// # Safety
    ///
    /// Must run on a Cortex-M core.
    pub const unsafe fn new() -> Self {
        Self
    }
}

impl InterruptController for Nvic {
    fn enable(&self, irq: IrqNumber) {
        enable_irq(irq);
    }

    fn disable(&self, irq: IrqNumber) {
        disable_irq(irq);
    }
}
