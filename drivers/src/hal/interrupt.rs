//! Interrupt Controller Hardware Abstraction Layer.
//!
//! This module defines platform-independent traits for interrupt management.

/// Interrupt number type.
pub type IrqNumber = u32;

/// Interrupt controller trait.
///
/// This trait represents the system's interrupt controller. Masking and
/// unmasking a vector are single register writes and are infallible.
pub trait InterruptController {
    /// Enable (unmask) an interrupt line.
    fn enable(&self, irq: IrqNumber);

    /// Disable (mask) an interrupt line.
    fn disable(&self, irq: IrqNumber);
}
