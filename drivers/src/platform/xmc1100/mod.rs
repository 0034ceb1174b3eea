//! Infineon XMC1100 (Cortex-M0) platform.

mod gpio;
mod nvic;
pub mod pins;
mod scu;

use super::Platform;
use crate::hal::gate::{PeripheralGate, PeripheralId};
use crate::hal::gpio::{PinMode, PinMux, PortPin};
use crate::hal::interrupt::{InterruptController, IrqNumber};
use crate::resource::ResourceTable;
use gpio::Xmc1100Ports;
use nvic::Nvic;
use scu::Xmc1100Scu;

/// Board context for an XMC1100 board.
///
/// Owns the device-level controllers and the board's resource table. Build
/// it once, typically as a `static`, and pass it by reference to drivers.
pub struct Xmc1100Platform {
    resources: &'static ResourceTable,
    scu: Xmc1100Scu,
    ports: Xmc1100Ports,
    nvic: Nvic,
}

impl Xmc1100Platform {
    /// Platform context for a board described by `resources`.
    pub const fn new(resources: &'static ResourceTable) -> Self {
        // SAFETY: this type is only meaningful on an XMC1100, where the SCU,
        // port and NVIC registers are always mapped.
        unsafe {
            Self {
                resources,
                scu: Xmc1100Scu::new(),
                ports: Xmc1100Ports::new(),
                nvic: Nvic::new(),
            }
        }
    }

    /// Platform context for the XMC 2Go kit.
    pub const fn xmc2go() -> Self {
        Self::new(&pins::XMC2GO)
    }
}

impl PeripheralGate for Xmc1100Platform {
    fn enable_peripheral(&self, id: PeripheralId) {
        self.scu.enable_peripheral(id);
    }

    fn disable_peripheral(&self, id: PeripheralId) {
        self.scu.disable_peripheral(id);
    }
}

impl PinMux for Xmc1100Platform {
    fn configure(&self, pin: PortPin, mode: PinMode) {
        self.ports.configure(pin, mode);
    }
}

impl InterruptController for Xmc1100Platform {
    fn enable(&self, irq: IrqNumber) {
        self.nvic.enable(irq);
    }

    fn disable(&self, irq: IrqNumber) {
        self.nvic.disable(irq);
    }
}

impl Platform for Xmc1100Platform {
    fn name(&self) -> &'static str {
        "XMC1100 (Cortex-M0)"
    }

    fn resources(&self) -> &'static ResourceTable {
        self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xmc2go_context() {
        // Building the context touches no registers.
        let platform = Xmc1100Platform::xmc2go();
        assert_eq!(platform.name(), "XMC1100 (Cortex-M0)");
        assert!(core::ptr::eq(platform.resources(), &pins::XMC2GO));
        assert_eq!(platform.peripheral_clock_hz(), pins::PCLK_HZ);
    }
}
