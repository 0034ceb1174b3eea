//! XMC1100 Port Controller
//!
//! This module provides both raw hardware access and the HAL pin-mux
//! implementation for the XMC1100 ports.

use crate::hal::gpio::{Hysteresis, PinMode, PinMux, PortPin, PullMode};
use core::ptr::{read_volatile, write_volatile};

/// PORT0 base address. Port `n` lives at `PORT_BASE + n * PORT_STRIDE`.
pub const PORT_BASE: usize = 0x4004_0000;
const PORT_STRIDE: usize = 0x100;

/// Highest port number on this device.
pub const MAX_PORT: u8 = 2;

const IOCR_OFFSET: usize = 0x10;
const PHCR_OFFSET: usize = 0x40;
const PDISC_OFFSET: usize = 0x60;

/// Port with analog-capable pins whose digital input starts disabled.
const ANALOG_PORT: u8 = 2;

// IOCR port control codes (5 bits per pin)
const PC_INPUT: u32 = 0b00000;
const PC_INPUT_PULL_DOWN: u32 = 0b00001;
const PC_INPUT_PULL_UP: u32 = 0b00010;
const PC_PUSH_PULL: u32 = 0b10000;
const PC_OPEN_DRAIN: u32 = 0b11000;

/// Port control code for a pin mode.
pub const fn port_control(mode: PinMode) -> u32 {
    match mode {
        PinMode::Input { pull, .. } => match pull {
            PullMode::None => PC_INPUT,
            PullMode::Down => PC_INPUT_PULL_DOWN,
            PullMode::Up => PC_INPUT_PULL_UP,
        },
        PinMode::PushPull => PC_PUSH_PULL,
        PinMode::AltPushPull(alt) => PC_PUSH_PULL | alt.index() as u32,
        PinMode::AltOpenDrain(alt) => PC_OPEN_DRAIN | alt.index() as u32,
    }
}

/// Register offset and bit shift of a pin's `IOCR` field.
const fn iocr_field(pin: u8) -> (usize, u32) {
    let reg = IOCR_OFFSET + 4 * (pin as usize / 4);
    let shift = (pin as u32 % 4) * 8 + 3;
    (reg, shift)
}

/// Register offset and bit of a pin's hysteresis selector in `PHCR`.
const fn phcr_bit(pin: u8) -> (usize, u32) {
    let reg = PHCR_OFFSET + 4 * (pin as usize / 8);
    let bit = (pin as u32 % 8) * 4 + 2;
    (reg, bit)
}

#[inline(always)]
fn port_reg(port: u8, offset: usize) -> *mut u32 {
    (PORT_BASE + port as usize * PORT_STRIDE + offset) as *mut u32
}

fn modify(reg: *mut u32, clear: u32, set: u32) {
    unsafe {
        let val = read_volatile(reg);
        write_volatile(reg, (val & !clear) | set);
    }
}

// ============================================================================
// Raw Hardware Functions
// ============================================================================

/// Configure a pin's driver.
///
/// Pins outside the device are ignored.
pub fn set_mode(pin: PortPin, mode: PinMode) {
    if pin.port > MAX_PORT || pin.pin > 15 {
        return;
    }

    if let PinMode::Input { hysteresis, .. } = mode {
        let (reg, bit) = phcr_bit(pin.pin);
        let large = match hysteresis {
            Hysteresis::Standard => 0,
            Hysteresis::Large => 1 << bit,
        };
        modify(port_reg(pin.port, reg), 1 << bit, large);
    }

    if pin.port == ANALOG_PORT {
        modify(port_reg(pin.port, PDISC_OFFSET), 1 << pin.pin, 0);
    }

    let (reg, shift) = iocr_field(pin.pin);
    modify(
        port_reg(pin.port, reg),
        0b11111 << shift,
        port_control(mode) << shift,
    );
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// XMC1100 port controller.
#[derive(Debug)]
pub struct Xmc1100Ports;

impl Xmc1100Ports {
    /// # Safety
    ///
    /// Port registers must be accessible.
    pub const unsafe fn new() -> Self {
        Self
    }
}

impl PinMux for Xmc1100Ports {
    fn configure(&self, pin: PortPin, mode: PinMode) {
        set_mode(pin, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::gpio::AltFunction;

    #[test]
    fn test_port_control_codes() {
        assert_eq!(port_control(PinMode::input(Hysteresis::Standard)), 0b00000);
        assert_eq!(
            port_control(PinMode::Input { pull: PullMode::Up, hysteresis: Hysteresis::Large }),
            0b00010
        );
        assert_eq!(port_control(PinMode::PushPull), 0b10000);
        assert_eq!(port_control(PinMode::AltPushPull(AltFunction::ALT6)), 0b10110);
        assert_eq!(port_control(PinMode::AltOpenDrain(AltFunction::ALT7)), 0b11111);
    }

    #[test]
    fn test_register_fields() {
        assert_eq!(iocr_field(0), (0x10, 3));
        assert_eq!(iocr_field(6), (0x14, 19));
        assert_eq!(iocr_field(15), (0x1C, 27));
        assert_eq!(phcr_bit(2), (0x40, 10));
        assert_eq!(phcr_bit(9), (0x44, 6));
    }
}
