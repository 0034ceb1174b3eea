//! XMC 2Go board resources.
//!
//! Logical pin numbering follows the board's header labels. Pins 16 and 17
//! carry the debug UART that is bridged to the host over the on-board
//! debugger.

use crate::hal::gate::PeripheralId;
use crate::hal::gpio::{AltFunction, Hysteresis, PinMode, PortPin};
use crate::hal::interrupt::IrqNumber;
use crate::resource::{BoardId, ChannelBinding, ResourceDescriptor, ResourceTable, UartResource};

/// Peripheral bus clock.
pub const PCLK_HZ: u32 = 64_000_000;

/// USIC0 channel 0 register base.
pub const USIC0_CH0_BASE: usize = 0x4800_0000;

/// USIC0 service request 0 vector.
pub const USIC0_0_IRQ: IrqNumber = 9;

// USIC0 channel 0 input selectors
const DX0_FROM_DX3: u8 = 6;
const DX3_P2_2: u8 = 5;
const DX3_P2_6: u8 = 4;

const PORT0: u8 = 0;
const PORT1: u8 = 1;
const PORT2: u8 = 2;

const PWM_ALT: Option<AltFunction> = Some(AltFunction::ALT4);

const fn pin(index: u8, port: u8, bit: u8, label: &'static str) -> ResourceDescriptor {
    ResourceDescriptor::gpio(index, PortPin::new(port, bit), label)
}

const fn pwm(slice: u8) -> ChannelBinding {
    ChannelBinding::Pwm { slice }
}

const fn adc(channel: u8) -> ChannelBinding {
    ChannelBinding::Adc { channel }
}

static PINS: [ResourceDescriptor; 18] = [
    pin(0, PORT0, 6, "SPI-MISO"),
    pin(1, PORT0, 7, "SPI-MOSI/PWM40-1").with_channel(pwm(1), PWM_ALT),
    pin(2, PORT0, 8, "SPI-SCK/PWM40-2").with_channel(pwm(2), PWM_ALT),
    pin(3, PORT0, 9, "SPI-SS/PWM40-3").with_channel(pwm(3), PWM_ALT),
    pin(4, PORT0, 14, "GPIO"),
    pin(5, PORT0, 15, "GPIO"),
    pin(6, PORT2, 0, "TX"),
    pin(7, PORT2, 6, "RX").input_only(),
    pin(8, PORT0, 5, "PWM40-0").with_channel(pwm(0), PWM_ALT),
    pin(9, PORT0, 0, "INT0").with_channel(ChannelBinding::Interrupt { line: 0 }, None),
    pin(10, PORT2, 11, "SCL/A3").with_channel(adc(4), None),
    pin(11, PORT2, 10, "SDA/A2").with_channel(adc(3), None),
    pin(12, PORT2, 9, "A1").with_channel(adc(2), None).input_only(),
    pin(13, PORT2, 7, "A0").with_channel(adc(1), None).input_only(),
    pin(14, PORT1, 1, "LED1"),
    pin(15, PORT1, 0, "LED2"),
    pin(16, PORT2, 1, "DEBUG_TX"),
    pin(17, PORT2, 2, "DEBUG_RX").input_only(),
];

/// Built-in LED.
pub const LED_BUILTIN: u8 = 14;

/// Serial routed to the host through the debug probe (default).
pub const SERIAL_DEBUG: UartResource = UartResource {
    name: "usic0-ch0-debug",
    peripheral: PeripheralId::Usic0,
    base: USIC0_CH0_BASE,
    tx: PortPin::new(PORT2, 1),
    tx_mode: PinMode::AltPushPull(AltFunction::ALT6),
    rx: PortPin::new(PORT2, 2),
    rx_mode: PinMode::input(Hysteresis::Standard),
    dx0_select: DX0_FROM_DX3,
    dx3_select: Some(DX3_P2_2),
    irq: USIC0_0_IRQ,
    service_request: 0,
};

/// The same USIC channel routed to header pins 6 and 7 instead.
///
/// Binds the same hardware as [`SERIAL_DEBUG`]; use one or the other.
pub const SERIAL_ONBOARD: UartResource = UartResource {
    name: "usic0-ch0-onboard",
    tx: PortPin::new(PORT2, 0),
    rx: PortPin::new(PORT2, 6),
    dx3_select: Some(DX3_P2_6),
    ..SERIAL_DEBUG
};

static UARTS: [UartResource; 1] = [SERIAL_DEBUG];

pub static XMC2GO: ResourceTable = ResourceTable {
    board: BoardId::Xmc2Go,
    name: "XMC 1100 XMC2GO",
    pins: &PINS,
    uarts: &UARTS,
    peripheral_clock_hz: PCLK_HZ,
};
