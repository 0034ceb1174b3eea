//! Board Resource Tables
//!
//! A resource table maps the logical pin numbers an application uses to the
//! physical pins and peripheral channels of one board, and lists the serial
//! channels the board wires up. Tables are `static` data, built at link time
//! and only ever read.
//!
//! Boards are selected by [`BoardId`] through [`board_table`] rather than by
//! conditional compilation of the table itself.

use core::fmt;

use crate::hal::gate::PeripheralId;
use crate::hal::gpio::{AltFunction, PinMode, PortPin};
use crate::hal::interrupt::IrqNumber;

/// Boards with a resource table in this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoardId {
    /// Infineon XMC 2Go kit (XMC1100).
    #[cfg(feature = "xmc1100")]
    Xmc2Go,
}

/// Peripheral channel reachable through a pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChannelBinding {
    /// Output of a PWM timer slice.
    Pwm { slice: u8 },
    /// Analog input channel.
    Adc { channel: u8 },
    /// External interrupt line.
    Interrupt { line: u8 },
}

/// One row of a board's pin table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Logical pin number, equal to the row's position in the table.
    pub index: u8,
    pub pin: PortPin,
    pub channel: Option<ChannelBinding>,
    /// Alternate function that routes `channel` to the pin.
    pub alt: Option<AltFunction>,
    /// The pin has no output driver.
    pub input_only: bool,
    /// Board silkscreen or schematic name.
    pub label: &'static str,
}

impl ResourceDescriptor {
    pub const fn gpio(index: u8, pin: PortPin, label: &'static str) -> Self {
        Self {
            index,
            pin,
            channel: None,
            alt: None,
            input_only: false,
            label,
        }
    }

    pub const fn with_channel(mut self, channel: ChannelBinding, alt: Option<AltFunction>) -> Self {
        self.channel = Some(channel);
        self.alt = alt;
        self
    }

    pub const fn input_only(mut self) -> Self {
        self.input_only = true;
        self
    }
}

/// Everything a serial channel needs to know about the UART it drives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UartResource {
    pub name: &'static str,
    /// Module to gate on `begin` and off on `end`.
    pub peripheral: PeripheralId,
    /// Base address of the UART channel registers.
    pub base: usize,
    pub tx: PortPin,
    pub tx_mode: PinMode,
    pub rx: PortPin,
    pub rx_mode: PinMode,
    /// Receive input selector for the DX0 input stage.
    pub dx0_select: u8,
    /// Receive input selector for the DX3 stage when DX0 is chained to it.
    pub dx3_select: Option<u8>,
    /// Interrupt vector the UART's service request is wired to.
    pub irq: IrqNumber,
    /// Service request output used for all UART events.
    pub service_request: u8,
}

/// A board's complete resource table.
#[derive(Debug)]
pub struct ResourceTable {
    pub board: BoardId,
    pub name: &'static str,
    pub pins: &'static [ResourceDescriptor],
    pub uarts: &'static [UartResource],
    /// Peripheral bus clock feeding the UART baud-rate generators.
    pub peripheral_clock_hz: u32,
}

impl ResourceTable {
    /// Look up a logical pin.
    pub fn lookup_pin(&self, index: u8) -> Result<&'static ResourceDescriptor, UnknownPinError> {
        let pins: &'static [ResourceDescriptor] = self.pins;
        pins.get(index as usize).ok_or(UnknownPinError { index })
    }

    /// Number of logical pins.
    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// External interrupt line wired to a logical pin, if any.
    pub fn interrupt_line(&self, index: u8) -> Option<u8> {
        match self.lookup_pin(index).ok()?.channel? {
            ChannelBinding::Interrupt { line } => Some(line),
            _ => None,
        }
    }

    /// Logical pin driven by a PWM slice.
    pub fn pwm_pin(&self, slice: u8) -> Option<&'static ResourceDescriptor> {
        let pins: &'static [ResourceDescriptor] = self.pins;
        pins.iter()
            .find(|d| d.channel == Some(ChannelBinding::Pwm { slice }))
    }

    /// Serial channel binding by index.
    pub fn uart(&self, index: usize) -> Option<&'static UartResource> {
        let uarts: &'static [UartResource] = self.uarts;
        uarts.get(index)
    }

    /// Check that every row sits at its own logical index and that no
    /// physical pin appears twice.
    pub fn is_consistent(&self) -> bool {
        self.pins.iter().enumerate().all(|(i, d)| {
            d.index as usize == i && self.pins[..i].iter().all(|other| other.pin != d.pin)
        })
    }
}

/// Resource table for a board.
pub fn board_table(board: BoardId) -> &'static ResourceTable {
    match board {
        #[cfg(feature = "xmc1100")]
        BoardId::Xmc2Go => &crate::platform::xmc1100::pins::XMC2GO,
    }
}

/// A logical pin number outside the board's table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnknownPinError {
    pub index: u8,
}

impl fmt::Display for UnknownPinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown logical pin {}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::gpio::Hysteresis;

    static PINS: [ResourceDescriptor; 3] = [
        ResourceDescriptor::gpio(0, PortPin::new(0, 0), "D0")
            .with_channel(ChannelBinding::Interrupt { line: 2 }, None),
        ResourceDescriptor::gpio(1, PortPin::new(0, 1), "D1")
            .with_channel(ChannelBinding::Pwm { slice: 3 }, Some(AltFunction::ALT4)),
        ResourceDescriptor::gpio(2, PortPin::new(1, 0), "A0")
            .with_channel(ChannelBinding::Adc { channel: 1 }, None)
            .input_only(),
    ];

    static UARTS: [UartResource; 1] = [UartResource {
        name: "test",
        peripheral: PeripheralId::Usic0,
        base: 0x4800_0000,
        tx: PortPin::new(2, 1),
        tx_mode: PinMode::AltPushPull(AltFunction::ALT6),
        rx: PortPin::new(2, 2),
        rx_mode: PinMode::input(Hysteresis::Standard),
        dx0_select: 6,
        dx3_select: Some(5),
        irq: 9,
        service_request: 0,
    }];

    static TABLE: ResourceTable = ResourceTable {
        board: BoardId::Xmc2Go,
        name: "test board",
        pins: &PINS,
        uarts: &UARTS,
        peripheral_clock_hz: 64_000_000,
    };

    #[test]
    fn test_lookup_pin_in_range() {
        let d = TABLE.lookup_pin(1).unwrap();
        assert_eq!(d.index, 1);
        assert_eq!(d.pin, PortPin::new(0, 1));
        assert_eq!(d.alt, Some(AltFunction::ALT4));
    }

    #[test]
    fn test_lookup_pin_out_of_range() {
        assert_eq!(TABLE.lookup_pin(3), Err(UnknownPinError { index: 3 }));
        assert_eq!(TABLE.lookup_pin(255), Err(UnknownPinError { index: 255 }));
    }

    #[test]
    fn test_channel_queries() {
        assert_eq!(TABLE.interrupt_line(0), Some(2));
        assert_eq!(TABLE.interrupt_line(1), None);
        assert_eq!(TABLE.interrupt_line(42), None);
        assert_eq!(TABLE.pwm_pin(3).map(|d| d.index), Some(1));
        assert!(TABLE.pwm_pin(0).is_none());
        assert!(TABLE.lookup_pin(2).unwrap().input_only);
    }

    #[test]
    fn test_uart_lookup() {
        assert_eq!(TABLE.uart(0).map(|u| u.irq), Some(9));
        assert!(TABLE.uart(1).is_none());
    }

    #[test]
    fn test_consistency_check() {
        assert!(TABLE.is_consistent());

        static BAD_INDEX: [ResourceDescriptor; 2] = [
            ResourceDescriptor::gpio(0, PortPin::new(0, 0), "D0"),
            ResourceDescriptor::gpio(0, PortPin::new(0, 1), "D1"),
        ];
        static DUPLICATE_PIN: [ResourceDescriptor; 2] = [
            ResourceDescriptor::gpio(0, PortPin::new(0, 0), "D0"),
            ResourceDescriptor::gpio(1, PortPin::new(0, 0), "D1"),
        ];

        let bad = ResourceTable { pins: &BAD_INDEX, ..TABLE_TEMPLATE };
        assert!(!bad.is_consistent());
        let dup = ResourceTable { pins: &DUPLICATE_PIN, ..TABLE_TEMPLATE };
        assert!(!dup.is_consistent());
    }

    const TABLE_TEMPLATE: ResourceTable = ResourceTable {
        board: BoardId::Xmc2Go,
        name: "template",
        pins: &[],
        uarts: &[],
        peripheral_clock_hz: 64_000_000,
    };

    #[test]
    fn test_unknown_pin_display() {
        assert_eq!(UnknownPinError { index: 20 }.to_string(), "unknown logical pin 20");
    }
}
