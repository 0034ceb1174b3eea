//! Serial Port (UART) Hardware Abstraction Layer.
//!
//! This module defines the register-level interface a UART must offer to be
//! driven by [`SerialChannel`](crate::serial::SerialChannel), along with the
//! configuration and error types shared by every serial implementation.

use core::fmt;

bitflags::bitflags! {
    /// Pending conditions reported by the UART to its interrupt handler.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct SerialStatus: u8 {
        /// A received byte is waiting in the data register.
        const RX_READY = 1 << 0;
        /// The transmit data register can accept a byte and the
        /// transmit-empty interrupt source is armed.
        const TX_EMPTY = 1 << 1;
        /// The peripheral entered a state it cannot leave on its own.
        const FAULT = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Interrupt sources inside the UART peripheral.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct SerialInterrupts: u8 {
        /// Raise an interrupt when a byte has been received.
        const RX = 1 << 0;
        /// Raise an interrupt while the transmit data register is empty.
        const TX_EMPTY = 1 << 1;
    }
}

/// Serial port configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Number of data bits per frame.
    pub data_bits: DataBits,
    /// Parity checking mode.
    pub parity: Parity,
    /// Number of stop bits.
    pub stop_bits: StopBits,
}

impl SerialConfig {
    /// Create a standard 8N1 configuration at the specified baud rate.
    ///
    /// 8N1 means: 8 data bits, no parity, 1 stop bit.
    pub const fn new_8n1(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for SerialConfig {
    /// Default configuration: 115200 baud, 8N1.
    fn default() -> Self {
        Self::new_8n1(115200)
    }
}

/// Number of data bits per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    pub const fn count(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

/// Parity mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    /// No parity bit.
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Number of stop bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    /// One stop bit.
    One,
    /// Two stop bits.
    Two,
}

/// Baud-rate generator settings for a fractional-divider UART.
///
/// The resulting rate is `f_clk * step / 1024 / (pdiv * oversampling)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BaudDivider {
    /// Fractional divider step, `1..=1023`.
    pub step: u16,
    /// Integer pre-divider, `1..=1024`.
    pub pdiv: u16,
    /// Samples per bit.
    pub oversampling: u8,
    /// Rate actually produced by these settings.
    pub actual_baud: u32,
}

/// Errors returned when a serial channel cannot be configured.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A baud rate of zero was requested.
    ZeroBaudRate,
    /// No divider setting produces the requested rate within tolerance.
    BaudRateOutOfTolerance { requested: u32 },
    /// The frame format is not supported by the peripheral.
    UnsupportedFrame,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ZeroBaudRate => write!(f, "baud rate must be non-zero"),
            ConfigurationError::BaudRateOutOfTolerance { requested } => {
                write!(f, "baud rate {} cannot be generated within tolerance", requested)
            }
            ConfigurationError::UnsupportedFrame => write!(f, "unsupported frame format"),
        }
    }
}

/// Serial port errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// Operation would block but non-blocking mode was requested.
    WouldBlock,
    /// The channel has not been started with `begin`.
    NotEnabled,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::WouldBlock => write!(f, "transmit buffer full"),
            SerialError::NotEnabled => write!(f, "serial channel not enabled"),
        }
    }
}

/// Register-level UART access.
///
/// Every method takes `&self`: the registers are shared between the
/// interrupt handler and application code, and implementations are expected
/// to be thin wrappers over volatile accesses.
pub trait SerialHardware {
    /// Whether the peripheral can produce this frame format.
    fn supports_frame(&self, _config: &SerialConfig) -> bool {
        true
    }

    /// Program frame format and baud-rate generator, and start the module.
    ///
    /// All interrupt sources are left disabled.
    fn configure(&self, config: &SerialConfig, divider: BaudDivider);

    /// Stop the module and disable all of its interrupt sources.
    fn shutdown(&self);

    /// Conditions the interrupt handler has to service.
    fn status(&self) -> SerialStatus;

    /// Read the received byte and acknowledge the receive condition.
    fn read_data(&self) -> u8;

    /// Hand a byte to the transmitter.
    fn write_data(&self, byte: u8);

    fn enable_interrupts(&self, sources: SerialInterrupts);

    fn disable_interrupts(&self, sources: SerialInterrupts);

    /// Check if the serial port is busy transmitting.
    fn is_busy(&self) -> bool;
}
