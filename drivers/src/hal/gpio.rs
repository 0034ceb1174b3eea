//! GPIO (General Purpose Input/Output) Hardware Abstraction Layer.
//!
//! This module defines platform-independent types for pin routing: which
//! physical pin a signal lives on, and how that pin's driver is set up.

use core::fmt;

/// GPIO port number.
pub type Port = u8;

/// A physical pin, identified by port and bit position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortPin {
    pub port: Port,
    pub pin: u8,
}

impl PortPin {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }
}

impl fmt::Display for PortPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{}", self.port, self.pin)
    }
}

/// Alternate output function selector (ALT1..ALT7).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AltFunction(u8);

impl AltFunction {
    pub const ALT1: Self = Self(1);
    pub const ALT2: Self = Self(2);
    pub const ALT3: Self = Self(3);
    pub const ALT4: Self = Self(4);
    pub const ALT5: Self = Self(5);
    pub const ALT6: Self = Self(6);
    pub const ALT7: Self = Self(7);

    /// Returns `None` for selectors outside `1..=7`.
    pub const fn new(index: u8) -> Option<Self> {
        if index >= 1 && index <= 7 {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Input stage hysteresis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hysteresis {
    Standard,
    Large,
}

/// Internal pull resistor configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PullMode {
    /// No pull resistor (high impedance).
    None,
    /// Enable internal pull-up resistor.
    Up,
    /// Enable internal pull-down resistor.
    Down,
}

/// Pin driver configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinMode {
    /// Digital input.
    Input { pull: PullMode, hysteresis: Hysteresis },
    /// Plain push-pull output driven by the port's output register.
    PushPull,
    /// Push-pull output driven by a peripheral signal.
    AltPushPull(AltFunction),
    /// Open-drain output driven by a peripheral signal.
    AltOpenDrain(AltFunction),
}

impl PinMode {
    /// Tristate input with the given hysteresis, as used for receive lines.
    pub const fn input(hysteresis: Hysteresis) -> Self {
        PinMode::Input {
            pull: PullMode::None,
            hysteresis,
        }
    }
}

/// Pin multiplexer.
///
/// Routes physical pins to GPIO or peripheral functions. Configuration is a
/// plain register write and cannot fail at this layer; validity of the pin
/// and function is guaranteed by the board's resource table.
pub trait PinMux {
    fn configure(&self, pin: PortPin, mode: PinMode);
}
