//! Peripheral Lifecycle Gate.
//!
//! A peripheral must have its clock ungated and its reset released before
//! its registers respond. This module names the gateable modules and defines
//! the trait platforms implement to switch them on and off.

/// On-chip modules with their own clock gate and/or reset line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PeripheralId {
    /// Versatile analog-to-digital converter.
    Vadc,
    /// Capture/compare unit 4, module 0.
    Ccu40,
    /// Universal serial interface channel module 0.
    Usic0,
    /// Event request unit 1.
    Eru1,
    /// Watchdog timer.
    Wdt,
    /// Real-time clock.
    Rtc,
}

impl PeripheralId {
    pub const fn name(self) -> &'static str {
        match self {
            PeripheralId::Vadc => "VADC",
            PeripheralId::Ccu40 => "CCU40",
            PeripheralId::Usic0 => "USIC0",
            PeripheralId::Eru1 => "ERU1",
            PeripheralId::Wdt => "WDT",
            PeripheralId::Rtc => "RTC",
        }
    }
}

/// Clock gating and reset control.
///
/// Both operations are idempotent and cannot fail: enabling an already
/// running module or disabling a stopped one has no further effect.
pub trait PeripheralGate {
    /// Ungate the module's clock, then release it from reset.
    fn enable_peripheral(&self, id: PeripheralId);

    /// Hold the module in reset, then gate its clock.
    fn disable_peripheral(&self, id: PeripheralId);
}
