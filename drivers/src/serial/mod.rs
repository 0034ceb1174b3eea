//! Serial Transport
//!
//! Interrupt-driven UART channels with ring-buffered receive and transmit
//! paths.
//!
//! # Wiring a channel
//!
//! A board builds its channel as a `static` and exports the interrupt entry
//! point with [`serial_interrupt!`](crate::serial_interrupt):
//!
//! ```ignore
//! use xmc_drivers::platform::xmc1100::{self, Xmc1100Platform};
//! use xmc_drivers::peripheral::usic::UsicUart;
//! use xmc_drivers::serial::SerialChannel;
//!
//! static PLATFORM: Xmc1100Platform = Xmc1100Platform::xmc2go();
//! static SERIAL: SerialChannel<'static, Xmc1100Platform, UsicUart> = SerialChannel::new(
//!     &PLATFORM,
//!     unsafe { UsicUart::new(&xmc1100::pins::SERIAL_DEBUG) },
//!     xmc1100::pins::SERIAL_DEBUG,
//! );
//!
//! xmc_drivers::serial_interrupt!(USIC0_0_IRQHandler, SERIAL);
//!
//! fn main_loop() -> ! {
//!     SERIAL.begin(115200).ok();
//!     SERIAL.register_callback(|| {
//!         while let Some(byte) = SERIAL.read() {
//!             SERIAL.write(&[byte]);
//!         }
//!     });
//!     loop {
//!         SERIAL.poll_and_dispatch();
//!     }
//! }
//! ```

pub mod baud;
pub mod channel;

pub use channel::{DEFAULT_BUFFER_SIZE, LineState, SerialChannel, SerialEvent, SerialWriter};

/// Define the zero-argument interrupt handler for a `static` serial channel.
///
/// The handler is exported unmangled under the given name so the vector
/// table can reference it.
#[macro_export]
macro_rules! serial_interrupt {
    ($handler:ident, $channel:path) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn $handler() {
            $channel.on_interrupt();
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPlatform, MockUart, TEST_UART};

    static PLATFORM: MockPlatform = MockPlatform::new();
    static CHANNEL: SerialChannel<'static, MockPlatform, MockUart, 16, 16> =
        SerialChannel::new(&PLATFORM, MockUart::new(), TEST_UART);

    crate::serial_interrupt!(test_usic_irq_handler, CHANNEL);

    #[test]
    fn test_interrupt_entry_services_static_channel() {
        CHANNEL.begin(9600).unwrap();

        CHANNEL.hardware().inject_rx(b'?');
        CHANNEL.write(b"!");
        test_usic_irq_handler();

        assert_eq!(CHANNEL.read(), Some(b'?'));
        assert_eq!(CHANNEL.hardware().wire(), b"!".to_vec());
    }
}
