//! Interrupt-driven serial channel.

use core::fmt;
use core::sync::atomic::{AtomicPtr, AtomicU8, AtomicU32, Ordering};

use common::sync::RingBuffer;

use super::baud;
use crate::hal::serial::{
    ConfigurationError, SerialConfig, SerialError, SerialHardware, SerialInterrupts, SerialStatus,
};
use crate::platform::Platform;
use crate::resource::UartResource;

/// Ring buffer size used when a board does not pick its own.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Application hook run by [`SerialChannel::poll_and_dispatch`] when data is
/// waiting.
pub type SerialEvent = fn();

/// Line state of a [`SerialChannel`].
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineState {
    Disabled = 0,
    /// `begin` is bringing the hardware up.
    Enabling = 1,
    Enabled = 2,
    /// The hardware reported a fault. Only `begin` leaves this state.
    ErrorHalted = 3,
}

impl LineState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => LineState::Enabling,
            2 => LineState::Enabled,
            3 => LineState::ErrorHalted,
            _ => LineState::Disabled,
        }
    }
}

/// A UART driven through receive and transmit ring buffers.
///
/// The interrupt handler ([`on_interrupt`](Self::on_interrupt)) moves bytes
/// between the hardware and the buffers; the application reads from the
/// receive buffer and writes into the transmit buffer. Each buffer has
/// exactly one producer and one consumer:
///
/// | buffer | producer    | consumer    |
/// |--------|-------------|-------------|
/// | RX     | interrupt   | application |
/// | TX     | application | interrupt   |
///
/// so no lock is taken anywhere. Every method takes `&self`, which lets a
/// channel live in a `static` that both the vector table and the
/// application reach.
///
/// # Usage constraints
///
/// - All methods other than `on_interrupt` belong to one application
///   context. Calling `end` while a `write` is in progress elsewhere is not
///   supported.
/// - Receive overflow is lossy: a byte arriving while the receive buffer is
///   full is dropped and only counted (see [`overruns`](Self::overruns)).
///   Nothing tells the far end to slow down.
/// - `end` discards whatever is still queued for transmission.
pub struct SerialChannel<
    'p,
    P,
    H,
    const RX: usize = DEFAULT_BUFFER_SIZE,
    const TX: usize = DEFAULT_BUFFER_SIZE,
> {
    platform: &'p P,
    hw: H,
    resource: UartResource,
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
    state: AtomicU8,
    overruns: AtomicU32,
    baud: AtomicU32,
    // `SerialEvent` as a data pointer, null when unset
    callback: AtomicPtr<()>,
}

impl<'p, P, H, const RX: usize, const TX: usize> SerialChannel<'p, P, H, RX, TX>
where
    P: Platform,
    H: SerialHardware,
{
    /// Bind a UART to a channel. The channel starts out disabled.
    ///
    /// Only one channel may be built per UART resource.
    pub const fn new(platform: &'p P, hw: H, resource: UartResource) -> Self {
        Self {
            platform,
            hw,
            resource,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            state: AtomicU8::new(LineState::Disabled as u8),
            overruns: AtomicU32::new(0),
            baud: AtomicU32::new(0),
            callback: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Start the channel at `baud_rate`, 8N1.
    pub fn begin(&self, baud_rate: u32) -> Result<(), ConfigurationError> {
        self.begin_with(SerialConfig::new_8n1(baud_rate))
    }

    /// Start the channel with an explicit frame format.
    ///
    /// The configuration is validated before any hardware is touched; on
    /// error the channel keeps its previous state. Calling this on a running
    /// or halted channel restarts it, discarding both buffers.
    pub fn begin_with(&self, config: SerialConfig) -> Result<(), ConfigurationError> {
        let name = self.resource.name;

        if !self.hw.supports_frame(&config) {
            log::warn!("{}: unsupported frame format {:?}", name, config);
            return Err(ConfigurationError::UnsupportedFrame);
        }

        let divider = baud::calculate(self.platform.peripheral_clock_hz(), config.baud_rate)
            .inspect_err(|e| log::warn!("{}: {}", name, e))?;

        match self.state() {
            LineState::Disabled => {}
            LineState::ErrorHalted => {
                log::info!("{}: restarting after hardware fault", name);
                self.quiesce();
            }
            LineState::Enabling | LineState::Enabled => self.quiesce(),
        }

        self.set_state(LineState::Enabling);

        let r = &self.resource;
        self.platform.enable_peripheral(r.peripheral);
        self.platform.configure(r.rx, r.rx_mode);
        self.platform.configure(r.tx, r.tx_mode);
        self.hw.configure(&config, divider);

        self.rx.flush();
        self.tx.flush();
        self.overruns.store(0, Ordering::Relaxed);
        self.baud.store(divider.actual_baud, Ordering::Relaxed);

        self.hw.enable_interrupts(SerialInterrupts::RX);
        self.platform.enable(r.irq);

        self.set_state(LineState::Enabled);

        log::debug!(
            "{}: enabled at {} baud (requested {}, step {}, pdiv {}), tx {} rx {} irq {}",
            name,
            divider.actual_baud,
            config.baud_rate,
            divider.step,
            divider.pdiv,
            r.tx,
            r.rx,
            r.irq
        );

        Ok(())
    }

    /// Stop the channel and gate its peripheral.
    ///
    /// Bytes still queued for transmission are discarded, not drained. Bytes
    /// already received stay readable. Does nothing on a disabled channel,
    /// whose peripheral is already gated.
    pub fn end(&self) {
        if self.state() == LineState::Disabled {
            return;
        }

        self.quiesce();
        self.platform.disable_peripheral(self.resource.peripheral);

        let discarded = self.tx.available();
        self.tx.flush();
        self.baud.store(0, Ordering::Relaxed);
        self.set_state(LineState::Disabled);

        if discarded > 0 {
            log::debug!("{}: disabled, {} queued bytes dropped", self.resource.name, discarded);
        } else {
            log::debug!("{}: disabled", self.resource.name);
        }
    }

    /// Queue `bytes` for transmission.
    ///
    /// Spins while the transmit buffer is full. There is no timeout: if the
    /// channel is not enabled, or the hardware never drains, this never
    /// returns. Use [`try_write`](Self::try_write) for a bounded variant.
    ///
    /// The UART is only touched while the channel is enabled; bytes written
    /// to a stopped channel stay queued until the next `begin` discards them.
    pub fn write(&self, bytes: &[u8]) {
        for &byte in bytes {
            while !self.tx.try_push(byte) {
                core::hint::spin_loop();
            }
            if self.state() == LineState::Enabled {
                self.hw.enable_interrupts(SerialInterrupts::TX_EMPTY);
            }
        }
    }

    /// Queue as much of `bytes` as fits without waiting.
    ///
    /// Returns the number of bytes queued, or `WouldBlock` if the buffer
    /// had no room at all for a non-empty `bytes`.
    pub fn try_write(&self, bytes: &[u8]) -> Result<usize, SerialError> {
        if self.state() != LineState::Enabled {
            return Err(SerialError::NotEnabled);
        }

        let queued = bytes.iter().take_while(|&&b| self.tx.try_push(b)).count();

        if queued > 0 {
            self.hw.enable_interrupts(SerialInterrupts::TX_EMPTY);
        } else if !bytes.is_empty() {
            return Err(SerialError::WouldBlock);
        }

        Ok(queued)
    }

    /// Wait until every queued byte has left the transmitter.
    ///
    /// Returns immediately unless the channel is enabled, and stops waiting
    /// if the channel halts.
    pub fn flush(&self) {
        while self.state() == LineState::Enabled && (!self.tx.is_empty() || self.hw.is_busy()) {
            core::hint::spin_loop();
        }
    }

    /// Take the oldest received byte.
    pub fn read(&self) -> Option<u8> {
        self.rx.try_pop()
    }

    /// Look at the oldest received byte without taking it.
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Number of received bytes waiting to be read.
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Room left in the transmit buffer.
    pub fn available_for_write(&self) -> usize {
        self.tx.free()
    }

    /// Received bytes dropped because the receive buffer was full, since the
    /// last `begin`.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> LineState {
        LineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Baud rate the hardware actually runs at, while started.
    pub fn baud_rate(&self) -> Option<u32> {
        match self.baud.load(Ordering::Relaxed) {
            0 => None,
            baud => Some(baud),
        }
    }

    pub fn resource(&self) -> &UartResource {
        &self.resource
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Install the hook run by [`poll_and_dispatch`](Self::poll_and_dispatch).
    pub fn register_callback(&self, callback: SerialEvent) {
        self.callback.store(callback as *mut (), Ordering::Release);
    }

    pub fn clear_callback(&self) {
        self.callback.store(core::ptr::null_mut(), Ordering::Release);
    }

    /// Run the registered hook once if received data is waiting.
    ///
    /// Meant to be called once per main-loop iteration. Never blocks.
    pub fn poll_and_dispatch(&self) {
        if self.available() == 0 {
            return;
        }

        if let Some(callback) = self.callback() {
            callback();
        }
    }

    /// Interrupt service routine body.
    ///
    /// Handles at most one received and one transmitted byte per call.
    /// Never blocks, never logs.
    pub fn on_interrupt(&self) {
        let status = self.hw.status();

        if status.contains(SerialStatus::FAULT) {
            self.quiesce();
            self.set_state(LineState::ErrorHalted);
            return;
        }

        if status.contains(SerialStatus::RX_READY) {
            let byte = self.hw.read_data();
            if !self.rx.try_push(byte) {
                // the interrupt handler is the only writer
                let count = self.overruns.load(Ordering::Relaxed);
                self.overruns.store(count.wrapping_add(1), Ordering::Relaxed);
            }
        }

        if status.contains(SerialStatus::TX_EMPTY) {
            if let Some(byte) = self.tx.try_pop() {
                self.hw.write_data(byte);
            }
            if self.tx.is_empty() {
                self.hw.disable_interrupts(SerialInterrupts::TX_EMPTY);
                // a write may have queued and armed between the check and the disarm
                if !self.tx.is_empty() {
                    self.hw.enable_interrupts(SerialInterrupts::TX_EMPTY);
                }
            }
        }
    }

    /// Mask the vector and stop the UART, leaving the clock running.
    fn quiesce(&self) {
        self.platform.disable(self.resource.irq);
        self.hw.shutdown();
    }

    fn set_state(&self, state: LineState) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn callback(&self) -> Option<SerialEvent> {
        let raw = self.callback.load(Ordering::Acquire);
        if raw.is_null() {
            return None;
        }
        // SAFETY: only `register_callback` stores non-null values, and it
        // stores a `SerialEvent` cast to a pointer.
        Some(unsafe { core::mem::transmute::<*mut (), SerialEvent>(raw) })
    }
}

/// Wrapper type to implement `core::fmt::Write` for a serial channel.
/// This allows using write!/writeln! macros.
pub struct SerialWriter<'c, 'p, P, H, const RX: usize, const TX: usize>(
    pub &'c SerialChannel<'p, P, H, RX, TX>,
);

impl<P, H, const RX: usize, const TX: usize> fmt::Write for SerialWriter<'_, '_, P, H, RX, TX>
where
    P: Platform,
    H: SerialHardware,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // Convert line endings
            if byte == b'\n' {
                self.0.write(b"\r");
            }
            self.0.write(&[byte]);
        }
        Ok(())
    }
}
