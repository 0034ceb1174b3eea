//! Host-side stand-ins for board hardware, used by unit tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::vec::Vec;

use crate::hal::gate::{PeripheralGate, PeripheralId};
use crate::hal::gpio::{AltFunction, Hysteresis, PinMode, PinMux, PortPin};
use crate::hal::interrupt::{InterruptController, IrqNumber};
use crate::hal::serial::{
    BaudDivider, DataBits, SerialConfig, SerialHardware, SerialInterrupts, SerialStatus,
};
use crate::platform::Platform;
use crate::resource::{BoardId, ResourceDescriptor, ResourceTable, UartResource};

pub const TEST_UART: UartResource = UartResource {
    name: "uart-test",
    peripheral: PeripheralId::Usic0,
    base: 0,
    tx: PortPin::new(2, 1),
    tx_mode: PinMode::AltPushPull(AltFunction::ALT6),
    rx: PortPin::new(2, 2),
    rx_mode: PinMode::input(Hysteresis::Standard),
    dx0_select: 6,
    dx3_select: Some(5),
    irq: 9,
    service_request: 0,
};

static TEST_PINS: [ResourceDescriptor; 2] = [
    ResourceDescriptor::gpio(0, PortPin::new(2, 1), "TX"),
    ResourceDescriptor::gpio(1, PortPin::new(2, 2), "RX").input_only(),
];

static TEST_UARTS: [UartResource; 1] = [TEST_UART];

pub static TEST_TABLE: ResourceTable = ResourceTable {
    board: BoardId::Xmc2Go,
    name: "mock board",
    pins: &TEST_PINS,
    uarts: &TEST_UARTS,
    peripheral_clock_hz: 64_000_000,
};

/// Collaborator calls recorded by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    PeripheralEnabled(PeripheralId),
    PeripheralDisabled(PeripheralId),
    PinConfigured(PortPin, PinMode),
    IrqEnabled(IrqNumber),
    IrqDisabled(IrqNumber),
}

/// Platform that records every gate, pin and interrupt controller call.
pub struct MockPlatform {
    events: Mutex<Vec<MockEvent>>,
}

impl MockPlatform {
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<MockEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: MockEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl PeripheralGate for MockPlatform {
    fn enable_peripheral(&self, id: PeripheralId) {
        self.record(MockEvent::PeripheralEnabled(id));
    }

    fn disable_peripheral(&self, id: PeripheralId) {
        self.record(MockEvent::PeripheralDisabled(id));
    }
}

impl PinMux for MockPlatform {
    fn configure(&self, pin: PortPin, mode: PinMode) {
        self.record(MockEvent::PinConfigured(pin, mode));
    }
}

impl InterruptController for MockPlatform {
    fn enable(&self, irq: IrqNumber) {
        self.record(MockEvent::IrqEnabled(irq));
    }

    fn disable(&self, irq: IrqNumber) {
        self.record(MockEvent::IrqDisabled(irq));
    }
}

impl Platform for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn resources(&self) -> &'static ResourceTable {
        &TEST_TABLE
    }
}

struct UartState {
    config: Option<(SerialConfig, BaudDivider)>,
    interrupts: SerialInterrupts,
    rx_fifo: VecDeque<u8>,
    wire: Vec<u8>,
}

/// Simulated UART.
///
/// Received bytes are injected into a FIFO; transmitted bytes land on the
/// "wire". The transmitter is always ready, so the transmit-empty condition
/// is pending whenever its interrupt source is armed, and each interrupt
/// moves one byte. Every call other than `supports_frame` counts as a
/// register access.
pub struct MockUart {
    state: Mutex<UartState>,
    fault: AtomicBool,
    accesses: AtomicUsize,
}

impl MockUart {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(UartState {
                config: None,
                interrupts: SerialInterrupts::empty(),
                rx_fifo: VecDeque::new(),
                wire: Vec::new(),
            }),
            fault: AtomicBool::new(false),
            accesses: AtomicUsize::new(0),
        }
    }

    pub fn register_accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn access(&self) -> MutexGuard<'_, UartState> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap()
    }

    pub fn inject_rx(&self, byte: u8) {
        self.state.lock().unwrap().rx_fifo.push_back(byte);
    }

    pub fn wire(&self) -> Vec<u8> {
        self.state.lock().unwrap().wire.clone()
    }

    pub fn configuration(&self) -> Option<(SerialConfig, BaudDivider)> {
        self.state.lock().unwrap().config
    }

    pub fn interrupts(&self) -> SerialInterrupts {
        self.state.lock().unwrap().interrupts
    }

    pub fn raise_fault(&self) {
        self.fault.store(true, Ordering::SeqCst);
    }

    pub fn clear_fault(&self) {
        self.fault.store(false, Ordering::SeqCst);
    }
}

impl SerialHardware for MockUart {
    fn supports_frame(&self, config: &SerialConfig) -> bool {
        config.data_bits == DataBits::Eight
    }

    fn configure(&self, config: &SerialConfig, divider: BaudDivider) {
        let mut state = self.access();
        state.config = Some((*config, divider));
        state.interrupts = SerialInterrupts::empty();
    }

    fn shutdown(&self) {
        self.access().interrupts = SerialInterrupts::empty();
    }

    fn status(&self) -> SerialStatus {
        let state = self.access();
        let mut status = SerialStatus::empty();

        if self.fault.load(Ordering::SeqCst) {
            status |= SerialStatus::FAULT;
        }
        if state.interrupts.contains(SerialInterrupts::RX) && !state.rx_fifo.is_empty() {
            status |= SerialStatus::RX_READY;
        }
        if state.interrupts.contains(SerialInterrupts::TX_EMPTY) {
            status |= SerialStatus::TX_EMPTY;
        }

        status
    }

    fn read_data(&self) -> u8 {
        self.access().rx_fifo.pop_front().unwrap_or(0)
    }

    fn write_data(&self, byte: u8) {
        self.access().wire.push(byte);
    }

    fn enable_interrupts(&self, sources: SerialInterrupts) {
        self.access().interrupts |= sources;
    }

    fn disable_interrupts(&self, sources: SerialInterrupts) {
        self.access().interrupts &= !sources;
    }

    fn is_busy(&self) -> bool {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        false
    }
}
