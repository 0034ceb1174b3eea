//! Infineon USIC Channel in ASC (UART) Mode
//!
//! This module drives one channel of a Universal Serial Interface Channel
//! module as an asynchronous serial port. Data moves one word at a time
//! through the single transmit buffer and the receive buffer; the FIFO is
//! left unused.
//!
//! All three interrupt events this driver uses (transmit buffer, receive and
//! alternative receive) are routed to the same service request output, so a
//! single vector services the whole channel.
//!
//! # Example
//!
//! ```ignore
//! use xmc_drivers::peripheral::usic::UsicUart;
//! use xmc_drivers::platform::xmc1100::pins::SERIAL_DEBUG;
//!
//! let uart = unsafe { UsicUart::new(&SERIAL_DEBUG) };
//! ```

use crate::hal::serial::{
    BaudDivider, Parity, SerialConfig, SerialHardware, SerialInterrupts, SerialStatus, StopBits,
};
use crate::resource::UartResource;
use core::ptr::{read_volatile, write_volatile};

// Register offsets
const KSCFG_OFFSET: usize = 0x0C;
const FDR_OFFSET: usize = 0x10;
const BRG_OFFSET: usize = 0x14;
const INPR_OFFSET: usize = 0x18;
const DX0CR_OFFSET: usize = 0x1C;
const DX3CR_OFFSET: usize = 0x28;
const SCTR_OFFSET: usize = 0x34;
const TCSR_OFFSET: usize = 0x38;
const PCR_OFFSET: usize = 0x3C;
const CCR_OFFSET: usize = 0x40;
const PSR_OFFSET: usize = 0x48;
const PSCR_OFFSET: usize = 0x4C;
const RBUF_OFFSET: usize = 0x54;
const FMR_OFFSET: usize = 0x68;
const TBUF0_OFFSET: usize = 0x80;

// Kernel State Configuration (KSCFG) bits
const KSCFG_MODEN: u32 = 1 << 0;
const KSCFG_BPMODEN: u32 = 1 << 1;

// Fractional Divider (FDR)
const FDR_DM_FRACTIONAL: u32 = 0b10 << 14;
const FDR_STEP_MASK: u32 = 0x3FF;

// Baud Rate Generator (BRG) fields
const BRG_DCTQ_SHIFT: u32 = 10;
const BRG_PDIV_SHIFT: u32 = 16;

// Interrupt Node Pointer (INPR) fields
const INPR_TBINP_SHIFT: u32 = 4;
const INPR_RINP_SHIFT: u32 = 8;
const INPR_AINP_SHIFT: u32 = 12;

// Shift Control (SCTR) bits
const SCTR_PDL: u32 = 1 << 1;
const SCTR_TRM_ACTIVE_HIGH: u32 = 0b01 << 8;
const SCTR_FLE_SHIFT: u32 = 16;
const SCTR_WLE_SHIFT: u32 = 24;

// Transmit Control/Status (TCSR) bits
const TCSR_TDV: u32 = 1 << 7;
const TCSR_TDSSM: u32 = 1 << 8;
const TCSR_TDEN_TDV: u32 = 0b01 << 10;

// Protocol Control (PCR) bits, ASC mode
const PCR_SMD: u32 = 1 << 0;
const PCR_STPB: u32 = 1 << 1;
const PCR_SP_SHIFT: u32 = 8;

// Channel Control (CCR) bits
const CCR_MODE_ASC: u32 = 0b0010;
const CCR_PM_EVEN: u32 = 0b10 << 8;
const CCR_PM_ODD: u32 = 0b11 << 8;
const CCR_TBIEN: u32 = 1 << 13;
const CCR_RIEN: u32 = 1 << 14;
const CCR_AIEN: u32 = 1 << 15;

// Protocol Status (PSR) bits, ASC mode
const PSR_BUSY: u32 = 1 << 9;
const PSR_TBIF: u32 = 1 << 13;
const PSR_RIF: u32 = 1 << 14;
const PSR_AIF: u32 = 1 << 15;
const PSR_ALL_FLAGS: u32 = 0x0001_FFFF;

// Flag Modification (FMR): SIOx activates service request output x
const FMR_SIO_SHIFT: u32 = 16;

/// Fractional divider register value.
const fn fdr_value(divider: &BaudDivider) -> u32 {
    FDR_DM_FRACTIONAL | (divider.step as u32 & FDR_STEP_MASK)
}

/// Baud rate generator register value.
const fn brg_value(divider: &BaudDivider) -> u32 {
    ((divider.oversampling as u32 - 1) << BRG_DCTQ_SHIFT)
        | ((divider.pdiv as u32 - 1) << BRG_PDIV_SHIFT)
}

/// Shift control: LSB first, idle high, frame length equal to word length.
const fn sctr_value(config: &SerialConfig) -> u32 {
    let bits = config.data_bits.count() as u32 - 1;
    SCTR_PDL | SCTR_TRM_ACTIVE_HIGH | (bits << SCTR_FLE_SHIFT) | (bits << SCTR_WLE_SHIFT)
}

/// Protocol control: majority-of-three sampling centred in the bit.
const fn pcr_value(config: &SerialConfig, oversampling: u8) -> u32 {
    let sample_point = oversampling as u32 / 2 + 1;
    let stop = match config.stop_bits {
        StopBits::One => 0,
        StopBits::Two => PCR_STPB,
    };
    PCR_SMD | stop | (sample_point << PCR_SP_SHIFT)
}

/// Channel control with the module in ASC mode and all interrupts off.
const fn ccr_mode(parity: Parity) -> u32 {
    match parity {
        Parity::None => CCR_MODE_ASC,
        Parity::Even => CCR_MODE_ASC | CCR_PM_EVEN,
        Parity::Odd => CCR_MODE_ASC | CCR_PM_ODD,
    }
}

/// Route transmit buffer, receive and alternative receive events to one
/// service request output.
const fn inpr_value(service_request: u8) -> u32 {
    let sr = service_request as u32 & 0x7;
    (sr << INPR_TBINP_SHIFT) | (sr << INPR_RINP_SHIFT) | (sr << INPR_AINP_SHIFT)
}

const fn ccr_sources(sources: SerialInterrupts) -> u32 {
    let mut bits = 0;
    if sources.contains(SerialInterrupts::RX) {
        bits |= CCR_RIEN | CCR_AIEN;
    }
    if sources.contains(SerialInterrupts::TX_EMPTY) {
        bits |= CCR_TBIEN;
    }
    bits
}

/// Decode the pending conditions from a register snapshot.
///
/// A channel whose module has been switched off behind the driver's back
/// reports `FAULT`; it will not move data again until reconfigured.
const fn decode_status(kscfg: u32, ccr: u32, tcsr: u32, psr: u32) -> SerialStatus {
    if kscfg & KSCFG_MODEN == 0 {
        return SerialStatus::FAULT;
    }

    let mut status = SerialStatus::empty();
    if ccr & (CCR_RIEN | CCR_AIEN) != 0 && psr & (PSR_RIF | PSR_AIF) != 0 {
        status = status.union(SerialStatus::RX_READY);
    }
    if ccr & CCR_TBIEN != 0 && tcsr & TCSR_TDV == 0 {
        status = status.union(SerialStatus::TX_EMPTY);
    }
    status
}

/// USIC channel operated as a UART.
pub struct UsicUart {
    base: usize,
    dx0_select: u8,
    dx3_select: Option<u8>,
    service_request: u8,
}

impl UsicUart {
    /// Create a driver for the USIC channel described by `uart`.
    ///
    /// # Safety
    ///
    /// - `uart.base` must point to a USIC channel's register block
    /// - Only one instance should exist per channel
    pub const unsafe fn new(uart: &UartResource) -> Self {
        Self {
            base: uart.base,
            dx0_select: uart.dx0_select,
            dx3_select: uart.dx3_select,
            service_request: uart.service_request,
        }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    fn modify_reg(&self, offset: usize, clear: u32, set: u32) {
        let val = self.read_reg(offset);
        self.write_reg(offset, (val & !clear) | set);
    }

    /// Switch the module on and wait until it accepts register writes.
    fn enable_module(&self) {
        self.write_reg(KSCFG_OFFSET, KSCFG_MODEN | KSCFG_BPMODEN);
        while self.read_reg(KSCFG_OFFSET) & KSCFG_MODEN == 0 {
            core::hint::spin_loop();
        }
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

impl SerialHardware for UsicUart {
    fn configure(&self, config: &SerialConfig, divider: BaudDivider) {
        self.enable_module();

        // Channel inactive while the protocol is set up
        self.write_reg(CCR_OFFSET, 0);

        self.write_reg(FDR_OFFSET, fdr_value(&divider));
        self.write_reg(BRG_OFFSET, brg_value(&divider));

        if let Some(dx3) = self.dx3_select {
            self.write_reg(DX3CR_OFFSET, dx3 as u32);
        }
        self.write_reg(DX0CR_OFFSET, self.dx0_select as u32);

        self.write_reg(SCTR_OFFSET, sctr_value(config));
        self.write_reg(TCSR_OFFSET, TCSR_TDSSM | TCSR_TDEN_TDV);
        self.write_reg(PCR_OFFSET, pcr_value(config, divider.oversampling));

        self.write_reg(PSCR_OFFSET, PSR_ALL_FLAGS);
        self.write_reg(INPR_OFFSET, inpr_value(self.service_request));

        self.write_reg(CCR_OFFSET, ccr_mode(config.parity));
    }

    fn shutdown(&self) {
        self.write_reg(CCR_OFFSET, 0);
        self.write_reg(PSCR_OFFSET, PSR_ALL_FLAGS);
        self.write_reg(KSCFG_OFFSET, KSCFG_BPMODEN);
    }

    fn status(&self) -> SerialStatus {
        decode_status(
            self.read_reg(KSCFG_OFFSET),
            self.read_reg(CCR_OFFSET),
            self.read_reg(TCSR_OFFSET),
            self.read_reg(PSR_OFFSET),
        )
    }

    fn read_data(&self) -> u8 {
        let byte = (self.read_reg(RBUF_OFFSET) & 0xFF) as u8;
        self.write_reg(PSCR_OFFSET, PSR_RIF | PSR_AIF);
        byte
    }

    fn write_data(&self, byte: u8) {
        self.write_reg(PSCR_OFFSET, PSR_TBIF);
        self.write_reg(TBUF0_OFFSET, byte as u32);
    }

    fn enable_interrupts(&self, sources: SerialInterrupts) {
        let bits = ccr_sources(sources);
        let armed = self.read_reg(CCR_OFFSET) & bits;
        self.modify_reg(CCR_OFFSET, 0, bits);

        // A transmit buffer event only fires on a buffer-to-shifter
        // transfer, so arming an idle transmitter needs a kick.
        if bits & CCR_TBIEN != 0
            && armed & CCR_TBIEN == 0
            && self.read_reg(TCSR_OFFSET) & TCSR_TDV == 0
        {
            self.write_reg(FMR_OFFSET, 1 << (FMR_SIO_SHIFT + self.service_request as u32));
        }
    }

    fn disable_interrupts(&self, sources: SerialInterrupts) {
        self.modify_reg(CCR_OFFSET, ccr_sources(sources), 0);
    }

    fn is_busy(&self) -> bool {
        self.read_reg(TCSR_OFFSET) & TCSR_TDV != 0 || self.read_reg(PSR_OFFSET) & PSR_BUSY != 0
    }
}

// SAFETY: UsicUart wraps memory-mapped hardware; the serial channel splits
// register use between one interrupt handler and one application context.
unsafe impl Send for UsicUart {}
unsafe impl Sync for UsicUart {}
