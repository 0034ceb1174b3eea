//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with hardware
//! peripherals. These traits are implemented by platform-specific
//! and peripheral drivers, allowing the serial transport to be written
//! in a platform-independent manner.
//!
//! # Design Principles
//!
//! - **Zero-cost abstractions**: Traits compile to direct hardware access
//! - **Shared access**: Methods take `&self` so one driver instance can be
//!   reached from both an interrupt handler and application code
//! - **No platform leakage**: Traits must not reference platform-specific types
//!
//! # Available Interfaces
//!
//! - [`gate`]: Peripheral clock gating and reset control
//! - [`gpio`]: Pin routing and driver configuration
//! - [`interrupt`]: Interrupt controller management
//! - [`serial`]: Register-level serial port (UART) access

pub mod gate;
pub mod gpio;
pub mod interrupt;
pub mod serial;
