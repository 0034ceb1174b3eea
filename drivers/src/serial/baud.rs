//! Fractional baud-rate divider calculation.
//!
//! The UART bit clock is derived from the peripheral clock in two stages: a
//! fractional divider that passes `step / 1024` of the input clock, then an
//! integer pre-divider `pdiv`, then `oversampling` samples per bit:
//!
//! ```text
//! baud = f_clk * step / 1024 / (pdiv * oversampling)
//! ```

use crate::hal::serial::{BaudDivider, ConfigurationError};

/// Samples per bit used for every channel.
pub const OVERSAMPLING: u8 = 16;

/// Largest accepted deviation from the requested rate, in percent.
pub const TOLERANCE_PERCENT: u64 = 2;

const STEP_MAX: u64 = 1023;
const PDIV_MAX: u64 = 1024;

/// Find divider settings for `baud_rate` given a peripheral clock of
/// `clock_hz`.
///
/// Every `step` is tried; for each one the exact pre-divider is computed in
/// 1/1024 units, and the candidate whose fractional remainder is smallest
/// wins. The winner is rejected if the rate it produces is more than
/// [`TOLERANCE_PERCENT`] away from the request.
pub fn calculate(clock_hz: u32, baud_rate: u32) -> Result<BaudDivider, ConfigurationError> {
    if baud_rate == 0 {
        return Err(ConfigurationError::ZeroBaudRate);
    }

    let clock = clock_hz as u64;
    let denominator = baud_rate as u64 * OVERSAMPLING as u64;

    // (step, pdiv, fractional remainder)
    let mut best: Option<(u64, u64, u64)> = None;

    for step in (1..=STEP_MAX).rev() {
        // pdiv in 1/1024 units
        let scaled = clock * step / denominator;
        let pdiv = scaled >> 10;
        let frac = scaled & 0x3FF;

        if pdiv == 0 || pdiv > PDIV_MAX {
            continue;
        }

        if best.is_none_or(|(_, _, best_frac)| frac < best_frac) {
            best = Some((step, pdiv, frac));
        }
    }

    let (step, pdiv, _) = best.ok_or(ConfigurationError::BaudRateOutOfTolerance {
        requested: baud_rate,
    })?;

    let actual = clock * step / (1024 * pdiv * OVERSAMPLING as u64);
    let error = actual.abs_diff(baud_rate as u64);

    if error * 100 > baud_rate as u64 * TOLERANCE_PERCENT {
        return Err(ConfigurationError::BaudRateOutOfTolerance {
            requested: baud_rate,
        });
    }

    Ok(BaudDivider {
        step: step as u16,
        pdiv: pdiv as u16,
        oversampling: OVERSAMPLING,
        actual_baud: actual as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCLK: u32 = 64_000_000;

    fn within_tolerance(requested: u32, actual: u32) -> bool {
        (actual as u64).abs_diff(requested as u64) * 100 <= requested as u64 * TOLERANCE_PERCENT
    }

    #[test]
    fn test_standard_rates_are_representable() {
        for &rate in &[300, 1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 1_000_000] {
            let div = calculate(PCLK, rate).unwrap();
            assert!(within_tolerance(rate, div.actual_baud), "rate {} gave {:?}", rate, div);
            assert!((1..=1023).contains(&div.step));
            assert!((1..=1024).contains(&div.pdiv));
            assert_eq!(div.oversampling, OVERSAMPLING);
        }
    }

    #[test]
    fn test_9600_is_accurate() {
        let div = calculate(PCLK, 9600).unwrap();
        assert!(div.actual_baud.abs_diff(9600) <= 5, "{:?}", div);
    }

    #[test]
    fn test_zero_rate() {
        assert_eq!(calculate(PCLK, 0), Err(ConfigurationError::ZeroBaudRate));
    }

    #[test]
    fn test_rate_above_clock_limit() {
        // 64 MHz / 16 caps the bit rate at 4 Mbaud.
        assert_eq!(
            calculate(PCLK, 10_000_000),
            Err(ConfigurationError::BaudRateOutOfTolerance { requested: 10_000_000 })
        );
    }

    #[test]
    fn test_rate_below_divider_range() {
        assert_eq!(
            calculate(PCLK, 1),
            Err(ConfigurationError::BaudRateOutOfTolerance { requested: 1 })
        );
    }
}
