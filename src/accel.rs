//! Acceleration <-> raw output code conversion for the LIS3DSH model.
//!
//! Output registers hold a 16-bit two's-complement code. The device encodes
//! the integer part of the acceleration shifted into a 2.14 fixed point
//! value, divided by the selected sensitivity (mg/LSB) scaled by standard
//! gravity.

use crate::error::{PeripheralError, PeripheralResult};

pub const GRAVITY: f64 = 9.806_65; // [m/s^2]
pub const MIN_ACCELERATION: f64 = -19.0; // [g]
pub const MAX_ACCELERATION: f64 = 19.0; // [g]

const FRACTION_BITS: u32 = 14;

/// Sensitivity in mg/LSB for each full-scale selector (CTRL_REG5 FSCALE).
const SENSITIVITY_TABLE: [Option<u16>; 8] = [
    Some(2),  // +-2g
    Some(4),  // +-4g
    Some(6),  // +-6g
    Some(8),  // +-8g
    Some(16), // +-16g
    None,
    None,
    None,
];

/// Returns the sensitivity for `full_scale`, or 0 for reserved selectors.
pub fn sensitivity(full_scale: u8) -> u16 {
    match SENSITIVITY_TABLE.get(full_scale as usize).copied().flatten() {
        Some(s) => s,
        None => {
            log::warn!("Unsupported value of sensor sensitivity: full-scale selector {}", full_scale);
            0
        }
    }
}

pub fn check_range(acceleration: f64) -> PeripheralResult<()> {
    // Keeps the shifted value inside i16 for every supported sensitivity.
    if !(MIN_ACCELERATION..=MAX_ACCELERATION).contains(&acceleration) {
        return Err(PeripheralError::OutOfRange {
            quantity: "acceleration",
            value: acceleration,
            min: MIN_ACCELERATION,
            max: MAX_ACCELERATION,
        });
    }
    Ok(())
}

pub fn encode(acceleration: f64, sensitivity: u16) -> i16 {
    if sensitivity == 0 {
        return 0;
    }
    let shifted = ((acceleration.trunc() as i16) as i32) << FRACTION_BITS;
    (shifted as f64 / (sensitivity as f64 * GRAVITY)) as i16
}

pub fn decode(raw: i16, sensitivity: u16) -> f64 {
    raw as f64 * sensitivity as f64 * GRAVITY / (1u32 << FRACTION_BITS) as f64
}

/// Output register byte for one half of the encoded value.
pub fn output_byte(acceleration: f64, sensitivity: u16, upper: bool) -> u8 {
    let raw = encode(acceleration, sensitivity);
    if upper {
        (raw >> 8) as u8
    } else {
        raw as u8
    }
}
