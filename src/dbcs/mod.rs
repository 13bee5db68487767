//! Double-Byte Field Module
//!
//! Fixed-width slots holding double-byte character strings.
//!
//! ## Variants
//! - [`ShiftCodeField`]: slot carries shift-out (`0x0E`) / shift-in (`0x0F`)
//!   markers around the double-byte run
//! - [`NoShiftCodeField`]: slot carries only the double-byte run; markers are
//!   added and removed transparently
//!
//! The slot offset and width come from the outer fixed-length record reader.

mod shift_code;
mod no_shift_code;

pub use shift_code::ShiftCodeField;
pub use no_shift_code::NoShiftCodeField;
