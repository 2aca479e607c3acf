//! Scalar value formatting.

use crate::source::Sample;

/// Format the latest sample for the scalar display.
///
/// - non-numeric samples have no text
/// - zero is `"0"`
/// - whole numbers above 2 print as integers
/// - everything else prints with two decimals, so small readings like `1.8`
///   keep their precision (`"1.80"`)
pub fn format_val(sample: &Sample) -> Option<String> {
    sample.as_f64().map(format_number)
}

/// Numeric half of [`format_val`].
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value > 2.0 && value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    format!("{:.2}", value)
}
