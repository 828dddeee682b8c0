//! Conversions between display text and numeric values.
//!
//! The display is plain text that grows one keystroke at a time, so values
//! are parsed leniently (longest numeric prefix) and results are formatted
//! the way a pocket calculator readout shows them: shortest round-trip
//! digits, exponent form for very large or very small magnitudes, and the
//! literal words `Infinity` / `NaN` for non-finite results.

/// Magnitude at and above which results switch to exponent notation.
const EXPONENT_UPPER: f64 = 1e21;
/// Magnitude below which non-zero results switch to exponent notation.
const EXPONENT_LOWER: f64 = 1e-6;

/// Format a value for the readout.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Covers negative zero as well.
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_UPPER || magnitude < EXPONENT_LOWER {
        let formatted = format!("{:e}", value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}

/// Parse display text into a value.
///
/// Uses the longest prefix that forms a number, so `"12."` is 12 and
/// `"1e-7."` is 1e-7. Text with no numeric prefix is NaN.
pub fn parse_display(text: &str) -> f64 {
    let text = text.trim_start();
    if let Ok(value) = text.parse::<f64>() {
        return value;
    }

    (1..text.len())
        .rev()
        .filter(|&end| text.is_char_boundary(end))
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_integers_drop_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(123456789.0), "123456789");
    }

    #[test]
    fn test_format_fractions() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_negative_zero() {
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_exponent_ranges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_parse_plain() {
        assert!((parse_display("123") - 123.0).abs() < f64::EPSILON);
        assert!((parse_display("-0.25") + 0.25).abs() < f64::EPSILON);
        assert!((parse_display("7.") - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_display("Infinity"), f64::INFINITY);
        assert_eq!(parse_display("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_display("NaN").is_nan());
    }

    #[test]
    fn test_parse_longest_prefix() {
        assert!((parse_display("1e-7.") - 1e-7).abs() < f64::EPSILON);
        assert!((parse_display("1e+21") - 1e21).abs() < 1.0);
        assert!(parse_display("").is_nan());
        assert!(parse_display(".").is_nan());
    }
}
