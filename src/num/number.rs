//! Lenient scalar conversions and number rendering.
//!
//! Parsing follows the C `atoi`/`atof` contract: leading whitespace is
//! skipped, the longest numeric prefix is converted and anything after it is
//! ignored. Text without a numeric prefix converts to zero.

use crate::constants::is_whitespace;

pub fn parse_integer_prefix(text: &[u8]) -> i64 {
    let mut idx = skip_leading_whitespace(text);
    let negative = match text.get(idx) {
        Some(b'-') => {
            idx += 1;
            true
        }
        Some(b'+') => {
            idx += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while let Some(digit @ b'0'..=b'9') = text.get(idx).copied() {
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        idx += 1;
    }
    value
}

pub fn parse_number_prefix(text: &[u8]) -> f64 {
    let start = skip_leading_whitespace(text);
    let end = numeric_prefix_end(text, start);
    std::str::from_utf8(&text[start..end])
        .ok()
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn skip_leading_whitespace(text: &[u8]) -> usize {
    text.iter()
        .position(|byte| !is_whitespace(*byte))
        .unwrap_or(text.len())
}

fn numeric_prefix_end(text: &[u8], start: usize) -> usize {
    let mut idx = start;
    if matches!(text.get(idx), Some(b'-' | b'+')) {
        idx += 1;
    }
    let digits_start = idx;
    while matches!(text.get(idx), Some(b'0'..=b'9')) {
        idx += 1;
    }
    let mut mantissa_digits = idx - digits_start;
    if text.get(idx) == Some(&b'.') {
        let fraction_start = idx + 1;
        let mut fraction_end = fraction_start;
        while matches!(text.get(fraction_end), Some(b'0'..=b'9')) {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - fraction_start;
        if mantissa_digits > 0 {
            idx = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return start;
    }
    if matches!(text.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(text.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        if matches!(text.get(exp), Some(b'0'..=b'9')) {
            while matches!(text.get(exp), Some(b'0'..=b'9')) {
                exp += 1;
            }
            idx = exp;
        }
    }
    idx
}

pub fn format_integer(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format_integer(value as i64);
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    #[case(b"8080".as_slice(), 8080)]
    #[case(b"  -42".as_slice(), -42)]
    #[case(b"+7".as_slice(), 7)]
    #[case(b"12abc".as_slice(), 12)]
    #[case(b"abc".as_slice(), 0)]
    #[case(b"".as_slice(), 0)]
    #[case(b"99999999999999999999".as_slice(), i64::MAX)]
    #[case(b"-99999999999999999999".as_slice(), i64::MIN)]
    fn test_parse_integer_prefix(#[case] input: &[u8], #[case] expected: i64) {
        assert_eq!(parse_integer_prefix(input), expected);
    }

    #[rstest::rstest]
    #[case(b"1.5".as_slice(), 1.5)]
    #[case(b" -0.25x".as_slice(), -0.25)]
    #[case(b"3e2".as_slice(), 300.0)]
    #[case(b"3e".as_slice(), 3.0)]
    #[case(b".5".as_slice(), 0.5)]
    #[case(b"7.".as_slice(), 7.0)]
    #[case(b"local".as_slice(), 0.0)]
    #[case(b"-".as_slice(), 0.0)]
    fn test_parse_number_prefix(#[case] input: &[u8], #[case] expected: f64) {
        assert_eq!(parse_number_prefix(input), expected);
    }

    #[rstest::rstest]
    fn test_format_numbers() {
        assert_eq!(format_integer(-15), "-15");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-1.25), "-1.25");
    }
}
