// Numeric formatting driven by column arguments

/// Patterns selected by a single leading digit argument ("0".."9").
const DIGIT_PATTERNS: [&str; 10] = [
    "0",
    "0.0",
    "0.00",
    "0.000",
    "0.0000",
    "0.00000",
    "0.000000",
    "0.0000000",
    "0.00000000",
    "0.000000000",
];

/// Upper bound on fraction digits an explicit pattern may request.
const MAX_FRACTION_DIGITS: usize = 15;

/// 2^53: scaled magnitudes at or past this are whole numbers in f64.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Separator characters used when rendering a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub grouping: char,
}

impl Default for NumberSymbols {
    fn default() -> Self {
        Self {
            decimal: '.',
            grouping: ',',
        }
    }
}

/// Picks the pattern an argument selects, falling back to `default_pattern`.
///
/// - blank argument: the default pattern
/// - `#<pattern>`: an explicit pattern such as `#0.0000`
/// - leading digit `0`..`9`: that many fraction digits
pub fn resolve_pattern<'a>(arg: &'a str, default_pattern: &'a str) -> &'a str {
    let arg = arg.trim();
    if arg.is_empty() {
        return default_pattern;
    }
    if let Some(explicit) = arg.strip_prefix('#') {
        return explicit;
    }
    match arg.chars().next().and_then(|c| c.to_digit(10)) {
        Some(digits) => DIGIT_PATTERNS[digits as usize],
        None => default_pattern,
    }
}

/// Formats `value` with the pattern selected by `arg`.
pub fn format_number(value: f64, arg: &str, default_pattern: &str) -> String {
    format_number_with(value, arg, default_pattern, NumberSymbols::default())
}

/// Same as [`format_number`], rendering with the given separators.
pub fn format_number_with(
    value: f64,
    arg: &str,
    default_pattern: &str,
    symbols: NumberSymbols,
) -> String {
    let pattern = DecimalPattern::parse(resolve_pattern(arg, default_pattern))
        .or_else(|| DecimalPattern::parse(default_pattern))
        .unwrap_or(DecimalPattern::INTEGER);
    pattern.apply(value, symbols)
}

/// Lenient number parsing; anything unparsable becomes zero.
pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Compiled form of a `#,##0.00`-style pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DecimalPattern {
    min_integer: usize,
    min_fraction: usize,
    max_fraction: usize,
    grouping: bool,
}

impl DecimalPattern {
    const INTEGER: DecimalPattern = DecimalPattern {
        min_integer: 1,
        min_fraction: 0,
        max_fraction: 0,
        grouping: false,
    };

    fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return None;
        }

        let (integer, fraction) = match pattern.split_once('.') {
            Some((i, f)) => (i, f),
            None => (pattern, ""),
        };
        if !integer.chars().all(|c| matches!(c, '0' | '#' | ',')) {
            return None;
        }
        if !fraction.chars().all(|c| matches!(c, '0' | '#')) {
            return None;
        }
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }

        let max_fraction = fraction.len().min(MAX_FRACTION_DIGITS);
        Some(Self {
            min_integer: integer.chars().filter(|c| *c == '0').count(),
            min_fraction: fraction.chars().filter(|c| *c == '0').count().min(max_fraction),
            max_fraction,
            grouping: integer.contains(','),
        })
    }

    fn apply(&self, value: f64, symbols: NumberSymbols) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        let (integer_digits, mut fraction) = self.rounded_digits(value.abs());
        let is_zero = integer_digits.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');

        while fraction.len() > self.min_fraction && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut integer = if integer_digits == "0" && self.min_integer == 0 {
            String::new()
        } else {
            integer_digits
        };
        while integer.len() < self.min_integer {
            integer.insert(0, '0');
        }
        if self.grouping {
            integer = group_digits(&integer, symbols.grouping);
        }
        if integer.is_empty() && fraction.is_empty() {
            integer.push('0');
        }

        let mut out = String::with_capacity(integer.len() + fraction.len() + 2);
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&integer);
        if !fraction.is_empty() {
            out.push(symbols.decimal);
            out.push_str(&fraction);
        }
        out
    }

    /// Integer and fraction digits of `magnitude`, rounded half-up to
    /// `max_fraction` places. Fraction digits are zero-padded to full width.
    fn rounded_digits(&self, magnitude: f64) -> (String, String) {
        let scale = 10u128.pow(self.max_fraction as u32);
        let scaled = magnitude * scale as f64;

        if scaled >= EXACT_INTEGER_LIMIT {
            // No fractional part left to round half-up; use the exact expansion.
            let text = format!("{:.*}", self.max_fraction, magnitude);
            return match text.split_once('.') {
                Some((integer, fraction)) => (integer.to_string(), fraction.to_string()),
                None => (text, String::new()),
            };
        }

        // Half-up on the magnitude; the nudge absorbs binary representation error
        // (1.005 is stored as 1.00499999...).
        let rounded = (scaled + 0.5 + scaled * 4.0 * f64::EPSILON).floor() as u128;
        let fraction = if self.max_fraction > 0 {
            format!("{:0width$}", rounded % scale, width = self.max_fraction)
        } else {
            String::new()
        };
        ((rounded / scale).to_string(), fraction)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_argument_selects_fraction_digits() {
        assert_eq!(format_number(12.3456, "2", "0"), "12.35");
        assert_eq!(format_number(12.3456, "0", "0.0"), "12");
        for digits in 0..=9usize {
            let text = format_number(1.0 / 3.0, &digits.to_string(), "0");
            let fraction = text.split('.').nth(1).map(str::len).unwrap_or(0);
            assert_eq!(fraction, digits, "argument {digits} produced {text}");
        }
    }

    #[test]
    fn test_blank_argument_uses_default() {
        assert_eq!(format_number(12.3456, "", "0.0"), "12.3");
        assert_eq!(format_number(12.3456, "   ", "0.00"), "12.35");
    }

    #[test]
    fn test_explicit_pattern() {
        assert_eq!(format_number(3.14159, "#0.0000", "0"), "3.1416");
        assert_eq!(format_number(3.1, "#0.##", "0"), "3.1");
        assert_eq!(format_number(3.0, "#0.##", "0"), "3");
        assert_eq!(format_number(1234567.891, "##,##0.0", "0"), "1,234,567.9");
        assert_eq!(format_number(7.0, "#000", "0"), "007");
    }

    #[test]
    fn test_unknown_argument_falls_back_to_default() {
        assert_eq!(format_number(2.25, "x", "0.0"), "2.3");
        assert_eq!(format_number(2.25, "#abc", "0.0"), "2.3");
        assert_eq!(format_number(2.25, "#", "bogus"), "2");
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(format_number(0.5, "0", "0"), "1");
        assert_eq!(format_number(2.5, "0", "0"), "3");
        assert_eq!(format_number(1.005, "2", "0"), "1.01");
        assert_eq!(format_number(-1.25, "1", "0"), "-1.3");
        assert_eq!(format_number(-0.04, "1", "0"), "0.0");
    }

    #[test]
    fn test_huge_magnitudes_keep_their_digits() {
        assert_eq!(
            format_number(2f64.powi(130), "0", "0"),
            "1361129467683753853853498429727072845824"
        );
        assert_eq!(
            format_number(-(2f64.powi(130)), "#,##0", "0"),
            "-1,361,129,467,683,753,853,853,498,429,727,072,845,824"
        );
        assert_eq!(
            format_number(1e30, "9", "0"),
            "1000000000000000019884624838656.000000000"
        );
        assert_eq!(format_number(1e30, "#0.##", "0"), "1000000000000000019884624838656");
        assert_eq!(format_number(1e17, "2", "0"), "100000000000000000.00");
    }

    #[test]
    fn test_non_finite_values_format_as_zero() {
        assert_eq!(format_number(f64::NAN, "1", "0"), "0.0");
        assert_eq!(format_number(f64::INFINITY, "", "0"), "0");
    }

    #[test]
    fn test_custom_symbols() {
        let symbols = NumberSymbols {
            decimal: ',',
            grouping: '.',
        };
        assert_eq!(format_number_with(1234.5, "#,##0.00", "0", symbols), "1.234,50");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42.5 "), 42.5);
        assert_eq!(parse_number("-3"), -3.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
    }
}
