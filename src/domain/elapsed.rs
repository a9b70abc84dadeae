// Elapsed-time representations selected by column arguments
use super::number_format::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElapsedFormat {
    /// Plain seconds, e.g. `3661`
    Seconds,
    /// `HH:MM:SS`, hours may exceed two digits
    HhMmSs,
    /// `HH:MM`, seconds truncated
    HhMm,
    /// Decimal hours with two places, e.g. `1.02`
    HoursHundredths,
    /// Decimal hours with one place, e.g. `1.0`
    HoursTenths,
}

/// Maps a column argument onto an elapsed format. Blank or unknown arguments
/// yield `default`.
pub fn resolve_elapsed_format(arg: &str, default: ElapsedFormat) -> ElapsedFormat {
    let arg = arg.trim();
    if arg.is_empty() {
        return default;
    }

    // Numeric aliases match on prefix.
    if arg.starts_with("-1") {
        return ElapsedFormat::Seconds;
    }
    match arg.as_bytes()[0] {
        b'0' => return ElapsedFormat::HhMmSs,
        b'1' => return ElapsedFormat::HhMm,
        b'2' => return ElapsedFormat::HoursHundredths,
        b'3' => return ElapsedFormat::HoursTenths,
        _ => {}
    }

    let arg = arg.to_ascii_lowercase();
    match arg.as_str() {
        "ss" | "s" => ElapsedFormat::Seconds,
        a if a.starts_with("sec") => ElapsedFormat::Seconds,
        "hhmmss" | "hms" | "hh:mm:ss" => ElapsedFormat::HhMmSs,
        "hhmm" | "hm" | "hh:mm" => ElapsedFormat::HhMm,
        "hhh.hh" | "hh.hh" | "h.hh" => ElapsedFormat::HoursHundredths,
        "hhh.h" | "hh.h" | "h.h" => ElapsedFormat::HoursTenths,
        _ => default,
    }
}

/// Renders `seconds` in the given format. Zero or negative input renders the
/// format's zero value.
pub fn format_elapsed(seconds: i64, format: ElapsedFormat) -> String {
    let seconds = seconds.max(0);
    match format {
        ElapsedFormat::Seconds => seconds.to_string(),
        ElapsedFormat::HhMmSs => {
            let (h, m, s) = split_hms(seconds);
            format!("{h:02}:{m:02}:{s:02}")
        }
        ElapsedFormat::HhMm => {
            let (h, m, _) = split_hms(seconds);
            format!("{h:02}:{m:02}")
        }
        ElapsedFormat::HoursHundredths => format_number(seconds as f64 / 3600.0, "2", "0.00"),
        ElapsedFormat::HoursTenths => format_number(seconds as f64 / 3600.0, "1", "0.0"),
    }
}

fn split_hms(seconds: i64) -> (i64, i64, i64) {
    (seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}
