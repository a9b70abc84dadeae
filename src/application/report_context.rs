// Report context - Read-only bundle passed to every column resolver
use crate::application::device_directory::{DeviceDirectory, DirectoryError};
use crate::domain::age_color::AgeColorRange;
use crate::domain::cell::DEFAULT_BLANK_FILLER;
use crate::domain::device::DeviceInfo;
use crate::domain::locale::Locale;
use crate::domain::number_format::{NumberSymbols, format_number_with};
use crate::domain::status::StatusStyle;
use crate::domain::units::{UnitLabel, UnitPreferences};
use crate::infrastructure::config::expand_placeholders;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_GPS_AGE_COLORS: &str = "3600:#BB0000,1200:#550000";
pub const DEFAULT_CREATION_AGE_COLORS: &str = "";
pub const DEFAULT_CHECKIN_AGE_COLORS: &str = "86400:#BB0000";

/// Everything a resolver may read besides the record itself.
///
/// `now` is fixed when the context is built so that resolving the same cell
/// twice gives the same result.
#[derive(Clone)]
pub struct ReportContext {
    pub units: UnitPreferences,
    pub locale: Locale,
    pub timezone: FixedOffset,
    pub timezone_label: String,
    pub date_format: String,
    pub time_format: String,
    pub blank_filler: String,
    pub strings: HashMap<String, String>,
    pub gps_age_colors: Vec<AgeColorRange>,
    pub creation_age_colors: Vec<AgeColorRange>,
    pub checkin_age_colors: Vec<AgeColorRange>,
    pub status_styles: HashMap<u32, StatusStyle>,
    pub map_url: Option<String>,
    pub device_admin_url: Option<String>,
    pub attachment_url: Option<String>,
    pub now: DateTime<Utc>,
    directory: Option<Arc<dyn DeviceDirectory>>,
}

impl ReportContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            units: UnitPreferences::default(),
            locale: Locale::default(),
            timezone: Utc.fix(),
            timezone_label: "UTC".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            blank_filler: DEFAULT_BLANK_FILLER.to_string(),
            strings: HashMap::new(),
            gps_age_colors: AgeColorRange::parse_list(DEFAULT_GPS_AGE_COLORS),
            creation_age_colors: AgeColorRange::parse_list(DEFAULT_CREATION_AGE_COLORS),
            checkin_age_colors: AgeColorRange::parse_list(DEFAULT_CHECKIN_AGE_COLORS),
            status_styles: HashMap::new(),
            map_url: None,
            device_admin_url: None,
            attachment_url: None,
            now,
            directory: None,
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn DeviceDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Localized string, or `default` when the table has no entry.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.strings.get(key).map(String::as_str).unwrap_or(default)
    }

    pub fn unit_text(&self, label: UnitLabel) -> &str {
        self.text(label.key, label.default)
    }

    pub fn symbols(&self) -> NumberSymbols {
        self.locale.symbols()
    }

    /// Locale-aware [`crate::domain::number_format::format_number`].
    pub fn format_number(&self, value: f64, arg: &str, default_pattern: &str) -> String {
        format_number_with(value, arg, default_pattern, self.symbols())
    }

    pub fn age_of(&self, timestamp: i64) -> i64 {
        self.now.timestamp() - timestamp
    }

    pub fn local_time(&self, timestamp: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&self.timezone))
    }

    pub fn format_date(&self, timestamp: i64) -> Option<String> {
        self.format_timestamp(timestamp, &self.date_format, DEFAULT_DATE_FORMAT)
    }

    pub fn format_time(&self, timestamp: i64) -> Option<String> {
        self.format_timestamp(timestamp, &self.time_format, DEFAULT_TIME_FORMAT)
    }

    pub fn format_date_time(&self, timestamp: i64) -> Option<String> {
        let pattern = format!("{} {}", self.date_format, self.time_format);
        let fallback = format!("{DEFAULT_DATE_FORMAT} {DEFAULT_TIME_FORMAT}");
        self.format_timestamp(timestamp, &pattern, &fallback)
    }

    fn format_timestamp(&self, timestamp: i64, pattern: &str, fallback: &str) -> Option<String> {
        let local = self.local_time(timestamp)?;
        let mut out = String::new();
        if write!(out, "{}", local.format(pattern)).is_ok() {
            return Some(out);
        }
        tracing::warn!("Invalid date/time pattern '{}', using '{}'", pattern, fallback);
        out.clear();
        write!(out, "{}", local.format(fallback)).ok()?;
        Some(out)
    }

    pub fn status_style(&self, code: u32) -> Option<&StatusStyle> {
        self.status_styles.get(&code)
    }

    /// Values for the `${...}` placeholders allowed in column titles.
    pub fn title_vars(&self) -> HashMap<String, String> {
        let units = &self.units;
        [
            ("distanceUnits", self.unit_text(units.distance.label())),
            ("speedUnits", self.unit_text(units.speed.label())),
            ("volumeUnits", self.unit_text(units.volume.label())),
            ("pressureUnits", self.unit_text(units.pressure.label())),
            ("economyUnits", self.unit_text(units.economy.label())),
            ("altitudeUnits", self.unit_text(units.altitude.label())),
            ("accuracyUnits", self.unit_text(units.altitude.label())),
            ("temperatureUnits", self.unit_text(units.temperature.label())),
            ("timezone", self.timezone_label.as_str()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn expand_title(&self, title: &str) -> String {
        if !title.contains("${") {
            return title.to_string();
        }
        expand_placeholders(title, &self.title_vars())
    }

    /// Looks up the device behind a record. No directory means no device.
    pub fn device(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceInfo>, DirectoryError> {
        let Some(directory) = self.directory.as_deref() else {
            return Ok(None);
        };
        tracing::debug!("Looking up device {}/{}", account_id, device_id);
        directory.device(account_id, device_id)
    }

    pub fn last_event_timestamp(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<i64>, DirectoryError> {
        match self.directory.as_deref() {
            Some(directory) => directory.last_event_timestamp(account_id, device_id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::{SpeedUnits, TemperatureUnits};

    fn context() -> ReportContext {
        ReportContext::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    }

    #[test]
    fn test_text_lookup_with_default() {
        let mut ctx = context();
        assert_eq!(ctx.text("col.speed", "Speed"), "Speed");
        ctx.strings.insert("col.speed".to_string(), "Geschwindigkeit".to_string());
        assert_eq!(ctx.text("col.speed", "Speed"), "Geschwindigkeit");
    }

    #[test]
    fn test_expand_title_uses_current_units() {
        let mut ctx = context();
        assert_eq!(ctx.expand_title("Speed\n${speedUnits}"), "Speed\nkm/h");
        ctx.units.speed = SpeedUnits::MilesPerHour;
        ctx.units.temperature = TemperatureUnits::Fahrenheit;
        assert_eq!(ctx.expand_title("Speed\n${speedUnits}"), "Speed\nmph");
        assert_eq!(ctx.expand_title("Temp ${temperatureUnits}"), "Temp °F");
        assert_eq!(ctx.expand_title("Date/Time\n${timezone}"), "Date/Time\nUTC");
    }

    #[test]
    fn test_date_time_formatting() {
        let mut ctx = context();
        assert_eq!(ctx.format_date(1_700_000_000).as_deref(), Some("2023/11/14"));
        assert_eq!(ctx.format_time(1_700_000_000).as_deref(), Some("22:13:20"));
        ctx.timezone = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            ctx.format_date_time(1_700_000_000).as_deref(),
            Some("2023/11/15 00:13:20")
        );
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let mut ctx = context();
        ctx.date_format = "%Q".to_string();
        assert_eq!(ctx.format_date(1_700_000_000).as_deref(), Some("2023/11/14"));
    }

    #[test]
    fn test_no_directory_means_no_device() {
        let ctx = context();
        assert!(ctx.device("acme", "truck1").unwrap().is_none());
        assert!(ctx.last_event_timestamp("acme", "truck1").unwrap().is_none());
    }

    #[test]
    fn test_locale_number_symbols() {
        let mut ctx = context();
        assert_eq!(ctx.format_number(1234.5, "1", "0"), "1234.5");
        ctx.locale = Locale::new("de_DE");
        assert_eq!(ctx.format_number(1234.5, "1", "0"), "1234,5");
    }
}
