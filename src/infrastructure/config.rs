// Report settings and report definitions - File/env loading and context construction
use crate::application::device_directory::DeviceDirectory;
use crate::application::report_context::{
    DEFAULT_CHECKIN_AGE_COLORS, DEFAULT_CREATION_AGE_COLORS, DEFAULT_DATE_FORMAT,
    DEFAULT_GPS_AGE_COLORS, DEFAULT_TIME_FORMAT, ReportContext,
};
use crate::domain::age_color::AgeColorRange;
use crate::domain::cell::DEFAULT_BLANK_FILLER;
use crate::domain::locale::Locale;
use crate::domain::report_column::ReportColumn;
use crate::domain::status::StatusStyle;
use crate::domain::units::UnitPreferences;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_SETTINGS_PATH: &str = "config/report";
const ENV_PREFIX: &str = "FLEET_REPORT";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid timezone '{0}', expected UTC or an offset such as +02:00")]
    InvalidTimezone(String),

    #[error("invalid status code '{0}', expected decimal or 0x-prefixed hex")]
    InvalidStatusCode(String),

    #[error("invalid report definition: {0}")]
    Definition(#[from] toml::de::Error),
}

/// Per-request presentation settings: account preferences, locale, colors and
/// link targets. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub locale: Locale,
    pub timezone: String,
    pub date_format: String,
    pub time_format: String,
    pub blank_filler: String,
    pub units: UnitPreferences,
    pub gps_age_colors: String,
    pub creation_age_colors: String,
    pub checkin_age_colors: String,
    pub map_url: Option<String>,
    pub device_admin_url: Option<String>,
    pub attachment_url: Option<String>,
    /// Localized text keyed by dotted name. Nested tables flatten to
    /// `outer.inner` keys.
    #[serde(deserialize_with = "deserialize_strings")]
    pub strings: HashMap<String, String>,
    /// Keyed by status code, decimal or `0x` hex.
    pub status_styles: HashMap<String, StatusStyle>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            timezone: "UTC".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            blank_filler: DEFAULT_BLANK_FILLER.to_string(),
            units: UnitPreferences::default(),
            gps_age_colors: DEFAULT_GPS_AGE_COLORS.to_string(),
            creation_age_colors: DEFAULT_CREATION_AGE_COLORS.to_string(),
            checkin_age_colors: DEFAULT_CHECKIN_AGE_COLORS.to_string(),
            map_url: None,
            device_admin_url: None,
            attachment_url: None,
            strings: HashMap::new(),
            status_styles: HashMap::new(),
        }
    }
}

impl ReportSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Builds the immutable context for one report run.
    pub fn to_context(
        &self,
        now: DateTime<Utc>,
        directory: Option<Arc<dyn DeviceDirectory>>,
    ) -> Result<ReportContext, SettingsError> {
        let (timezone, timezone_label) = parse_timezone(&self.timezone)
            .ok_or_else(|| SettingsError::InvalidTimezone(self.timezone.clone()))?;

        let mut status_styles = HashMap::with_capacity(self.status_styles.len());
        for (code, style) in &self.status_styles {
            let code = parse_status_code(code)
                .ok_or_else(|| SettingsError::InvalidStatusCode(code.clone()))?;
            status_styles.insert(code, style.clone());
        }

        let mut ctx = ReportContext::new(now);
        ctx.units = self.units;
        ctx.locale = self.locale.clone();
        ctx.timezone = timezone;
        ctx.timezone_label = timezone_label;
        ctx.date_format = non_blank_or(&self.date_format, DEFAULT_DATE_FORMAT);
        ctx.time_format = non_blank_or(&self.time_format, DEFAULT_TIME_FORMAT);
        ctx.blank_filler = non_blank_or(&self.blank_filler, DEFAULT_BLANK_FILLER);
        ctx.strings = self.strings.clone();
        ctx.gps_age_colors = AgeColorRange::parse_list(&self.gps_age_colors);
        ctx.creation_age_colors = AgeColorRange::parse_list(&self.creation_age_colors);
        ctx.checkin_age_colors = AgeColorRange::parse_list(&self.checkin_age_colors);
        ctx.status_styles = status_styles;
        ctx.map_url = self.map_url.clone();
        ctx.device_admin_url = self.device_admin_url.clone();
        ctx.attachment_url = self.attachment_url.clone();
        Ok(match directory {
            Some(directory) => ctx.with_directory(directory),
            None => ctx,
        })
    }
}

fn non_blank_or(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Loads settings from [`DEFAULT_SETTINGS_PATH`] relative to the working directory.
pub fn load_default_report_settings() -> anyhow::Result<ReportSettings> {
    load_report_settings(DEFAULT_SETTINGS_PATH)
}

/// Loads settings from `path` (any format the `config` crate detects from the
/// extension) with `FLEET_REPORT__*` environment overrides on top.
pub fn load_report_settings(path: &str) -> anyhow::Result<ReportSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringEntry {
    Text(String),
    Group(HashMap<String, StringEntry>),
}

fn flatten_strings(prefix: &str, entries: HashMap<String, StringEntry>, out: &mut HashMap<String, String>) {
    for (name, entry) in entries {
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };
        match entry {
            StringEntry::Text(text) => {
                out.insert(key, text);
            }
            StringEntry::Group(group) => flatten_strings(&key, group, out),
        }
    }
}

fn deserialize_strings<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = HashMap::<String, StringEntry>::deserialize(deserializer)?;
    let mut strings = HashMap::with_capacity(entries.len());
    flatten_strings("", entries, &mut strings);
    Ok(strings)
}

/// An ordered column list. Columns are either tables
/// (`{ key = "speed", arg = "1" }`) or compact `"key:arg"` strings.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ReportDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_columns")]
    pub columns: Vec<ReportColumn>,
}

impl ReportDefinition {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }
}

pub fn load_report_definition(path: &str) -> anyhow::Result<ReportDefinition> {
    let text = std::fs::read_to_string(path)?;
    Ok(ReportDefinition::from_toml_str(&text)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnEntry {
    Compact(String),
    Full(ReportColumn),
}

fn deserialize_columns<'de, D>(deserializer: D) -> Result<Vec<ReportColumn>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<ColumnEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            ColumnEntry::Compact(text) => ReportColumn::parse(&text),
            ColumnEntry::Full(column) => column,
        })
        .collect())
}

/// `UTC`, `GMT`, `Z`, or an offset: `+02:00`, `-0530`, `+2`, `GMT+2`.
/// Returns the offset and the label shown in titles.
pub fn parse_timezone(text: &str) -> Option<(FixedOffset, String)> {
    let text = text.trim();
    let upper = text.to_ascii_uppercase();
    let offset = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if offset.is_empty() || offset == "Z" {
        return Some((FixedOffset::east_opt(0)?, "UTC".to_string()));
    }

    let (sign, digits) = match offset.as_bytes()[0] {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 && digits.is_ascii() => digits.split_at(2),
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    let seconds = sign * (hours * 3600 + minutes * 60);
    let offset = FixedOffset::east_opt(seconds)?;
    Some((offset, offset.to_string()))
}

fn parse_status_code(text: &str) -> Option<u32> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Replaces `${name}` placeholders with values from `vars`. Unknown names are
/// left as written.
pub fn expand_placeholders(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => result.push_str(value),
                    None => result.push_str(&rest[start..start + end + 3]),
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::{DistanceUnits, SpeedUnits};
    use crate::infrastructure::memory_directory::InMemoryDeviceDirectory;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_expand_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("speedUnits".to_string(), "mph".to_string());
        vars.insert("timezone".to_string(), "UTC".to_string());

        let title = "Speed\n${speedUnits} (${timezone}) ${missing} ${open";
        let result = expand_placeholders(title, &vars);

        assert_eq!(result, "Speed\nmph (UTC) ${missing} ${open");
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap().0.local_minus_utc(), 0);
        assert_eq!(parse_timezone(" gmt ").unwrap().1, "UTC");
        assert_eq!(parse_timezone("+02:00").unwrap().0.local_minus_utc(), 7200);
        assert_eq!(parse_timezone("-0530").unwrap().0.local_minus_utc(), -19800);
        let (offset, label) = parse_timezone("GMT+2").unwrap();
        assert_eq!(offset.local_minus_utc(), 7200);
        assert_eq!(label, "+02:00");
        assert!(parse_timezone("Europe/Paris").is_none());
        assert!(parse_timezone("+25:00").is_none());
        assert!(parse_timezone("+02:75").is_none());
        assert!(parse_timezone("+9999999").is_none());
        assert!(parse_timezone("-24").is_none());
        assert_eq!(parse_timezone("+23:59").unwrap().0.local_minus_utc(), 86_340);
    }

    #[test]
    fn test_settings_from_toml() {
        let settings = ReportSettings::from_toml_str(
            r##"
            locale = "de_DE"
            timezone = "+02:00"
            blank_filler = "n/a"
            gps_age_colors = "600:#FF0000"

            [units]
            distance = "miles"
            speed = "mph"

            [strings]
            "col.speed" = "Tempo"

            [status_styles."0xF020"]
            description = "Location"
            background = "#FFFF00"
            "##,
        )
        .unwrap();

        let ctx = settings.to_context(now(), None).unwrap();
        assert_eq!(ctx.units.distance, DistanceUnits::Miles);
        assert_eq!(ctx.units.speed, SpeedUnits::MilesPerHour);
        assert_eq!(ctx.timezone_label, "+02:00");
        assert_eq!(ctx.blank_filler, "n/a");
        assert_eq!(ctx.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(ctx.text("col.speed", "Speed"), "Tempo");
        assert_eq!(ctx.gps_age_colors, vec![AgeColorRange::new(600, "#FF0000")]);
        assert_eq!(ctx.status_style(0xF020).map(|s| s.description.as_str()), Some("Location"));
        assert_eq!(ctx.format_number(1.5, "1", "0"), "1,5");
        assert_eq!(ctx.expand_title("Speed\n${speedUnits}"), "Speed\nmph");
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = ReportSettings {
            timezone: "Mars/Olympus".to_string(),
            ..ReportSettings::default()
        };
        assert!(matches!(
            settings.to_context(now(), None),
            Err(SettingsError::InvalidTimezone(_))
        ));

        let mut settings = ReportSettings::default();
        settings
            .status_styles
            .insert("0xZZ".to_string(), StatusStyle::default());
        assert!(matches!(
            settings.to_context(now(), None),
            Err(SettingsError::InvalidStatusCode(_))
        ));
    }

    #[test]
    fn test_context_carries_directory() {
        let directory = Arc::new(InMemoryDeviceDirectory::new().with_last_event("acme", "truck1", 42));
        let ctx = ReportSettings::default()
            .to_context(now(), Some(directory))
            .unwrap();
        assert_eq!(ctx.last_event_timestamp("acme", "truck1").unwrap(), Some(42));
    }

    #[test]
    fn test_load_report_settings_from_file() {
        let dir = std::env::temp_dir().join(format!("fleet-report-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.toml");
        std::fs::write(&path, "timezone = \"-05:00\"\nmap_url = \"./map.html\"\n[units]\nvolume = \"gal\"\n")
            .unwrap();

        let settings = load_report_settings(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.timezone, "-05:00");
        assert_eq!(settings.map_url.as_deref(), Some("./map.html"));
        assert_eq!(settings.units.volume, crate::domain::units::VolumeUnits::UsGallons);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_oversized_timezone_offset_is_rejected() {
        let settings = ReportSettings::from_toml_str("timezone = \"+9999999\"").unwrap();
        let result = settings.to_context(now(), None);
        assert!(matches!(result, Err(SettingsError::InvalidTimezone(tz)) if tz == "+9999999"));
    }

    #[test]
    fn test_nested_strings_flatten_to_dotted_keys() {
        let settings = ReportSettings::from_toml_str(
            r#"
            [strings]
            "col.speed" = "Tempo"

            [strings.report]
            notAvailable = "k.A."
            "#,
        )
        .unwrap();
        assert_eq!(settings.strings.get("col.speed").map(String::as_str), Some("Tempo"));
        assert_eq!(
            settings.strings.get("report.notAvailable").map(String::as_str),
            Some("k.A.")
        );
    }

    #[test]
    fn test_load_default_report_settings() {
        let settings = load_default_report_settings().unwrap();
        assert_eq!(settings.units.speed, SpeedUnits::MilesPerHour);
        assert!(settings.strings.values().any(|text| text == "n/a"));
        let ctx = settings.to_context(now(), None).unwrap();
        assert!(ctx.status_style(0xF112).is_some());
    }

    #[test]
    fn test_report_definition_mixed_columns() {
        let definition = ReportDefinition::from_toml_str(
            r#"
            name = "Trip detail"
            columns = [
                "index",
                "speed:1",
                { key = "dateTime", title = "When" },
                { key = "fuelLevel", blank_filler = "" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(definition.name, "Trip detail");
        assert_eq!(
            definition.columns,
            vec![
                ReportColumn::new("index"),
                ReportColumn::new("speed").with_arg("1"),
                ReportColumn::new("dateTime").with_title("When"),
                ReportColumn::new("fuelLevel").with_blank_filler(""),
            ]
        );
        assert!(ReportDefinition::from_toml_str("columns = 3").is_err());
    }
}
