// Latitude/longitude and heading presentation
use super::number_format::{NumberSymbols, format_number_with};
use super::units::LatLonFormat;

const DEFAULT_DECIMAL_DIGITS: &str = "4";

/// Separator between the latitude and longitude of a point.
pub const POINT_SEPARATOR: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoFormat {
    /// Signed decimal degrees; the string is a number-format argument.
    Decimal(String),
    DegMin,
    DegMinSec,
}

impl GeoFormat {
    /// Column argument `dms`, `dm`, or a number-format argument. A blank
    /// argument uses the account preference.
    pub fn from_arg(arg: &str, preference: LatLonFormat) -> Self {
        let arg = arg.trim();
        if arg.eq_ignore_ascii_case("dms") {
            return Self::DegMinSec;
        }
        if arg.eq_ignore_ascii_case("dm") {
            return Self::DegMin;
        }
        if !arg.is_empty() {
            return Self::Decimal(arg.to_string());
        }
        match preference {
            LatLonFormat::Decimal => Self::Decimal(DEFAULT_DECIMAL_DIGITS.to_string()),
            LatLonFormat::DegMin => Self::DegMin,
            LatLonFormat::DegMinSec => Self::DegMinSec,
        }
    }
}

pub fn is_valid_point(lat: f64, lon: f64) -> bool {
    let in_range = lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon);
    in_range && !(lat.abs() < 0.0001 && lon.abs() < 0.0001)
}

pub fn format_latitude(lat: f64, format: &GeoFormat, symbols: NumberSymbols) -> String {
    format_coordinate(lat, format, symbols, ('N', 'S'))
}

pub fn format_longitude(lon: f64, format: &GeoFormat, symbols: NumberSymbols) -> String {
    format_coordinate(lon, format, symbols, ('E', 'W'))
}

pub fn format_point(lat: f64, lon: f64, format: &GeoFormat, symbols: NumberSymbols) -> String {
    format!(
        "{}{}{}",
        format_latitude(lat, format, symbols),
        POINT_SEPARATOR,
        format_longitude(lon, format, symbols)
    )
}

fn format_coordinate(
    value: f64,
    format: &GeoFormat,
    symbols: NumberSymbols,
    hemispheres: (char, char),
) -> String {
    let hemisphere = if value < 0.0 { hemispheres.1 } else { hemispheres.0 };
    let abs = if value.is_finite() { value.abs() } else { 0.0 };
    match format {
        GeoFormat::Decimal(arg) => {
            format_number_with(value, arg, "0.0000", symbols)
        }
        GeoFormat::DegMinSec => {
            let total = (abs * 3600.0).round() as i64;
            let (deg, min, sec) = (total / 3600, (total % 3600) / 60, total % 60);
            format!("{deg}°{min:02}'{sec:02}\"{hemisphere}")
        }
        GeoFormat::DegMin => {
            let total = (abs * 6000.0).round() as i64;
            let (deg, hundredths) = (total / 6000, total % 6000);
            format!(
                "{deg}°{:02}{}{:02}'{hemisphere}",
                hundredths / 100,
                symbols.decimal,
                hundredths % 100
            )
        }
    }
}

/// Eight-point compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const ALL: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    pub fn from_heading(degrees: f64) -> Self {
        let degrees = if degrees.is_finite() { degrees.rem_euclid(360.0) } else { 0.0 };
        let index = ((degrees + 22.5) / 45.0).floor() as usize % 8;
        Self::ALL[index]
    }

    /// String-table key and English abbreviation.
    pub fn label(self) -> (&'static str, &'static str) {
        match self {
            Self::N => ("compass.n", "N"),
            Self::NE => ("compass.ne", "NE"),
            Self::E => ("compass.e", "E"),
            Self::SE => ("compass.se", "SE"),
            Self::S => ("compass.s", "S"),
            Self::SW => ("compass.sw", "SW"),
            Self::W => ("compass.w", "W"),
            Self::NW => ("compass.nw", "NW"),
        }
    }
}
