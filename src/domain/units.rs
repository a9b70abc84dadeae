// Unit conversion from stored metric values to account display units
use serde::Deserialize;

const KM_TO_MILES: f64 = 0.621371192;
const KM_TO_NAUTICAL_MILES: f64 = 0.539956803;
const LITERS_TO_US_GALLONS: f64 = 0.264172052;
const LITERS_TO_IMPERIAL_GALLONS: f64 = 0.219969157;
const LITERS_TO_CUBIC_FEET: f64 = 0.0353146667;
const KPA_TO_PSI: f64 = 0.145037738;
const KPA_TO_BAR: f64 = 0.01;
const KPA_TO_MMHG: f64 = 7.50061683;
const KPL_TO_US_MPG: f64 = 2.35214583;
const KPL_TO_IMPERIAL_MPG: f64 = 2.82480936;
const METERS_TO_FEET: f64 = 3.2808399;

/// String-table key and English default for a unit abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabel {
    pub key: &'static str,
    pub default: &'static str,
}

const fn label(key: &'static str, default: &'static str) -> UnitLabel {
    UnitLabel { key, default }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnits {
    #[default]
    #[serde(alias = "km")]
    Kilometers,
    #[serde(alias = "mi", alias = "mile")]
    Miles,
    #[serde(alias = "nm", alias = "nautical")]
    NauticalMiles,
}

impl DistanceUnits {
    pub fn convert_from_km(self, km: f64) -> f64 {
        match self {
            Self::Kilometers => km,
            Self::Miles => km * KM_TO_MILES,
            Self::NauticalMiles => km * KM_TO_NAUTICAL_MILES,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::Kilometers => label("units.km", "km"),
            Self::Miles => label("units.miles", "Miles"),
            Self::NauticalMiles => label("units.nauticalMiles", "Nm"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnits {
    #[default]
    #[serde(alias = "kph", alias = "km/h")]
    KilometersPerHour,
    #[serde(alias = "mph")]
    MilesPerHour,
    #[serde(alias = "kn", alias = "knot")]
    Knots,
}

impl SpeedUnits {
    pub fn convert_from_kph(self, kph: f64) -> f64 {
        match self {
            Self::KilometersPerHour => kph,
            Self::MilesPerHour => kph * KM_TO_MILES,
            Self::Knots => kph * KM_TO_NAUTICAL_MILES,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::KilometersPerHour => label("units.kph", "km/h"),
            Self::MilesPerHour => label("units.mph", "mph"),
            Self::Knots => label("units.knots", "knots"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnits {
    #[default]
    #[serde(alias = "l", alias = "liter")]
    Liters,
    #[serde(alias = "gal", alias = "us_gal")]
    UsGallons,
    #[serde(alias = "imp_gal")]
    ImperialGallons,
    #[serde(alias = "ft3")]
    CubicFeet,
}

impl VolumeUnits {
    pub fn convert_from_liters(self, liters: f64) -> f64 {
        match self {
            Self::Liters => liters,
            Self::UsGallons => liters * LITERS_TO_US_GALLONS,
            Self::ImperialGallons => liters * LITERS_TO_IMPERIAL_GALLONS,
            Self::CubicFeet => liters * LITERS_TO_CUBIC_FEET,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::Liters => label("units.liters", "Liters"),
            Self::UsGallons => label("units.gallons", "Gal"),
            Self::ImperialGallons => label("units.imperialGallons", "IG"),
            Self::CubicFeet => label("units.cubicFeet", "ft^3"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnits {
    #[default]
    #[serde(alias = "kilopascals")]
    Kpa,
    Psi,
    Bar,
    #[serde(alias = "mm_hg")]
    Mmhg,
}

impl PressureUnits {
    pub fn convert_from_kpa(self, kpa: f64) -> f64 {
        match self {
            Self::Kpa => kpa,
            Self::Psi => kpa * KPA_TO_PSI,
            Self::Bar => kpa * KPA_TO_BAR,
            Self::Mmhg => kpa * KPA_TO_MMHG,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::Kpa => label("units.kpa", "kPa"),
            Self::Psi => label("units.psi", "psi"),
            Self::Bar => label("units.bar", "bar"),
            Self::Mmhg => label("units.mmhg", "mmHg"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnits {
    #[default]
    #[serde(alias = "c")]
    Celsius,
    #[serde(alias = "f")]
    Fahrenheit,
}

impl TemperatureUnits {
    pub fn convert_from_c(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::Celsius => label("units.celsius", "°C"),
            Self::Fahrenheit => label("units.fahrenheit", "°F"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomyUnits {
    #[default]
    #[serde(alias = "kpl")]
    KilometersPerLiter,
    #[serde(alias = "mpg")]
    MilesPerGallon,
    #[serde(alias = "mpg_imp")]
    ImperialMilesPerGallon,
}

impl EconomyUnits {
    pub fn convert_from_kpl(self, kpl: f64) -> f64 {
        match self {
            Self::KilometersPerLiter => kpl,
            Self::MilesPerGallon => kpl * KPL_TO_US_MPG,
            Self::ImperialMilesPerGallon => kpl * KPL_TO_IMPERIAL_MPG,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::KilometersPerLiter => label("units.kpl", "km/L"),
            Self::MilesPerGallon => label("units.mpg", "mpg"),
            Self::ImperialMilesPerGallon => label("units.mpgImperial", "mpg (Imp)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltitudeUnits {
    #[default]
    #[serde(alias = "m")]
    Meters,
    #[serde(alias = "ft")]
    Feet,
}

impl AltitudeUnits {
    pub fn convert_from_meters(self, meters: f64) -> f64 {
        match self {
            Self::Meters => meters,
            Self::Feet => meters * METERS_TO_FEET,
        }
    }

    pub fn label(self) -> UnitLabel {
        match self {
            Self::Meters => label("units.meters", "meters"),
            Self::Feet => label("units.feet", "feet"),
        }
    }
}

/// How latitude/longitude are shown when a column argument does not say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatLonFormat {
    #[default]
    Decimal,
    #[serde(alias = "dm")]
    DegMin,
    #[serde(alias = "dms")]
    DegMinSec,
}

/// Per-account display preferences, one per quantity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnitPreferences {
    pub distance: DistanceUnits,
    pub speed: SpeedUnits,
    pub volume: VolumeUnits,
    pub pressure: PressureUnits,
    pub temperature: TemperatureUnits,
    pub economy: EconomyUnits,
    pub altitude: AltitudeUnits,
    pub lat_lon: LatLonFormat,
}

pub fn convert_distance(km: f64, units: DistanceUnits) -> f64 {
    units.convert_from_km(km)
}

pub fn convert_speed(kph: f64, units: SpeedUnits) -> f64 {
    units.convert_from_kph(kph)
}

pub fn convert_volume(liters: f64, units: VolumeUnits) -> f64 {
    units.convert_from_liters(liters)
}

pub fn convert_pressure(kpa: f64, units: PressureUnits) -> f64 {
    units.convert_from_kpa(kpa)
}

pub fn convert_temperature(celsius: f64, units: TemperatureUnits) -> f64 {
    units.convert_from_c(celsius)
}

pub fn convert_economy(kpl: f64, units: EconomyUnits) -> f64 {
    units.convert_from_kpl(kpl)
}

pub fn convert_altitude(meters: f64, units: AltitudeUnits) -> f64 {
    units.convert_from_meters(meters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    fn assert_linear(convert: impl Fn(f64) -> f64) {
        assert_eq!(convert(0.0), 0.0);
        for (a, b) in [(1.0, 2.0), (12.5, 87.25), (-3.0, 40.0)] {
            assert_close(convert(a + b), convert(a) + convert(b));
        }
    }

    #[test]
    fn test_linear_conversions() {
        for units in [DistanceUnits::Kilometers, DistanceUnits::Miles, DistanceUnits::NauticalMiles] {
            assert_linear(|v| convert_distance(v, units));
        }
        for units in [SpeedUnits::KilometersPerHour, SpeedUnits::MilesPerHour, SpeedUnits::Knots] {
            assert_linear(|v| convert_speed(v, units));
        }
        for units in [
            VolumeUnits::Liters,
            VolumeUnits::UsGallons,
            VolumeUnits::ImperialGallons,
            VolumeUnits::CubicFeet,
        ] {
            assert_linear(|v| convert_volume(v, units));
        }
        for units in [PressureUnits::Kpa, PressureUnits::Psi, PressureUnits::Bar, PressureUnits::Mmhg] {
            assert_linear(|v| convert_pressure(v, units));
        }
        for units in [
            EconomyUnits::KilometersPerLiter,
            EconomyUnits::MilesPerGallon,
            EconomyUnits::ImperialMilesPerGallon,
        ] {
            assert_linear(|v| convert_economy(v, units));
        }
        for units in [AltitudeUnits::Meters, AltitudeUnits::Feet] {
            assert_linear(|v| convert_altitude(v, units));
        }
    }

    #[test]
    fn test_known_factors() {
        assert_close(convert_distance(100.0, DistanceUnits::Miles), 62.1371192);
        assert_close(convert_speed(100.0, SpeedUnits::Knots), 53.9956803);
        assert_close(convert_volume(10.0, VolumeUnits::UsGallons), 2.64172052);
        assert_close(convert_pressure(100.0, PressureUnits::Psi), 14.5037738);
        assert_close(convert_altitude(1000.0, AltitudeUnits::Feet), 3280.8399);
    }

    #[test]
    fn test_temperature_is_affine() {
        assert_eq!(convert_temperature(0.0, TemperatureUnits::Fahrenheit), 32.0);
        assert_eq!(convert_temperature(100.0, TemperatureUnits::Fahrenheit), 212.0);
        assert_eq!(convert_temperature(-40.0, TemperatureUnits::Fahrenheit), -40.0);
        assert_eq!(convert_temperature(21.5, TemperatureUnits::Celsius), 21.5);
    }

    #[test]
    fn test_preferences_deserialize_with_aliases() {
        let prefs: UnitPreferences = toml::from_str(
            r#"
            distance = "mi"
            speed = "mph"
            temperature = "f"
            lat_lon = "dms"
            "#,
        )
        .unwrap();
        assert_eq!(prefs.distance, DistanceUnits::Miles);
        assert_eq!(prefs.speed, SpeedUnits::MilesPerHour);
        assert_eq!(prefs.temperature, TemperatureUnits::Fahrenheit);
        assert_eq!(prefs.lat_lon, LatLonFormat::DegMinSec);
        assert_eq!(prefs.volume, VolumeUnits::Liters);
    }
}
