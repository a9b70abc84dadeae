// Event record accessors read by the column templates
use serde::Deserialize;
use serde_json::{Map, Value};

/// Temperatures outside this open range (°C) are sensor noise.
const MIN_VALID_TEMPERATURE_C: f64 = -126.0;
const MAX_VALID_TEMPERATURE_C: f64 = 126.0;

/// Number of auxiliary temperature sensors an event can carry.
pub const THERMO_SENSOR_COUNT: usize = 8;

pub fn is_valid_temperature(celsius: f64) -> bool {
    celsius.is_finite() && celsius > MIN_VALID_TEMPERATURE_C && celsius < MAX_VALID_TEMPERATURE_C
}

/// Read-only view of one telemetry event.
///
/// All measurements are metric (km, km/h, liters, kPa, °C, meters). Zero usually
/// means "not reported"; each column decides how to treat zero and negative
/// values for its own quantity.
pub trait EventRecord {
    fn account_id(&self) -> &str;
    fn device_id(&self) -> &str;

    /// Event time, epoch seconds.
    fn timestamp(&self) -> i64;

    /// Insert time, epoch milliseconds.
    fn creation_millis(&self) -> i64 {
        0
    }

    fn creation_time(&self) -> i64 {
        self.creation_millis() / 1000
    }

    /// Seconds between the event time and its insertion.
    fn creation_age(&self) -> i64 {
        let created = self.creation_time();
        if created > 0 { created - self.timestamp() } else { 0 }
    }

    fn status_code(&self) -> u32;

    fn latitude(&self) -> f64 {
        0.0
    }
    fn longitude(&self) -> f64 {
        0.0
    }
    /// Seconds since the GPS fix was obtained.
    fn gps_age(&self) -> i64 {
        0
    }
    fn altitude_meters(&self) -> f64 {
        0.0
    }
    fn horz_accuracy_meters(&self) -> f64 {
        0.0
    }
    fn satellite_count(&self) -> i32 {
        0
    }
    fn address(&self) -> &str {
        ""
    }
    fn city(&self) -> &str {
        ""
    }

    fn speed_kph(&self) -> f64 {
        0.0
    }
    fn speed_limit_kph(&self) -> f64 {
        0.0
    }
    fn heading(&self) -> f64 {
        0.0
    }
    fn distance_km(&self) -> f64 {
        0.0
    }
    fn odometer_km(&self) -> f64 {
        0.0
    }
    fn report_distance_km(&self) -> f64 {
        0.0
    }

    /// Either a fraction (0..1] or volts when above 1.
    fn battery_level(&self) -> f64 {
        0.0
    }
    fn battery_volts(&self) -> f64 {
        0.0
    }
    fn battery_temp_c(&self) -> Option<f64> {
        None
    }

    /// Fraction (0..1]; negative means the sensor reported "unavailable".
    fn fuel_level(&self) -> f64 {
        0.0
    }
    fn fuel_total_liters(&self) -> f64 {
        0.0
    }
    fn fuel_remain_liters(&self) -> f64 {
        0.0
    }
    fn fuel_economy_kpl(&self) -> f64 {
        0.0
    }
    fn fuel_pressure_kpa(&self) -> f64 {
        0.0
    }

    /// Negative when not reported.
    fn engine_rpm(&self) -> i64 {
        -1
    }
    fn engine_hours(&self) -> f64 {
        0.0
    }
    fn idle_hours(&self) -> f64 {
        0.0
    }
    fn coolant_temp_c(&self) -> Option<f64> {
        None
    }
    fn oil_pressure_kpa(&self) -> f64 {
        0.0
    }
    fn tire_pressures_kpa(&self) -> &[f64] {
        &[]
    }
    fn tire_temps_c(&self) -> &[f64] {
        &[]
    }

    fn ambient_temp_c(&self) -> Option<f64> {
        None
    }
    fn barometer_kpa(&self) -> f64 {
        0.0
    }
    /// Sensor `index` is zero-based.
    fn thermo_c(&self, _index: usize) -> Option<f64> {
        None
    }

    /// MIME type of the attached payload, if any.
    fn attachment_type(&self) -> Option<&str> {
        None
    }
    fn attachment_properties(&self) -> Option<&Map<String, Value>> {
        None
    }
}

/// Plain event record, as handed over by a data-access layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventData {
    pub account_id: String,
    pub device_id: String,
    pub timestamp: i64,
    pub creation_millis: i64,
    pub status_code: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub gps_age: i64,
    pub altitude_meters: f64,
    pub horz_accuracy_meters: f64,
    pub satellite_count: i32,
    pub address: String,
    pub city: String,
    pub speed_kph: f64,
    pub speed_limit_kph: f64,
    pub heading: f64,
    pub distance_km: f64,
    pub odometer_km: f64,
    pub report_distance_km: f64,
    pub battery_level: f64,
    pub battery_volts: f64,
    pub battery_temp_c: Option<f64>,
    pub fuel_level: f64,
    pub fuel_total_liters: f64,
    pub fuel_remain_liters: f64,
    pub fuel_economy_kpl: f64,
    pub fuel_pressure_kpa: f64,
    pub engine_rpm: Option<i64>,
    pub engine_hours: f64,
    pub idle_hours: f64,
    pub coolant_temp_c: Option<f64>,
    pub oil_pressure_kpa: f64,
    pub tire_pressures_kpa: Vec<f64>,
    pub tire_temps_c: Vec<f64>,
    pub ambient_temp_c: Option<f64>,
    pub barometer_kpa: f64,
    pub thermo_c: Vec<Option<f64>>,
    pub attachment_type: Option<String>,
    pub attachment_properties: Option<Map<String, Value>>,
}

impl EventData {
    pub fn new(account_id: impl Into<String>, device_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            account_id: account_id.into(),
            device_id: device_id.into(),
            timestamp,
            ..Self::default()
        }
    }
}

impl EventRecord for EventData {
    fn account_id(&self) -> &str {
        &self.account_id
    }
    fn device_id(&self) -> &str {
        &self.device_id
    }
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
    fn creation_millis(&self) -> i64 {
        self.creation_millis
    }
    fn status_code(&self) -> u32 {
        self.status_code
    }
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
    fn gps_age(&self) -> i64 {
        self.gps_age
    }
    fn altitude_meters(&self) -> f64 {
        self.altitude_meters
    }
    fn horz_accuracy_meters(&self) -> f64 {
        self.horz_accuracy_meters
    }
    fn satellite_count(&self) -> i32 {
        self.satellite_count
    }
    fn address(&self) -> &str {
        &self.address
    }
    fn city(&self) -> &str {
        &self.city
    }
    fn speed_kph(&self) -> f64 {
        self.speed_kph
    }
    fn speed_limit_kph(&self) -> f64 {
        self.speed_limit_kph
    }
    fn heading(&self) -> f64 {
        self.heading
    }
    fn distance_km(&self) -> f64 {
        self.distance_km
    }
    fn odometer_km(&self) -> f64 {
        self.odometer_km
    }
    fn report_distance_km(&self) -> f64 {
        self.report_distance_km
    }
    fn battery_level(&self) -> f64 {
        self.battery_level
    }
    fn battery_volts(&self) -> f64 {
        self.battery_volts
    }
    fn battery_temp_c(&self) -> Option<f64> {
        self.battery_temp_c
    }
    fn fuel_level(&self) -> f64 {
        self.fuel_level
    }
    fn fuel_total_liters(&self) -> f64 {
        self.fuel_total_liters
    }
    fn fuel_remain_liters(&self) -> f64 {
        self.fuel_remain_liters
    }
    fn fuel_economy_kpl(&self) -> f64 {
        self.fuel_economy_kpl
    }
    fn fuel_pressure_kpa(&self) -> f64 {
        self.fuel_pressure_kpa
    }
    fn engine_rpm(&self) -> i64 {
        self.engine_rpm.unwrap_or(-1)
    }
    fn engine_hours(&self) -> f64 {
        self.engine_hours
    }
    fn idle_hours(&self) -> f64 {
        self.idle_hours
    }
    fn coolant_temp_c(&self) -> Option<f64> {
        self.coolant_temp_c
    }
    fn oil_pressure_kpa(&self) -> f64 {
        self.oil_pressure_kpa
    }
    fn tire_pressures_kpa(&self) -> &[f64] {
        &self.tire_pressures_kpa
    }
    fn tire_temps_c(&self) -> &[f64] {
        &self.tire_temps_c
    }
    fn ambient_temp_c(&self) -> Option<f64> {
        self.ambient_temp_c
    }
    fn barometer_kpa(&self) -> f64 {
        self.barometer_kpa
    }
    fn thermo_c(&self, index: usize) -> Option<f64> {
        self.thermo_c.get(index).copied().flatten()
    }
    fn attachment_type(&self) -> Option<&str> {
        self.attachment_type.as_deref()
    }
    fn attachment_properties(&self) -> Option<&Map<String, Value>> {
        self.attachment_properties.as_ref()
    }
}
