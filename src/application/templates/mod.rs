// Built-in event column templates, grouped by subject
use crate::application::catalog::{CatalogError, ColumnCatalog, ColumnCatalogBuilder, ResolveError};
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::device::DeviceInfo;
use crate::domain::event::{EventRecord, is_valid_temperature};
use crate::domain::units::{convert_pressure, convert_temperature, convert_volume};

mod attachment;
mod engine;
mod environment;
mod fuel;
mod identity;
mod location;
mod motion;
mod status;
mod time;

type EventCatalogBuilder = ColumnCatalogBuilder<dyn EventRecord>;

/// String-table key for the "not available" marker.
const NOT_AVAILABLE_KEY: &str = "report.notAvailable";

pub(crate) fn build_event_catalog() -> Result<ColumnCatalog<dyn EventRecord>, CatalogError> {
    let mut builder = ColumnCatalog::builder();
    identity::register(&mut builder)?;
    time::register(&mut builder)?;
    location::register(&mut builder)?;
    motion::register(&mut builder)?;
    status::register(&mut builder)?;
    fuel::register(&mut builder)?;
    engine::register(&mut builder)?;
    environment::register(&mut builder)?;
    attachment::register(&mut builder)?;
    Ok(builder.build())
}

/// Title resolver for a fixed, localizable title.
fn title(
    key: &'static str,
    default: &'static str,
) -> impl Fn(&ReportContext, &str) -> String + Send + Sync + 'static {
    move |ctx, _arg| ctx.text(key, default).to_string()
}

/// Title resolver with a second line naming the unit, e.g. `"Speed\n${speedUnits}"`.
fn unit_title(
    key: &'static str,
    default: &'static str,
    placeholder: &'static str,
) -> impl Fn(&ReportContext, &str) -> String + Send + Sync + 'static {
    move |ctx, _arg| format!("{}\n${{{}}}", ctx.text(key, default), placeholder)
}

fn not_available(ctx: &ReportContext) -> ColumnValue {
    ColumnValue::new(ctx.text(NOT_AVAILABLE_KEY, "n/a"))
}

fn device_of(ctx: &ReportContext, ev: &dyn EventRecord) -> Result<Option<DeviceInfo>, ResolveError> {
    Ok(ctx.device(ev.account_id(), ev.device_id())?)
}

/// Appends url-encoded query parameters to `base`.
fn link_url(base: &str, params: &[(&str, &str)]) -> String {
    let mut url = base.to_string();
    for (i, (name, value)) in params.iter().enumerate() {
        let separator = if i == 0 && !base.contains('?') { '?' } else { '&' };
        url.push(separator);
        url.push_str(&urlencoding::encode(name));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

/// Sort key for a measurement: base unit value scaled by 100 and truncated.
fn hundredths(value: f64) -> f64 {
    (value * 100.0).trunc()
}

/// Integer percent for a level given either as a fraction (0..1] or as a
/// percent (> 1). `None` when the level is not positive.
fn percent_text(level: f64) -> Option<String> {
    if !(level > 0.0) {
        return None;
    }
    let pct = if level <= 1.0 { level * 100.0 } else { level };
    Some(format!("{}%", pct.round() as i64))
}

fn temperature_text(ctx: &ReportContext, celsius: f64, arg: &str) -> String {
    let units = ctx.units.temperature;
    format!(
        "{}{}",
        ctx.format_number(convert_temperature(celsius, units), arg, "0.0"),
        ctx.unit_text(units.label())
    )
}

/// Converted temperature with its unit; blank when the reading is missing or
/// outside the sensor range. Sorted on °C ×100.
fn temperature_cell(ctx: &ReportContext, celsius: Option<f64>, arg: &str) -> ColumnValue {
    match celsius {
        Some(c) if is_valid_temperature(c) => {
            ColumnValue::new(temperature_text(ctx, c, arg)).with_sort_key(hundredths(c))
        }
        _ => ColumnValue::blank(),
    }
}

/// Positive volumes only.
fn volume_cell(ctx: &ReportContext, liters: f64, arg: &str) -> ColumnValue {
    if liters > 0.0 {
        let volume = convert_volume(liters, ctx.units.volume);
        ColumnValue::new(ctx.format_number(volume, arg, "0.0")).with_sort_key(hundredths(liters))
    } else {
        ColumnValue::blank()
    }
}

fn pressure_text(ctx: &ReportContext, kpa: f64, arg: &str, default_pattern: &str) -> String {
    ctx.format_number(convert_pressure(kpa, ctx.units.pressure), arg, default_pattern)
}
