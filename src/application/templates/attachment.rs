// Attachment link and attachment property columns
use super::{EventCatalogBuilder, hundredths, link_url, temperature_text, title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::elapsed::{ElapsedFormat, format_elapsed, resolve_elapsed_format};
use crate::domain::event::is_valid_temperature;
use crate::domain::geo::{GeoFormat, format_point, is_valid_point};
use crate::domain::number_format::parse_number;
use crate::domain::status::hex_status_code;
use crate::domain::units::{
    convert_altitude, convert_distance, convert_economy, convert_pressure, convert_speed,
    convert_volume,
};
use serde_json::{Map, Value};

const DEFAULT_ATTACHMENT_URL: &str = "./Attach";
const DEFAULT_EXTENSION: &str = "txt";
const ATTACHMENT_WINDOW_TARGET: &str = "Attachment";
const SECONDS_PER_HOUR: f64 = 3600.0;

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("attachURL", title("col.attachURL", "Attachment"), |_row, ctx, _arg, ev| {
        let Some(mime) = ev.attachment_type().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(ColumnValue::blank());
        };
        let extension = extension_for_mime(mime);
        let base = format!(
            "{}.{}",
            ctx.attachment_url.as_deref().unwrap_or(DEFAULT_ATTACHMENT_URL),
            extension
        );
        let timestamp = ev.timestamp().to_string();
        let status = hex_status_code(ev.status_code());
        let url = link_url(
            &base,
            &[("d", ev.device_id()), ("ts", timestamp.as_str()), ("sc", status.as_str())],
        );
        let cell = ColumnValue::new(extension).with_link(url.clone(), Some(ATTACHMENT_WINDOW_TARGET));
        if mime.to_ascii_lowercase().starts_with("image/") {
            Ok(cell.with_image(url))
        } else {
            Ok(cell)
        }
    })?;

    builder.register("attachProp", property_title, |_row, ctx, arg, ev| {
        let (name, format) = split_property_arg(arg);
        if name.is_empty() {
            return Ok(ColumnValue::blank());
        }
        let Some(props) = ev.attachment_properties() else {
            tracing::debug!("Event {}/{} has no attachment properties", ev.account_id(), ev.device_id());
            return Ok(ColumnValue::blank());
        };
        Ok(property_cell(ctx, props, name, format))
    })?;

    Ok(())
}

/// `"name:FMT"` into its trimmed halves.
fn split_property_arg(arg: &str) -> (&str, &str) {
    match arg.trim().split_once(':') {
        Some((name, format)) => (name.trim(), format.trim()),
        None => (arg.trim(), ""),
    }
}

fn property_title(ctx: &ReportContext, arg: &str) -> String {
    let (name, _) = split_property_arg(arg);
    if name.is_empty() {
        ctx.text("col.attachProp", "Value").to_string()
    } else {
        name.to_string()
    }
}

/// Renders one property. The first format letter picks the quantity, the
/// rest is the number pattern argument.
fn property_cell(ctx: &ReportContext, props: &Map<String, Value>, name: &str, format: &str) -> ColumnValue {
    let mut chars = format.chars();
    let kind = chars.next().map(|c| c.to_ascii_uppercase());
    let pattern = chars.as_str();
    let number = || property_number(props, name);
    let units = &ctx.units;

    // Numeric kinds sort on the base-unit value, not the converted text.
    let (text, sort_key) = match kind {
        None | Some('$') => (property_string(props, name), None),
        Some('N') if pattern.is_empty() => {
            let whole = number().trunc();
            ((whole as i64).to_string(), Some(whole))
        }
        Some('N' | 'M' | 'F' | 'R' | 'C') => {
            let value = number();
            (ctx.format_number(value, pattern, "0"), Some(hundredths(value)))
        }
        Some('K') => {
            let km = number();
            if !(km > 0.0) {
                return ColumnValue::blank();
            }
            let text = ctx.format_number(convert_distance(km, units.distance), pattern, "0");
            (text, Some(hundredths(km)))
        }
        Some('S') => {
            let kph = number();
            let text = ctx.format_number(convert_speed(kph, units.speed), pattern, "0");
            (text, Some(hundredths(kph)))
        }
        Some('E') => {
            let kpl = number();
            let text = ctx.format_number(convert_economy(kpl, units.economy), pattern, "0");
            (text, Some(hundredths(kpl)))
        }
        Some('V') => {
            let liters = number();
            let text = ctx.format_number(convert_volume(liters, units.volume), pattern, "0");
            (text, Some(hundredths(liters)))
        }
        Some('P') => {
            let kpa = number();
            let text = ctx.format_number(convert_pressure(kpa, units.pressure), pattern, "0.0");
            (text, Some(hundredths(kpa)))
        }
        Some('A') => {
            let meters = number();
            let text = ctx.format_number(convert_altitude(meters, units.altitude), pattern, "0");
            (text, Some(hundredths(meters)))
        }
        Some('T') => {
            let celsius = number();
            if !is_valid_temperature(celsius) {
                return ColumnValue::blank();
            }
            (temperature_text(ctx, celsius, pattern), Some(hundredths(celsius)))
        }
        Some('L') => {
            let Some((lat, lon)) = parse_point(&property_string(props, name)) else {
                return ColumnValue::blank();
            };
            let format = GeoFormat::from_arg(pattern, units.lat_lon);
            (format_point(lat, lon, &format, ctx.symbols()), None)
        }
        Some('H') => {
            let secs = property_seconds(props, name);
            let format = resolve_elapsed_format(pattern, ElapsedFormat::HhMmSs);
            (format_elapsed(secs, format), Some(secs as f64))
        }
        Some(_) => (property_string(props, name), None),
    };
    match sort_key {
        Some(key) => ColumnValue::new(text).with_sort_key(key),
        None => ColumnValue::new(text),
    }
}

fn property_string(props: &Map<String, Value>, name: &str) -> String {
    match props.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn property_number(props: &Map<String, Value>, name: &str) -> f64 {
    match props.get(name) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_number(s),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Whole numbers are seconds, fractional values are hours.
fn property_seconds(props: &Map<String, Value>, name: &str) -> i64 {
    let text = property_string(props, name);
    if text.contains('.') {
        (parse_number(&text) * SECONDS_PER_HOUR).round() as i64
    } else {
        text.trim().parse::<i64>().unwrap_or(0)
    }
}

/// `"lat/lon"` or `"lat,lon"`.
fn parse_point(text: &str) -> Option<(f64, f64)> {
    let (lat, lon) = text.split_once('/').or_else(|| text.split_once(','))?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    is_valid_point(lat, lon).then_some((lat, lon))
}

fn extension_for_mime(mime: &str) -> String {
    let mime = mime.split(';').next().unwrap_or(mime).trim().to_ascii_lowercase();
    let extension = match mime.as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" | "image/x-ms-bmp" => "bmp",
        "image/tiff" => "tif",
        "application/pdf" => "pdf",
        "application/xml" | "text/xml" => "xml",
        "text/html" => "html",
        "text/csv" => "csv",
        "text/plain" => DEFAULT_EXTENSION,
        other => match other.split_once('/') {
            Some((_, sub)) if !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()) => sub,
            _ => DEFAULT_EXTENSION,
        },
    };
    extension.to_string()
}
