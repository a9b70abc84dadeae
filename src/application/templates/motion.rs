// Speed, heading and distance columns
use super::{EventCatalogBuilder, device_of, hundredths, title, unit_title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::geo::CompassPoint;
use crate::domain::units::{convert_distance, convert_speed};

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register(
        "speed",
        unit_title("col.speed", "Speed", "speedUnits"),
        |_row, ctx, arg, ev| {
            let kph = ev.speed_kph();
            if kph > 0.0 {
                Ok(ColumnValue::new(speed_text(ctx, kph, arg)).with_sort_key(hundredths(kph)))
            } else {
                Ok(ColumnValue::new("0").with_sort_key(0))
            }
        },
    )?;

    builder.register(
        "speedLimit",
        unit_title("col.speedLimit", "Speed Limit", "speedUnits"),
        |_row, ctx, arg, ev| {
            let kph = ev.speed_limit_kph();
            if kph > 0.0 {
                Ok(ColumnValue::new(speed_text(ctx, kph, arg)).with_sort_key(hundredths(kph)))
            } else {
                Ok(ColumnValue::blank())
            }
        },
    )?;

    builder.register(
        "speedH",
        unit_title("col.speed", "Speed", "speedUnits"),
        |_row, ctx, arg, ev| {
            let kph = ev.speed_kph();
            if !(kph > 0.0) {
                return Ok(ColumnValue::new("0").with_sort_key(0));
            }
            let text = format!("{} {}", speed_text(ctx, kph, arg), compass_text(ctx, ev.heading()));
            Ok(ColumnValue::new(text).with_sort_key(hundredths(kph)))
        },
    )?;

    builder.register("speedU", title("col.speed", "Speed"), |_row, ctx, arg, ev| {
        let kph = ev.speed_kph();
        if !(kph > 0.0) {
            return Ok(ColumnValue::new("0").with_sort_key(0));
        }
        let text = format!(
            "{}{} {}",
            speed_text(ctx, kph, arg),
            ctx.unit_text(ctx.units.speed.label()),
            compass_text(ctx, ev.heading())
        );
        Ok(ColumnValue::new(text).with_sort_key(hundredths(kph)))
    })?;

    builder.register("heading", title("col.heading", "Heading"), |_row, ctx, arg, ev| {
        if !(ev.speed_kph() > 0.0) {
            return Ok(ColumnValue::blank());
        }
        let heading = ev.heading();
        let text = if arg.trim().is_empty() {
            compass_text(ctx, heading)
        } else {
            ctx.format_number(heading, arg, "0")
        };
        Ok(ColumnValue::new(text).with_sort_key(heading))
    })?;

    builder.register(
        "distance",
        unit_title("col.distance", "Distance", "distanceUnits"),
        |_row, ctx, arg, ev| Ok(distance_cell(ctx, ev.distance_km(), arg)),
    )?;

    builder.register(
        "odometer",
        unit_title("col.odometer", "Odometer", "distanceUnits"),
        |_row, ctx, arg, ev| {
            let offset = device_of(ctx, ev)?.map_or(0.0, |d| d.odometer_offset_km);
            let odometer = ev.odometer_km();
            let km = if odometer > 0.0 {
                odometer + offset
            } else {
                ev.distance_km() + offset
            };
            Ok(distance_cell(ctx, km, arg))
        },
    )?;

    builder.register(
        "reportDistance",
        unit_title("col.reportDistance", "Report\nDistance", "distanceUnits"),
        |_row, ctx, arg, ev| Ok(distance_cell(ctx, ev.report_distance_km(), arg)),
    )?;

    Ok(())
}

fn speed_text(ctx: &ReportContext, kph: f64, arg: &str) -> String {
    ctx.format_number(convert_speed(kph, ctx.units.speed), arg, "0")
}

fn compass_text(ctx: &ReportContext, heading: f64) -> String {
    let (key, default) = CompassPoint::from_heading(heading).label();
    ctx.text(key, default).to_uppercase()
}

/// Positive distances only, sorted on km ×100.
fn distance_cell(ctx: &ReportContext, km: f64, arg: &str) -> ColumnValue {
    if km > 0.0 {
        let distance = convert_distance(km, ctx.units.distance);
        ColumnValue::new(ctx.format_number(distance, arg, "0")).with_sort_key(hundredths(km))
    } else {
        ColumnValue::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, event, resolve, title};
    use crate::domain::device::DeviceInfo;
    use crate::domain::units::{DistanceUnits, SpeedUnits};
    use crate::infrastructure::memory_directory::InMemoryDeviceDirectory;
    use std::sync::Arc;

    #[test]
    fn test_speed_zero_is_shown() {
        let ctx = context();
        let mut ev = event();
        assert_eq!(resolve("speed", "", &ctx, &ev).value(), "0");
        ev.speed_kph = -3.0;
        assert_eq!(resolve("speed", "", &ctx, &ev).value(), "0");
        assert!(resolve("speedLimit", "", &ctx, &ev).is_blank());
    }

    #[test]
    fn test_speed_units_and_sort_key() {
        let mut ctx = context();
        ctx.units.speed = SpeedUnits::MilesPerHour;
        let mut ev = event();
        ev.speed_kph = 100.0;
        let cell = resolve("speed", "1", &ctx, &ev);
        assert_eq!(cell.value(), "62.1");
        assert_eq!(cell.sort_key(), Some(10_000.0));
        assert_eq!(title("speed", "", &ctx), "Speed\nmph");
    }

    #[test]
    fn test_speed_with_heading() {
        let ctx = context();
        let mut ev = event();
        ev.speed_kph = 50.0;
        ev.heading = 92.0;
        assert_eq!(resolve("speedH", "", &ctx, &ev).value(), "50 E");
        assert_eq!(resolve("speedU", "", &ctx, &ev).value(), "50km/h E");
        assert_eq!(resolve("heading", "", &ctx, &ev).value(), "E");
        assert_eq!(resolve("heading", "1", &ctx, &ev).value(), "92.0");
        ev.speed_kph = 0.0;
        assert!(resolve("heading", "", &ctx, &ev).is_blank());
        assert_eq!(resolve("speedH", "", &ctx, &ev).value(), "0");
    }

    #[test]
    fn test_distances() {
        let mut ctx = context();
        let mut ev = event();
        assert!(resolve("distance", "", &ctx, &ev).is_blank());
        ev.distance_km = 160.9344;
        ev.report_distance_km = 1.5;
        ctx.units.distance = DistanceUnits::Miles;
        assert_eq!(resolve("distance", "", &ctx, &ev).value(), "100");
        assert_eq!(resolve("reportDistance", "2", &ctx, &ev).value(), "0.93");
    }

    #[test]
    fn test_odometer_uses_device_offset() {
        let mut device = DeviceInfo::new("acme", "truck1");
        device.odometer_offset_km = 1000.0;
        let directory = InMemoryDeviceDirectory::new().with_device(device);
        let ctx = context().with_directory(Arc::new(directory));
        let mut ev = event();
        ev.distance_km = 20.0;
        assert_eq!(resolve("odometer", "", &ctx, &ev).value(), "1020");
        ev.odometer_km = 50_000.0;
        assert_eq!(resolve("odometer", "", &ctx, &ev).value(), "51000");
        assert_eq!(resolve("odometer", "", &context(), &ev).value(), "50000");
    }
}
