// GPS position, fix quality and address columns
use super::{EventCatalogBuilder, hundredths, title, unit_title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::age_color::color_for_age;
use crate::domain::cell::ColumnValue;
use crate::domain::elapsed::{ElapsedFormat, format_elapsed, resolve_elapsed_format};
use crate::domain::event::EventRecord;
use crate::domain::geo::{GeoFormat, format_latitude, format_longitude, format_point, is_valid_point};
use crate::domain::units::convert_altitude;

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("latitude", title("col.latitude", "Lat"), |_row, ctx, arg, ev| {
        let (lat, lon) = (ev.latitude(), ev.longitude());
        if !is_valid_point(lat, lon) {
            return Ok(ColumnValue::blank());
        }
        let format = GeoFormat::from_arg(arg, ctx.units.lat_lon);
        let text = format_latitude(lat, &format, ctx.symbols());
        Ok(gps_colored(ctx, ev, ColumnValue::new(text).with_sort_key(lat)))
    })?;

    builder.register("longitude", title("col.longitude", "Lon"), |_row, ctx, arg, ev| {
        let (lat, lon) = (ev.latitude(), ev.longitude());
        if !is_valid_point(lat, lon) {
            return Ok(ColumnValue::blank());
        }
        let format = GeoFormat::from_arg(arg, ctx.units.lat_lon);
        let text = format_longitude(lon, &format, ctx.symbols());
        Ok(gps_colored(ctx, ev, ColumnValue::new(text).with_sort_key(lon)))
    })?;

    builder.register("geoPoint", title("col.geoPoint", "Lat/Lon"), |_row, ctx, arg, ev| {
        let (lat, lon) = (ev.latitude(), ev.longitude());
        if !is_valid_point(lat, lon) {
            return Ok(ColumnValue::blank());
        }
        let format = GeoFormat::from_arg(arg, ctx.units.lat_lon);
        let text = format_point(lat, lon, &format, ctx.symbols());
        Ok(gps_colored(ctx, ev, ColumnValue::new(text)))
    })?;

    builder.register("gpsAge", title("col.gpsAge", "GPS\nAge"), |_row, ctx, arg, ev| {
        let age = ev.gps_age();
        let text = if arg.trim().is_empty() {
            age.to_string()
        } else {
            format_elapsed(age, resolve_elapsed_format(arg, ElapsedFormat::Seconds))
        };
        Ok(gps_colored(ctx, ev, ColumnValue::new(text).with_sort_key(age as f64)))
    })?;

    builder.register(
        "altitude",
        unit_title("col.altitude", "Altitude", "altitudeUnits"),
        |_row, ctx, arg, ev| {
            let meters = ev.altitude_meters();
            let altitude = convert_altitude(meters, ctx.units.altitude);
            Ok(ColumnValue::new(ctx.format_number(altitude, arg, "0")).with_sort_key(hundredths(meters)))
        },
    )?;

    builder.register(
        "accuracy",
        unit_title("col.accuracy", "Accuracy", "accuracyUnits"),
        |_row, ctx, arg, ev| {
            let meters = ev.horz_accuracy_meters();
            if !(meters > 0.0) {
                return Ok(ColumnValue::blank());
            }
            let accuracy = convert_altitude(meters, ctx.units.altitude);
            Ok(ColumnValue::new(ctx.format_number(accuracy, arg, "0")).with_sort_key(hundredths(meters)))
        },
    )?;

    builder.register(
        "satellites",
        title("col.satellites", "Sat\nCount"),
        |_row, _ctx, _arg, ev| {
            let count = ev.satellite_count();
            if count > 0 {
                Ok(ColumnValue::new(count.to_string()).with_sort_key(count))
            } else {
                Ok(ColumnValue::blank())
            }
        },
    )?;

    builder.register("address", title("col.address", "Address"), |_row, _ctx, _arg, ev| {
        Ok(ColumnValue::new(ev.address()))
    })?;

    builder.register("city", title("col.city", "City"), |_row, _ctx, _arg, ev| {
        Ok(ColumnValue::new(ev.city()))
    })?;

    Ok(())
}

/// Colors a location cell by how stale the GPS fix was.
fn gps_colored(ctx: &ReportContext, ev: &dyn EventRecord, cell: ColumnValue) -> ColumnValue {
    cell.with_age_color(color_for_age(ev.gps_age(), &ctx.gps_age_colors))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, event, resolve, title};
    use crate::domain::units::{AltitudeUnits, LatLonFormat};

    #[test]
    fn test_latitude_longitude_formats() {
        let ctx = context();
        let mut ev = event();
        ev.latitude = 37.5;
        ev.longitude = -122.25;
        assert_eq!(resolve("latitude", "", &ctx, &ev).value(), "37.5000");
        assert_eq!(resolve("longitude", "2", &ctx, &ev).value(), "-122.25");
        assert_eq!(resolve("latitude", "dms", &ctx, &ev).value(), "37°30'00\"N");
        assert_eq!(resolve("geoPoint", "", &ctx, &ev).value(), "37.5000/-122.2500");
    }

    #[test]
    fn test_account_lat_lon_preference() {
        let mut ctx = context();
        ctx.units.lat_lon = LatLonFormat::DegMinSec;
        let mut ev = event();
        ev.latitude = 37.5;
        ev.longitude = -122.25;
        assert_eq!(resolve("geoPoint", "", &ctx, &ev).value(), "37°30'00\"N/122°15'00\"W");
        assert_eq!(resolve("latitude", "1", &ctx, &ev).value(), "37.5");
    }

    #[test]
    fn test_invalid_point_is_blank() {
        let ctx = context();
        let ev = event();
        assert!(resolve("latitude", "", &ctx, &ev).is_blank());
        assert!(resolve("geoPoint", "", &ctx, &ev).is_blank());
    }

    #[test]
    fn test_gps_age_bands() {
        let ctx = context();
        let mut ev = event();
        ev.latitude = 10.0;
        ev.longitude = 10.0;
        ev.gps_age = 1500;
        assert_eq!(resolve("gpsAge", "", &ctx, &ev).foreground(), Some("#550000"));
        assert_eq!(resolve("latitude", "", &ctx, &ev).foreground(), Some("#550000"));
        ev.gps_age = 4000;
        assert_eq!(resolve("gpsAge", "", &ctx, &ev).foreground(), Some("#BB0000"));
        assert_eq!(resolve("gpsAge", "hms", &ctx, &ev).value(), "01:06:40");
        ev.gps_age = 10;
        assert_eq!(resolve("geoPoint", "", &ctx, &ev).foreground(), None);
    }

    #[test]
    fn test_altitude_and_accuracy_units() {
        let mut ctx = context();
        ctx.units.altitude = AltitudeUnits::Feet;
        let mut ev = event();
        ev.altitude_meters = 100.0;
        let cell = resolve("altitude", "", &ctx, &ev);
        assert_eq!(cell.value(), "328");
        assert_eq!(cell.sort_key(), Some(10_000.0));
        assert!(resolve("accuracy", "", &ctx, &ev).is_blank());
        ev.horz_accuracy_meters = 10.0;
        assert_eq!(resolve("accuracy", "1", &ctx, &ev).value(), "32.8");
        assert_eq!(title("accuracy", "", &ctx), "Accuracy\nfeet");
    }

    #[test]
    fn test_satellites_and_address() {
        let ctx = context();
        let mut ev = event();
        assert!(resolve("satellites", "", &ctx, &ev).is_blank());
        assert!(resolve("address", "", &ctx, &ev).is_blank());
        ev.satellite_count = 7;
        ev.address = "1 Main St".to_string();
        ev.city = "Springfield".to_string();
        assert_eq!(resolve("satellites", "", &ctx, &ev).value(), "7");
        assert_eq!(resolve("address", "", &ctx, &ev).value(), "1 Main St");
        assert_eq!(resolve("city", "", &ctx, &ev).value(), "Springfield");
    }
}
