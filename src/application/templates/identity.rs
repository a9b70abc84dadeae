// Row index and device identity columns
use super::{EventCatalogBuilder, device_of, link_url, percent_text, title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;

const DEVICE_ADMIN_TARGET: &str = "_self";
const MAP_WINDOW_TARGET: &str = "ReportMap";

/// Longer custom-attribute titles wrap at their last space.
const TITLE_WRAP_LENGTH: usize = 12;

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("index", title("col.index", "#"), |row, ctx, arg, _ev| {
        let arg = arg.trim();
        let number = row + 1;
        if arg.eq_ignore_ascii_case("map") || arg.eq_ignore_ascii_case("mapLink") {
            let cell = ColumnValue::new(number.to_string()).with_sort_key(row as f64);
            let Some(map_url) = ctx.map_url.as_deref() else {
                return Ok(cell);
            };
            let pushpin = number.to_string();
            let url = link_url(map_url, &[("showpp", pushpin.as_str()), ("zoompp", pushpin.as_str())]);
            return Ok(cell.with_link(url, Some(MAP_WINDOW_TARGET)));
        }
        let shown = if arg.starts_with('0') { row } else { number };
        Ok(ColumnValue::new(shown.to_string()).with_sort_key(row as f64))
    })?;

    builder.register("deviceId", title("col.deviceId", "Device-ID"), |_row, ctx, arg, ev| {
        let device_id = ev.device_id();
        let arg = arg.trim();
        let cell = ColumnValue::new(device_id);
        let wants_admin = arg.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("admin"));
        match ctx.device_admin_url.as_deref() {
            Some(admin_url) if wants_admin => {
                let submit = if arg.eq_ignore_ascii_case("adminEdit") {
                    ("d_subedit", "edit")
                } else {
                    ("d_subview", "view")
                };
                let url = link_url(
                    admin_url,
                    &[("device", device_id), ("page_cmd", "selectDev"), submit],
                );
                Ok(cell.with_link(url, Some(DEVICE_ADMIN_TARGET)))
            }
            _ => Ok(cell),
        }
    })?;

    builder.register(
        "deviceDesc",
        title("col.deviceDesc", "Device\nDescription"),
        |_row, ctx, _arg, ev| {
            Ok(device_of(ctx, ev)?
                .map(|d| ColumnValue::new(d.description))
                .unwrap_or_default())
        },
    )?;

    builder.register(
        "deviceVehicleID",
        title("col.deviceVehicleID", "Vehicle ID"),
        |_row, ctx, _arg, ev| {
            Ok(device_of(ctx, ev)?
                .map(|d| ColumnValue::new(d.vehicle_id))
                .unwrap_or_default())
        },
    )?;

    builder.register("groupId", title("col.groupId", "Group-ID"), |_row, ctx, _arg, ev| {
        Ok(device_of(ctx, ev)?
            .map(|d| ColumnValue::new(d.group_id))
            .unwrap_or_default())
    })?;

    builder.register(
        "deviceBattery",
        title("col.deviceBattery", "Last\nBattery"),
        |_row, ctx, _arg, ev| Ok(last_battery_cell(device_of(ctx, ev)?.map(|d| d.last_battery_level))),
    )?;

    builder.register(
        "lastBatteryPercent",
        title("col.lastBatteryPercent", "Latest\nBatt %"),
        |_row, ctx, _arg, ev| Ok(last_battery_cell(device_of(ctx, ev)?.map(|d| d.last_battery_level))),
    )?;

    builder.register("customField", custom_field_title, |_row, ctx, arg, ev| {
        let value = device_of(ctx, ev)?
            .and_then(|d| d.custom_attribute(arg).map(str::to_string));
        Ok(value.map(ColumnValue::new).unwrap_or_default())
    })?;

    Ok(())
}

fn last_battery_cell(level: Option<f64>) -> ColumnValue {
    match level.and_then(|level| percent_text(level).map(|text| (level, text))) {
        Some((level, text)) => {
            let pct = if level <= 1.0 { level * 100.0 } else { level };
            ColumnValue::new(text).with_sort_key(pct.round())
        }
        None => ColumnValue::blank(),
    }
}

/// The attribute's configured description (`deviceInfo.custom.<name>`), or a
/// generic title.
fn custom_field_title(ctx: &ReportContext, arg: &str) -> String {
    let key = format!("deviceInfo.custom.{}", arg.trim());
    match ctx.strings.get(&key) {
        Some(desc) => wrap_title(desc),
        None => ctx.text("col.customField", "Custom\nAttribute").to_string(),
    }
}

fn wrap_title(title: &str) -> String {
    if title.chars().count() <= TITLE_WRAP_LENGTH {
        return title.to_string();
    }
    match title.rfind(' ') {
        Some(p) if p > 0 => format!("{}\n{}", &title[..p], &title[p + 1..]),
        _ => title.to_string(),
    }
}
