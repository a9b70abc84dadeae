// Event, insertion and check-in time columns
use super::{EventCatalogBuilder, device_of, title};
use crate::application::catalog::{CatalogError, ResolveError};
use crate::application::report_context::ReportContext;
use crate::domain::age_color::color_for_age;
use crate::domain::cell::ColumnValue;
use crate::domain::device::{DeviceInfo, MINIMUM_REASONABLE_TIMESTAMP};
use crate::domain::elapsed::{ElapsedFormat, format_elapsed, resolve_elapsed_format};
use crate::domain::event::EventRecord;

const DAY_SECS: i64 = 86_400;
const HOUR_SECS: i64 = 3_600;
const MINUTE_SECS: i64 = 60;

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("date", title("col.date", "Date"), |_row, ctx, _arg, ev| {
        Ok(timestamp_cell(ev.timestamp(), ctx.format_date(ev.timestamp())))
    })?;

    builder.register("time", title("col.time", "Time"), |_row, ctx, _arg, ev| {
        Ok(timestamp_cell(ev.timestamp(), ctx.format_time(ev.timestamp())))
    })?;

    builder.register(
        "dateTime",
        |ctx: &ReportContext, _arg: &str| format!("{}\n${{timezone}}", ctx.text("col.dateTime", "Date/Time")),
        |_row, ctx, _arg, ev| Ok(timestamp_cell(ev.timestamp(), ctx.format_date_time(ev.timestamp()))),
    )?;

    builder.register(
        "timestamp",
        |ctx: &ReportContext, _arg: &str| format!("{}\n(Epoch)", ctx.text("col.timestamp", "Timestamp")),
        |_row, _ctx, _arg, ev| {
            let ts = ev.timestamp();
            Ok(timestamp_cell(ts, Some(ts.to_string())))
        },
    )?;

    builder.register(
        "createDateTime",
        |ctx: &ReportContext, _arg: &str| {
            format!("{}\n${{timezone}}", ctx.text("col.createDateTime", "Insert\nDate/Time"))
        },
        |_row, ctx, _arg, ev| {
            let created = ev.creation_time();
            let cell = timestamp_cell(created, ctx.format_date_time(created));
            if cell.is_blank() {
                return Ok(cell);
            }
            Ok(cell.with_age_color(color_for_age(ev.creation_age(), &ctx.creation_age_colors)))
        },
    )?;

    builder.register(
        "createAge",
        title("col.createAge", "Creation Age"),
        |_row, ctx, arg, ev| {
            if ev.creation_time() <= 0 {
                return Ok(ColumnValue::blank());
            }
            let age = ev.creation_age();
            let format = resolve_elapsed_format(arg, ElapsedFormat::HhMmSs);
            Ok(ColumnValue::new(format_elapsed(age, format))
                .with_sort_key(age as f64)
                .with_age_color(color_for_age(age, &ctx.creation_age_colors)))
        },
    )?;

    builder.register(
        "createMillis",
        title("col.createMillis", "Creation\nMillisecond"),
        |_row, _ctx, arg, ev| {
            let millis = ev.creation_millis();
            let arg = arg.trim();
            let value = if arg.eq_ignore_ascii_case("frac") || arg.eq_ignore_ascii_case("fraction") {
                millis % 1000
            } else if arg.eq_ignore_ascii_case("sec") || arg.eq_ignore_ascii_case("seconds") {
                millis / 1000
            } else {
                millis
            };
            Ok(ColumnValue::new(value.to_string()).with_sort_key(value as f64))
        },
    )?;

    builder.register(
        "checkinDateTime",
        title("col.checkinDateTime", "Last Check-In\nTime"),
        |_row, ctx, _arg, ev| {
            let Some(ts) = checkin_timestamp(ctx, ev)? else {
                return Ok(ColumnValue::blank());
            };
            let cell = timestamp_cell(ts, ctx.format_date_time(ts));
            Ok(cell.with_age_color(color_for_age(ctx.age_of(ts), &ctx.checkin_age_colors)))
        },
    )?;

    builder.register(
        "checkinAge",
        title("col.checkinAge", "Since Last\nCheck-In"),
        |_row, ctx, _arg, ev| {
            let Some(ts) = checkin_timestamp(ctx, ev)? else {
                return Ok(ColumnValue::blank());
            };
            let age = ctx.age_of(ts).max(0);
            Ok(ColumnValue::new(days_hours_minutes(age))
                .with_sort_key(age as f64)
                .with_age_color(color_for_age(age, &ctx.checkin_age_colors)))
        },
    )?;

    Ok(())
}

/// Formatted timestamp sorted on epoch seconds; blank for unset timestamps.
fn timestamp_cell(ts: i64, text: Option<String>) -> ColumnValue {
    match text {
        Some(text) if ts > 0 => ColumnValue::new(text).with_sort_key(ts as f64),
        _ => ColumnValue::blank(),
    }
}

/// Last connection time of the device, falling back to its newest event.
fn checkin_timestamp(ctx: &ReportContext, ev: &dyn EventRecord) -> Result<Option<i64>, ResolveError> {
    let ts = match device_of(ctx, ev)?.filter(DeviceInfo::has_reasonable_connect_time) {
        Some(device) => device.last_connect_time,
        None => ctx
            .last_event_timestamp(ev.account_id(), ev.device_id())?
            .unwrap_or(0),
    };
    Ok((ts > MINIMUM_REASONABLE_TIMESTAMP).then_some(ts))
}

/// `"2d 03h 07m"`
fn days_hours_minutes(secs: i64) -> String {
    let days = secs / DAY_SECS;
    let hours = (secs % DAY_SECS) / HOUR_SECS;
    let minutes = (secs % HOUR_SECS) / MINUTE_SECS;
    format!("{days}d {hours:02}h {minutes:02}m")
}
