// Engine, tire and battery diagnostic columns
use super::{
    EventCatalogBuilder, device_of, hundredths, percent_text, pressure_text, temperature_cell,
    temperature_text, title, unit_title,
};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::event::is_valid_temperature;

const INVALID_READING: &str = "?";

/// Separator between per-tire readings; never the locale's decimal mark.
fn reading_separator(ctx: &ReportContext) -> &'static str {
    if ctx.symbols().decimal == ',' { "; " } else { "," }
}

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("engineRpm", title("col.engineRpm", "Engine\nRPM"), |_row, _ctx, _arg, ev| {
        let rpm = ev.engine_rpm();
        if rpm < 0 {
            return Ok(ColumnValue::blank());
        }
        Ok(ColumnValue::new(rpm.to_string()).with_sort_key(rpm as f64))
    })?;

    builder.register(
        "engineHours",
        title("col.engineHours", "Engine\nHours"),
        |_row, ctx, arg, ev| {
            let offset = device_of(ctx, ev)?.map_or(0.0, |d| d.engine_hours_offset);
            Ok(hours_cell(ctx, ev.engine_hours() + offset, arg))
        },
    )?;

    builder.register("idleHours", title("col.idleHours", "Idle\nHours"), |_row, ctx, arg, ev| {
        Ok(hours_cell(ctx, ev.idle_hours(), arg))
    })?;

    builder.register(
        "coolantTemp",
        unit_title("col.coolantTemp", "Coolant\nTemp", "temperatureUnits"),
        |_row, ctx, arg, ev| Ok(temperature_cell(ctx, ev.coolant_temp_c(), arg)),
    )?;

    builder.register(
        "oilPressure",
        unit_title("col.oilPressure", "Oil\nPressure", "pressureUnits"),
        |_row, ctx, arg, ev| {
            let kpa = ev.oil_pressure_kpa();
            if !(kpa > 0.0) {
                return Ok(ColumnValue::blank());
            }
            Ok(ColumnValue::new(pressure_text(ctx, kpa, arg, "0.0")).with_sort_key(hundredths(kpa)))
        },
    )?;

    builder.register(
        "tirePressure",
        unit_title("col.tirePressure", "Tire\nPressure", "pressureUnits"),
        |_row, ctx, arg, ev| {
            let readings = ev.tire_pressures_kpa();
            if readings.is_empty() {
                return Ok(ColumnValue::blank());
            }
            let text = readings
                .iter()
                .map(|kpa| pressure_text(ctx, *kpa, arg, "0"))
                .collect::<Vec<_>>()
                .join(reading_separator(ctx));
            Ok(ColumnValue::new(text))
        },
    )?;

    builder.register(
        "tireTemp",
        unit_title("col.tireTemp", "Tire\nTemp", "temperatureUnits"),
        |_row, ctx, arg, ev| {
            let readings = ev.tire_temps_c();
            if readings.is_empty() {
                return Ok(ColumnValue::blank());
            }
            let text = readings
                .iter()
                .map(|c| {
                    if is_valid_temperature(*c) {
                        temperature_text(ctx, *c, arg)
                    } else {
                        INVALID_READING.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(reading_separator(ctx));
            Ok(ColumnValue::new(text))
        },
    )?;

    builder.register("battery", title("col.battery", "Battery"), |_row, ctx, arg, ev| {
        let level = ev.battery_level();
        let volts = ev.battery_volts();
        if level > 0.0 && level <= 1.0 {
            Ok(percent_cell(level))
        } else if level > 1.0 {
            // Some devices report volts in the level field.
            Ok(volts_cell(ctx, level, arg))
        } else if volts > 0.0 {
            Ok(volts_cell(ctx, volts, arg))
        } else {
            Ok(ColumnValue::blank())
        }
    })?;

    builder.register(
        "batteryVolts",
        title("col.batteryVolts", "Battery\nVolts"),
        |_row, ctx, arg, ev| {
            let volts = ev.battery_volts();
            if !(volts > 0.0) {
                return Ok(ColumnValue::blank());
            }
            Ok(ColumnValue::new(ctx.format_number(volts, arg, "0.0")).with_sort_key(hundredths(volts)))
        },
    )?;

    builder.register(
        "batteryPercent",
        title("col.batteryPercent", "Battery %"),
        |_row, _ctx, _arg, ev| Ok(percent_cell(ev.battery_level())),
    )?;

    Ok(())
}

fn hours_cell(ctx: &ReportContext, hours: f64, arg: &str) -> ColumnValue {
    if !(hours > 0.0) {
        return ColumnValue::blank();
    }
    ColumnValue::new(ctx.format_number(hours, arg, "0.0")).with_sort_key(hundredths(hours))
}

fn percent_cell(level: f64) -> ColumnValue {
    match percent_text(level) {
        Some(text) => {
            let pct = if level <= 1.0 { level * 100.0 } else { level };
            ColumnValue::new(text).with_sort_key(pct.round())
        }
        None => ColumnValue::blank(),
    }
}

fn volts_cell(ctx: &ReportContext, volts: f64, arg: &str) -> ColumnValue {
    ColumnValue::new(format!("{}v", ctx.format_number(volts, arg, "0.0")))
        .with_sort_key(hundredths(volts))
}
