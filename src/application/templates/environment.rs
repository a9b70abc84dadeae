// Ambient, barometric and thermo sensor columns
use super::{EventCatalogBuilder, hundredths, temperature_cell, title, unit_title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::event::THERMO_SENSOR_COUNT;
use crate::domain::units::{PressureUnits, convert_pressure};

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register(
        "ambientTemp",
        unit_title("col.ambientTemp", "Ambient\nTemp", "temperatureUnits"),
        |_row, ctx, arg, ev| Ok(temperature_cell(ctx, ev.ambient_temp_c(), arg)),
    )?;

    builder.register(
        "batteryTemp",
        unit_title("col.batteryTemp", "Battery\nTemp", "temperatureUnits"),
        |_row, ctx, arg, ev| Ok(temperature_cell(ctx, ev.battery_temp_c(), arg)),
    )?;

    // Barometric pressure is always shown in mmHg.
    builder.register("barometer", title("col.barometer", "Barometer\nmmHg"), |_row, ctx, arg, ev| {
        let kpa = ev.barometer_kpa();
        if !(kpa > 0.0) {
            return Ok(ColumnValue::blank());
        }
        let mmhg = convert_pressure(kpa, PressureUnits::Mmhg);
        Ok(ColumnValue::new(ctx.format_number(mmhg, arg, "0.00")).with_sort_key(hundredths(kpa)))
    })?;

    for index in 0..THERMO_SENSOR_COUNT {
        let number = index + 1;
        builder.register(
            &format!("thermo{number}"),
            move |ctx: &ReportContext, _arg: &str| {
                format!("{}\n#{number}", ctx.text("col.thermo", "Temp"))
            },
            move |_row, ctx, arg, ev| Ok(temperature_cell(ctx, ev.thermo_c(index), arg)),
        )?;
    }

    Ok(())
}
