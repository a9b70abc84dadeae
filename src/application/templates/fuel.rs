// Fuel level, volume, economy and pressure columns
use super::{
    EventCatalogBuilder, device_of, hundredths, not_available, percent_text, pressure_text, title,
    unit_title, volume_cell,
};
use crate::application::catalog::CatalogError;
use crate::domain::cell::ColumnValue;
use crate::domain::units::convert_economy;

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("fuelLevel", title("col.fuelLevel", "Fuel%"), |_row, ctx, _arg, ev| {
        let level = ev.fuel_level();
        if level < 0.0 {
            return Ok(not_available(ctx));
        }
        Ok(match percent_text(level) {
            Some(text) => ColumnValue::new(text).with_sort_key(hundredths(fraction(level))),
            None => ColumnValue::blank(),
        })
    })?;

    builder.register(
        "fuelLevelVolume",
        unit_title("col.fuelLevelVolume", "Fuel Volume", "volumeUnits"),
        |_row, ctx, arg, ev| {
            let level = ev.fuel_level();
            if !(level > 0.0) {
                return Ok(ColumnValue::blank());
            }
            let capacity = device_of(ctx, ev)?.map_or(0.0, |d| d.fuel_capacity_liters);
            Ok(volume_cell(ctx, fraction(level) * capacity, arg))
        },
    )?;

    builder.register(
        "fuelTotal",
        unit_title("col.fuelTotal", "Total Fuel", "volumeUnits"),
        |_row, ctx, arg, ev| Ok(volume_cell(ctx, ev.fuel_total_liters(), arg)),
    )?;

    builder.register(
        "fuelRemain",
        unit_title("col.fuelRemain", "Remaining\nFuel", "volumeUnits"),
        |_row, ctx, arg, ev| Ok(volume_cell(ctx, ev.fuel_remain_liters(), arg)),
    )?;

    builder.register(
        "fuelEconomy",
        unit_title("col.fuelEconomy", "Fuel Econ", "economyUnits"),
        |_row, ctx, arg, ev| {
            let kpl = ev.fuel_economy_kpl();
            if !(kpl > 0.0) {
                return Ok(ColumnValue::blank());
            }
            let economy = convert_economy(kpl, ctx.units.economy);
            Ok(ColumnValue::new(ctx.format_number(economy, arg, "0.0")).with_sort_key(hundredths(kpl)))
        },
    )?;

    builder.register(
        "fuelPressure",
        unit_title("col.fuelPressure", "Fuel Press.", "pressureUnits"),
        |_row, ctx, arg, ev| {
            let kpa = ev.fuel_pressure_kpa();
            if kpa == 0.0 || !kpa.is_finite() {
                return Ok(ColumnValue::blank());
            }
            Ok(ColumnValue::new(pressure_text(ctx, kpa, arg, "0.0")).with_sort_key(hundredths(kpa)))
        },
    )?;

    Ok(())
}

/// Fuel levels arrive either as a fraction or as a percent.
fn fraction(level: f64) -> f64 {
    if level <= 1.0 { level } else { level / 100.0 }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, event, resolve, title};
    use crate::domain::device::DeviceInfo;
    use crate::domain::units::{EconomyUnits, PressureUnits, VolumeUnits};
    use crate::infrastructure::memory_directory::InMemoryDeviceDirectory;
    use std::sync::Arc;

    #[test]
    fn test_fuel_level_percent() {
        let ctx = context();
        let mut ev = event();
        assert!(resolve("fuelLevel", "", &ctx, &ev).is_blank());
        ev.fuel_level = 0.456;
        let cell = resolve("fuelLevel", "", &ctx, &ev);
        assert_eq!(cell.value(), "46%");
        assert_eq!(cell.sort_key(), Some(45.0));
        ev.fuel_level = -1.0;
        assert_eq!(resolve("fuelLevel", "", &ctx, &ev).value(), "n/a");
    }

    #[test]
    fn test_fuel_level_volume_needs_capacity() {
        let mut ev = event();
        ev.fuel_level = 0.5;
        assert!(resolve("fuelLevelVolume", "", &context(), &ev).is_blank());

        let mut device = DeviceInfo::new("acme", "truck1");
        device.fuel_capacity_liters = 80.0;
        let directory = InMemoryDeviceDirectory::new().with_device(device);
        let ctx = context().with_directory(Arc::new(directory));
        assert_eq!(resolve("fuelLevelVolume", "", &ctx, &ev).value(), "40.0");
        ev.fuel_level = -0.2;
        assert!(resolve("fuelLevelVolume", "", &ctx, &ev).is_blank());
    }

    #[test]
    fn test_fuel_volumes_in_account_units() {
        let mut ctx = context();
        ctx.units.volume = VolumeUnits::UsGallons;
        let mut ev = event();
        ev.fuel_total_liters = 100.0;
        assert_eq!(resolve("fuelTotal", "", &ctx, &ev).value(), "26.4");
        assert!(resolve("fuelRemain", "", &ctx, &ev).is_blank());
        assert_eq!(title("fuelTotal", "", &ctx), "Total Fuel\nGal");
    }

    #[test]
    fn test_fuel_economy_and_pressure() {
        let mut ctx = context();
        let mut ev = event();
        assert!(resolve("fuelEconomy", "", &ctx, &ev).is_blank());
        assert!(resolve("fuelPressure", "", &ctx, &ev).is_blank());
        ev.fuel_economy_kpl = 10.0;
        ev.fuel_pressure_kpa = 300.0;
        ctx.units.economy = EconomyUnits::MilesPerGallon;
        ctx.units.pressure = PressureUnits::Psi;
        assert_eq!(resolve("fuelEconomy", "", &ctx, &ev).value(), "23.5");
        assert_eq!(resolve("fuelPressure", "", &ctx, &ev).value(), "43.5");
        assert_eq!(title("fuelEconomy", "", &ctx), "Fuel Econ\nmpg");
    }
}
