// Status code columns
use super::{EventCatalogBuilder, title};
use crate::application::catalog::CatalogError;
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::status::{StatusArg, hex_status_code};

pub(super) fn register(builder: &mut EventCatalogBuilder) -> Result<(), CatalogError> {
    builder.register("statusCode", title("col.statusCode", "Status#"), |_row, ctx, arg, ev| {
        let code = ev.status_code();
        let arg = StatusArg::parse(arg);
        let cell = ColumnValue::new(arg.format_code(code)).with_sort_key(code);
        Ok(if arg.colored { styled(ctx, code, cell) } else { cell })
    })?;

    builder.register("statusDesc", title("col.statusDesc", "Status"), |_row, ctx, arg, ev| {
        let code = ev.status_code();
        let description = ctx
            .status_style(code)
            .map(|s| s.description.trim())
            .filter(|d| !d.is_empty())
            .map_or_else(|| hex_status_code(code), str::to_string);
        let cell = ColumnValue::new(description).with_sort_key(code);
        Ok(if StatusArg::parse(arg).colored { styled(ctx, code, cell) } else { cell })
    })?;

    Ok(())
}

fn styled(ctx: &ReportContext, code: u32, mut cell: ColumnValue) -> ColumnValue {
    let Some(style) = ctx.status_style(code).filter(|s| s.has_colors()) else {
        return cell;
    };
    if let Some(fg) = style.foreground.as_deref().filter(|c| !c.trim().is_empty()) {
        cell = cell.with_foreground(fg);
    }
    if let Some(bg) = style.background.as_deref().filter(|c| !c.trim().is_empty()) {
        cell = cell.with_background(bg);
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, event, resolve};
    use crate::domain::status::StatusStyle;

    fn styled_context() -> crate::application::report_context::ReportContext {
        let mut ctx = context();
        ctx.status_styles.insert(
            0xF020,
            StatusStyle {
                description: "Location".to_string(),
                foreground: Some("#000000".to_string()),
                background: Some("#FFFF00".to_string()),
            },
        );
        ctx
    }

    #[test]
    fn test_status_code_hex_and_decimal() {
        let ctx = styled_context();
        let mut ev = event();
        ev.status_code = 0xF020;
        let cell = resolve("statusCode", "", &ctx, &ev);
        assert_eq!(cell.value(), "0xF020");
        assert_eq!(cell.sort_key(), Some(61472.0));
        assert_eq!(cell.background(), Some("#FFFF00"));
        let cell = resolve("statusCode", "dec", &ctx, &ev);
        assert_eq!(cell.value(), "61472");
        assert_eq!(cell.background(), None);
        assert_eq!(resolve("statusCode", "decColor", &ctx, &ev).foreground(), Some("#000000"));
    }

    #[test]
    fn test_status_description() {
        let ctx = styled_context();
        let mut ev = event();
        ev.status_code = 0xF020;
        let cell = resolve("statusDesc", "", &ctx, &ev);
        assert_eq!(cell.value(), "Location");
        assert_eq!(cell.foreground(), Some("#000000"));
        let cell = resolve("statusDesc", "noColor", &ctx, &ev);
        assert_eq!(cell.value(), "Location");
        assert_eq!(cell.foreground(), None);

        ev.status_code = 0x12;
        let cell = resolve("statusDesc", "", &ctx, &ev);
        assert_eq!(cell.value(), "0x0012");
        assert_eq!(cell.foreground(), None);
    }
}
