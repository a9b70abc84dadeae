// Table assembler - Resolves requested columns over a record sequence
use crate::application::catalog::{ColumnCatalog, ColumnTemplate, event_catalog};
use crate::application::report_context::ReportContext;
use crate::domain::cell::ColumnValue;
use crate::domain::event::EventRecord;
use crate::domain::report_column::ReportColumn;
use crate::domain::table::Table;
use std::panic::{self, AssertUnwindSafe};

/// Builds the table for `columns` over `records`, one row per record and one
/// cell per column, both in input order.
///
/// A column whose key is not in the catalog gets an empty title and blank
/// cells. A resolver that fails or panics yields a blank cell for that row
/// only; the rest of the table is still assembled.
pub fn assemble<'r, R, I>(
    catalog: &ColumnCatalog<R>,
    columns: &[ReportColumn],
    records: I,
    ctx: &ReportContext,
) -> Table
where
    R: ?Sized + 'r,
    I: IntoIterator<Item = &'r R>,
{
    let templates: Vec<Option<&ColumnTemplate<R>>> = columns
        .iter()
        .map(|column| {
            let template = catalog.lookup(&column.key);
            if template.is_none() {
                tracing::warn!("Unknown report column '{}', rendering it blank", column.key);
            }
            template
        })
        .collect();

    let titles = columns
        .iter()
        .zip(&templates)
        .map(|(column, template)| column_title(column, *template, ctx))
        .collect();

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(row, record)| {
            columns
                .iter()
                .zip(&templates)
                .map(|(column, template)| {
                    let cell = match template {
                        Some(template) => resolve_cell(template, row, column, record, ctx),
                        None => ColumnValue::blank(),
                    };
                    let filler = column
                        .blank_filler
                        .as_deref()
                        .filter(|f| !f.trim().is_empty())
                        .unwrap_or(&ctx.blank_filler);
                    cell.with_blank_filler(filler)
                })
                .collect()
        })
        .collect::<Vec<Vec<ColumnValue>>>();

    tracing::debug!("Assembled report table: {} columns x {} rows", columns.len(), rows.len());
    Table::new(titles, rows)
}

/// [`assemble`] over the built-in event catalog.
pub fn assemble_events<E: EventRecord + 'static>(
    columns: &[ReportColumn],
    events: &[E],
    ctx: &ReportContext,
) -> Table {
    assemble(
        event_catalog(),
        columns,
        events.iter().map(|e| e as &(dyn EventRecord + 'static)),
        ctx,
    )
}

fn column_title<R: ?Sized>(
    column: &ReportColumn,
    template: Option<&ColumnTemplate<R>>,
    ctx: &ReportContext,
) -> String {
    let Some(template) = template else {
        return String::new();
    };
    match column.title_override() {
        Some(title) => ctx.expand_title(title),
        None => ctx.expand_title(&template.title(ctx, &column.arg)),
    }
}

fn resolve_cell<R: ?Sized>(
    template: &ColumnTemplate<R>,
    row: usize,
    column: &ReportColumn,
    record: &R,
    ctx: &ReportContext,
) -> ColumnValue {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        template.value(row, ctx, &column.arg, record)
    }));
    match result {
        Ok(Ok(cell)) => cell,
        Ok(Err(e)) => {
            tracing::warn!("Column '{}' row {}: {}", column.key, row, e);
            ColumnValue::blank()
        }
        Err(panic_err) => {
            let message = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            tracing::warn!("Column '{}' row {} panicked: {}", column.key, row, message);
            ColumnValue::blank()
        }
    }
}
