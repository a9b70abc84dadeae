// Fleet report column engine - Column templates resolved into report table cells
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::assembler::{assemble, assemble_events};
pub use application::catalog::{ColumnCatalog, ColumnTemplate, event_catalog};
pub use application::device_directory::{DeviceDirectory, DirectoryError};
pub use application::report_context::ReportContext;
pub use domain::cell::ColumnValue;
pub use domain::event::{EventData, EventRecord};
pub use domain::report_column::ReportColumn;
pub use domain::table::{NullsPlacement, SortSpec, Table};
pub use infrastructure::config::{
    ReportDefinition, ReportSettings, load_default_report_settings, load_report_settings,
};
