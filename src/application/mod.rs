// Application layer - Column catalog, report context and table assembly
pub mod assembler;
pub mod catalog;
pub mod device_directory;
pub mod report_context;
mod templates;
