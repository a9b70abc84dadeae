// Domain layer - Value types and pure formatting rules
pub mod age_color;
pub mod cell;
pub mod device;
pub mod elapsed;
pub mod event;
pub mod geo;
pub mod locale;
pub mod number_format;
pub mod report_column;
pub mod status;
pub mod table;
pub mod units;
