// Infrastructure layer - Settings loading and directory adapters
pub mod config;
pub mod memory_directory;
