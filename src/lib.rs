pub mod config;
pub mod estimation;
pub mod output;
