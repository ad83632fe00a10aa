pub mod commands;
pub mod config;
pub mod manifest;
pub mod telemetry;
