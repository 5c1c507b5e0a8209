pub mod app;
pub mod cli;
pub mod config;
pub mod download;
pub mod logging;
pub mod platform;
pub mod prompt;
pub mod version;
