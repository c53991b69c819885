pub mod commands;
pub mod downloader;
pub mod manifest;
pub mod progress;
pub mod utils;
