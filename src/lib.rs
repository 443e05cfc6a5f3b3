pub mod config;
pub mod question;
pub mod render;
pub mod report;
pub mod scoring;
