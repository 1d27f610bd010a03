pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod scoring;
