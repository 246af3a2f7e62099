pub mod config;
pub mod demo;

pub use config::Config;
