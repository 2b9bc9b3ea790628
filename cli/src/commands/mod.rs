pub mod config;
pub mod configure;
