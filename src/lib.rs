pub mod analyzers;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod infra;
pub mod model;
pub mod output;
pub mod services;
