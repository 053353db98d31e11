pub mod alerts;
pub mod align;
pub mod config;
pub mod forecast;
pub mod inputs;
pub mod schedule;
pub mod stats;
