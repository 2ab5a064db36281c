pub mod configuration;
pub mod data_processing;
pub mod domain;
pub mod error;
pub mod startup;
pub mod telemetry;
