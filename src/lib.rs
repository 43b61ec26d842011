pub mod app;
pub mod config;
pub mod domain;
pub mod email;
pub mod notifier;
pub mod rate;
pub mod scheduler;
pub mod store;
pub mod telemetry;
