pub mod api;
pub mod app;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod entities;
pub mod metrics;
pub mod migrator;
pub mod telemetry;
pub mod worker;

pub use redis;
pub use sea_orm;
