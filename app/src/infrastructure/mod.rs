mod background_service;
pub mod config;
mod janitor;
mod service_provider;
pub mod telemetry;

pub use background_service::BackgroundService;
pub use service_provider::ServiceProvider;
