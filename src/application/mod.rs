// Application layer - Use cases and the monitor loop
pub mod battery_service;
pub mod dashboard_service;
pub mod monitor;
pub mod streaming_service;
pub mod telemetry_source;
