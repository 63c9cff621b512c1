// Domain layer - Battery telemetry value types
pub mod alert;
pub mod battery;
pub mod dashboard;
pub mod insights;
pub mod stream;
pub mod telemetry;
