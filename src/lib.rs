pub mod db;
pub mod fixtures;
pub mod server;
pub mod settings;
pub mod telemetry;
