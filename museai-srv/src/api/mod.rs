//! HTTP API handlers for museai-srv

pub mod evolution;
pub mod generate;
pub mod health;
pub mod options;

pub use evolution::evolution_routes;
pub use generate::generate_routes;
pub use health::health_routes;
pub use options::option_routes;
