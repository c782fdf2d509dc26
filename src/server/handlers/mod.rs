//! HTTP request handlers
//!
//! Handlers are organized by endpoint:
//!
//! - `lookup` - IRR prefix lookup (`GET /lookup`)
//! - `system` - Liveness check (`GET /health`)

pub mod lookup;
pub mod system;

// Re-export all handlers for convenience
pub use lookup::lookup_handler;
pub use system::health_handler;
