//! System handlers

/// Health check handler
pub async fn health_handler() -> &'static str {
    "OK"
}
