/// Handler for the root path, confirming the server is running.
pub async fn root() -> &'static str {
    "buyback admin server is running."
}

/// Handler for the health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
