use std::net::SocketAddr;

/// Headroom added on top of the byte quota for multipart framing and
/// the other form fields.
const UPLOAD_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // request body ceiling, sized from the byte quota
    pub body_limit: usize,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, quota_bytes: u64) -> Self {
        let body_limit = usize::try_from(quota_bytes)
            .unwrap_or(usize::MAX)
            .saturating_add(UPLOAD_OVERHEAD_BYTES);
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, body_limit={}",
            listen_addr,
            body_limit
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            body_limit,
        }
    }
}
