use crate::config::Config;
use crate::relay::Relay;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream relay (stateless between requests)
    pub relay: Arc<Relay>,

    /// Request body limit, multipart uploads included
    pub max_upload_bytes: usize,

    /// Browser client assets served at `/`
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            relay: Arc::new(Relay::new(config)),
            max_upload_bytes: config.service.http.max_upload_bytes,
            static_dir: config.service.http.static_dir.clone(),
        }
    }
}
