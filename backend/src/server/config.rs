//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use places_backend::inbound::http::state::HttpState;

/// Everything the listener needs once adapters have been wired.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) http_state: HttpState,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, upload_dir: PathBuf, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            upload_dir,
            http_state,
        }
    }
}
