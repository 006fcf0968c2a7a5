//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:3040";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Root of `floorplans/`, `images/` and `vendors/`.
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    /// Read `BOOTHPLAN_ADDR`, `BOOTHPLAN_DATA_DIR` and `BOOTHPLAN_MAX_UPLOAD_BYTES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let addr = lookup("BOOTHPLAN_ADDR")
            .and_then(|a| a.parse().ok())
            .or_else(|| DEFAULT_ADDR.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3040)));
        Self {
            addr,
            data_dir: lookup("BOOTHPLAN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            max_upload_bytes: lookup("BOOTHPLAN_MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn plans_dir(&self) -> PathBuf {
        self.data_dir.join("floorplans")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("images")
    }

    pub fn vendors_dir(&self) -> PathBuf {
        self.data_dir.join("vendors")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 3040)));
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.images_dir(), PathBuf::from("./data/images"));
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let env: HashMap<&str, &str> = [
            ("BOOTHPLAN_ADDR", "127.0.0.1:8080"),
            ("BOOTHPLAN_DATA_DIR", "/srv/boothplan"),
            ("BOOTHPLAN_MAX_UPLOAD_BYTES", "lots"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.plans_dir(), PathBuf::from("/srv/boothplan/floorplans"));
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }
}
