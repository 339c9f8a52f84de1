//! Application configuration: data paths and bind address, read from the
//! environment once at startup with sensible defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "clinic-api";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Runtime configuration. `CLINIC_DATA_DIR` and `CLINIC_BIND_ADDR`
/// override the defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("CLINIC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        let bind_addr = std::env::var("CLINIC_BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR
                    .parse()
                    .expect("default bind address is valid")
            });
        Self {
            bind_addr,
            data_dir,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("clinic.db")
    }

    /// Root of the per-category image directories.
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

/// ~/Clinic/ on all platforms (user-visible)
fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Clinic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_under_home() {
        let dir = default_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Clinic"));
    }

    #[test]
    fn derived_paths_under_data_dir() {
        let config = Config {
            bind_addr: DEFAULT_BIND_ADDR.parse().unwrap(),
            data_dir: PathBuf::from("/tmp/clinic-test"),
        };
        assert!(config.db_path().starts_with(&config.data_dir));
        assert!(config.uploads_dir().ends_with("uploads"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
