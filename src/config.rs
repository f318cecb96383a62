//! Process configuration. Paths live in an explicit struct handed to the
//! store and services at construction, so tests can run against isolated
//! directories instead of process-wide constants.

use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub base_dir: PathBuf,
    pub admin_user: String,
    pub admin_pass: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: envmnt::get_or("BIND_ADDR", "0.0.0.0"),
            port: envmnt::get_parse("PORT").unwrap_or(8090),
            base_dir: PathBuf::from(envmnt::get_or("BASE_DIR", ".")),
            admin_user: envmnt::get_or("ADMIN_USER", "admin"),
            admin_pass: envmnt::get_or("ADMIN_PASS", ""),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn leads_dir(&self) -> PathBuf {
        self.base_dir.join("leads")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.base_dir.join("assets")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.assets_dir().join("uploads")
    }

    /// Seed CSV consumed by the bulk import endpoint.
    pub fn products_csv(&self) -> PathBuf {
        self.data_dir().join("products.csv")
    }
}
