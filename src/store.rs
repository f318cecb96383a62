//! File-backed catalog store. The whole collection is the unit of
//! persistence: readers always see either the previous or the next full
//! state because every write goes through a temp file and a single rename.

use anyhow::Context;
use catalog_types::product::Product;
use catalog_types::settings::{SettingsPatch, SiteSettings};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct StorePaths {
    pub data_dir: PathBuf,
}

impl StorePaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn products_json(&self) -> PathBuf {
        self.data_dir.join("products.json")
    }

    pub fn settings_json(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }
}

#[derive(Clone)]
pub struct CatalogStore {
    paths: StorePaths,
}

impl CatalogStore {
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Current persisted collection. A missing file or malformed content is
    /// "no data", never an error.
    pub async fn load(&self) -> Result<Vec<Product>, anyhow::Error> {
        let path = self.paths.products_json();
        tokio::task::spawn_blocking(move || read_json_or_default(&path))
            .await
            .context("catalog load task failed")
    }

    /// Atomically replaces the persisted collection. On any failure the
    /// canonical file is left untouched and the temp artifact is removed.
    ///
    /// Callers race at read-modify-write granularity: two concurrent admin
    /// edits both load the same prior state and the later replace wins.
    pub async fn replace(&self, products: Vec<Product>) -> Result<(), anyhow::Error> {
        let path = self.paths.products_json();
        tokio::task::spawn_blocking(move || write_json_atomic(&path, &products))
            .await
            .context("catalog replace task failed")?
    }

    pub async fn load_settings(&self) -> Result<SiteSettings, anyhow::Error> {
        let path = self.paths.settings_json();
        let settings: SiteSettings = tokio::task::spawn_blocking(move || read_json_or_default(&path))
            .await
            .context("settings load task failed")?;
        Ok(settings.normalized())
    }

    pub async fn save_settings(&self, patch: SettingsPatch) -> Result<SiteSettings, anyhow::Error> {
        let updated = self.load_settings().await?.apply(patch);
        let path = self.paths.settings_json();
        let to_write = updated.clone();
        tokio::task::spawn_blocking(move || write_json_atomic(&path, &to_write))
            .await
            .context("settings save task failed")??;
        Ok(updated)
    }
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(err) => {
            log::warn!("Unable to open {}: {err}", path.display());
            return T::default();
        }
    };
    match serde_json::from_reader(std::io::BufReader::new(file)) {
        Ok(v) => v,
        Err(err) => {
            log::warn!("Malformed {}: {err}", path.display());
            T::default()
        }
    }
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
    let dir = path
        .parent()
        .with_context(|| format!("No parent dir for {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Unable to create dir {}", dir.display()))?;

    let tmp = PathBuf::from(format!("{}.tmp.{:08x}", path.display(), rand::random::<u32>()));
    let write = || -> Result<(), anyhow::Error> {
        let file = std::fs::File::create(&tmp)
            .with_context(|| format!("Unable to create temp file {}", tmp.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)
            .context("Unable to serialize")?;
        Ok(())
    };
    if let Err(err) = write() {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("Unable to replace {}", path.display()));
    }
    Ok(())
}
