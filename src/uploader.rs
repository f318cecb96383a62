//! Upload store: accepts image files, places them under the public uploads
//! tree and hands back URL paths. The rest of the system treats those
//! paths as opaque strings inside `images`.

use anyhow::Context;
use catalog_types::slug::{safe_filename, sanitize_category};
use std::path::{Path, PathBuf};

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif", "jfif", "gif"];
pub const MAX_FILES_PER_REQUEST: usize = 10;

#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Copies one uploaded file into `{uploads}/{category}/` under a
    /// randomized name and returns its public URL path.
    pub async fn save(
        &self,
        category: &str,
        name_hint: &str,
        original_name: &str,
        source: &Path,
    ) -> Result<String, anyhow::Error> {
        let category = sanitize_category(category);
        let filename = format!(
            "{}-{:010x}.{}",
            safe_filename(name_hint),
            rand::random::<u64>() & 0xff_ffff_ffff,
            extension_for(original_name),
        );

        let target_dir = self.dir.join(&category);
        let target = target_dir.join(&filename);
        let source = source.to_path_buf();
        tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&target_dir)
                .with_context(|| format!("Unable to create uploads dir {}", target_dir.display()))?;
            std::fs::copy(&source, &target)
                .with_context(|| format!("Unable to store upload {}", target.display()))?;
            Ok::<_, anyhow::Error>(())
        })
        .await
        .context("upload task failed")??;

        Ok(format!("/assets/uploads/{category}/{filename}"))
    }
}

/// Lowercased extension of the client filename; unknown or missing
/// extensions become jpg.
fn extension_for(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        ext
    } else {
        "jpg".to_string()
    }
}
