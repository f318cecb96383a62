//! Bulk CSV import. The batch goes through the same defaults and
//! normalization as a single create and lands in one atomic replace: import
//! is a full-collection overwrite, not a merge with existing data.

use crate::store::CatalogStore;
use catalog_types::product::{
    mint_id, ImagesInput, Product, ProductPatch, PLACEHOLDER_IMAGE,
};
use derive_more::{Display, Error};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Display, Error)]
pub enum ImportError {
    #[display("products.csv not found")]
    SourceMissing,
    #[display("empty CSV")]
    EmptyHeader,
    #[error(ignore)]
    #[display("malformed CSV: {_0}")]
    Malformed(csv::Error),
    #[error(ignore)]
    Persistence(anyhow::Error),
}

/// Reads the whole CSV, normalizes every row, mints missing ids and
/// replaces the persisted collection in one write. Nothing is persisted if
/// any row fails to parse.
pub async fn import_csv(store: &CatalogStore, path: &Path) -> Result<usize, ImportError> {
    let path = PathBuf::from(path);
    let products = tokio::task::spawn_blocking(move || read_rows(&path))
        .await
        .map_err(|err| ImportError::Persistence(err.into()))??;
    let count = products.len();
    store
        .replace(products)
        .await
        .map_err(ImportError::Persistence)?;
    Ok(count)
}

fn read_rows(path: &Path) -> Result<Vec<Product>, ImportError> {
    if !path.exists() {
        return Err(ImportError::SourceMissing);
    }
    let mut reader = csv::Reader::from_path(path).map_err(ImportError::Malformed)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(ImportError::Malformed)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::EmptyHeader);
    }

    let mut products = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();
    for record in reader.records() {
        let record = record.map_err(ImportError::Malformed)?;
        let row: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(record.iter())
            .collect();
        let mut product = patch_from_row(&row).normalize();
        if product.id.is_empty() {
            product.id = mint_id(&taken);
        }
        taken.insert(product.id.clone());
        products.push(product);
    }
    Ok(products)
}

fn patch_from_row(row: &HashMap<&str, &str>) -> ProductPatch {
    let col = |name: &str| row.get(name).map(|v| v.to_string());

    // the cover column defaults to the placeholder even when absent
    let image = col("image")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    // an images blob replaces the cover + numbered columns entirely
    let images = match col("images").filter(|s| !s.trim().is_empty()) {
        Some(blob) => ImagesInput::Text(blob),
        None => {
            let mut list = vec![image];
            list.extend(extra_image_columns(row));
            ImagesInput::List(list)
        }
    };

    ProductPatch {
        id: col("id"),
        slug: col("slug"),
        category: col("category"),
        title: col("title"),
        brand: col("brand"),
        model: col("model"),
        year: col("year"),
        status: col("status"),
        price: col("price"),
        city: col("city"),
        short: col("short"),
        description: col("description"),
        specs: col("specs"),
        cta: col("cta"),
        cargo: col("cargo"),
        outreach: col("outreach"),
        sections: col("sections"),
        control: col("control"),
        images: Some(images),
        ..ProductPatch::default()
    }
}

/// Multi-column image convention: `image2`..`image10` with `img`/`photo`
/// spellings accepted, first non-empty spelling per index wins.
fn extra_image_columns(row: &HashMap<&str, &str>) -> Vec<String> {
    let mut out = Vec::new();
    for i in 2..=10 {
        for prefix in ["image", "img", "photo"] {
            let key = format!("{prefix}{i}");
            if let Some(v) = row.get(key.as_str()).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                out.push(v.to_string());
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorePaths;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> CatalogStore {
        CatalogStore::new(StorePaths::new(dir.path().join("data")))
    }

    fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("products.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_source_reported_before_any_write() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let err = import_csv(&s, &dir.path().join("nope.csv")).await.unwrap_err();
        assert!(matches!(err, ImportError::SourceMissing));
        assert!(!dir.path().join("data/products.json").exists());
    }

    #[tokio::test]
    async fn two_rows_without_ids_get_distinct_ids_and_placeholder() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let csv = write_csv(
            &dir,
            "title,brand\nPalfinger PK 17502,Palfinger\nFassi F215A,Fassi\n",
        );
        let count = import_csv(&s, &csv).await.unwrap();
        assert_eq!(count, 2);

        let products = s.load().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_ne!(products[0].id, products[1].id);
        assert_eq!(products[0].slug, "palfinger-pk-17502");
        assert_eq!(products[1].slug, "fassi-f215a");
        for p in &products {
            assert_eq!(p.images, vec![PLACEHOLDER_IMAGE]);
        }
    }

    #[tokio::test]
    async fn import_overwrites_existing_collection() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        s.replace(vec![ProductPatch {
            id: Some("old".into()),
            title: Some("Old".into()),
            ..ProductPatch::default()
        }
        .normalize()])
            .await
            .unwrap();

        let csv = write_csv(&dir, "id,title\nnew,New\n");
        import_csv(&s, &csv).await.unwrap();
        let products = s.load().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "new");
    }

    #[tokio::test]
    async fn multi_column_images_flattened() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let csv = write_csv(
            &dir,
            "title,image,image2,photo3\nCrane,/a.jpg,/b.jpg,/c.jpg\n",
        );
        import_csv(&s, &csv).await.unwrap();
        let products = s.load().await.unwrap();
        assert_eq!(products[0].images, vec!["/a.jpg", "/b.jpg", "/c.jpg"]);
        assert_eq!(products[0].image, "/a.jpg");
    }

    #[tokio::test]
    async fn images_blob_column_wins_over_numbered() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);
        let csv = write_csv(
            &dir,
            "title,images,image2\nCrane,\"/x.jpg\n/y.jpg\",/ignored.jpg\n",
        );
        import_csv(&s, &csv).await.unwrap();
        let products = s.load().await.unwrap();
        assert_eq!(products[0].images, vec!["/x.jpg", "/y.jpg"]);
        assert_eq!(products[0].image, "/x.jpg");
    }
}
