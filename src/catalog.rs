//! Catalog CRUD service. Every mutation is one full load, an in-memory
//! change and one atomic replace of the whole collection.

use crate::store::CatalogStore;
use catalog_types::now_stamp;
use catalog_types::product::{merge, mint_id, Product, ProductPatch};
use derive_more::{Display, Error};
use std::collections::HashSet;

#[derive(Debug, Display, Error)]
pub enum CatalogError {
    #[display("id required")]
    IdRequired,
    #[error(ignore)]
    #[display("product {id} not found")]
    NotFound { id: String },
    #[error(ignore)]
    Persistence(anyhow::Error),
}

#[derive(Clone)]
pub struct CatalogService {
    store: CatalogStore,
}

impl CatalogService {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        self.store.load().await.map_err(CatalogError::Persistence)
    }

    /// Mints a fresh id, normalizes the payload and appends. Any id in the
    /// payload is discarded.
    pub async fn create(&self, mut patch: ProductPatch) -> Result<String, CatalogError> {
        let mut products = self.list().await?;
        let taken: HashSet<String> = products.iter().map(|p| p.id.clone()).collect();
        // minted before normalization so the title fallback sees the real id
        patch.id = Some(mint_id(&taken));
        let mut product = patch.normalize();
        product.updated_at = now_stamp();
        let id = product.id.clone();
        products.push(product);
        self.store
            .replace(products)
            .await
            .map_err(CatalogError::Persistence)?;
        Ok(id)
    }

    /// Replaces the record in place, preserving its position. Fields the
    /// payload omits fall back per the update whitelist, everything else to
    /// normalization defaults.
    pub async fn update(&self, patch: ProductPatch) -> Result<(), CatalogError> {
        let id = patch
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::IdRequired)?
            .to_string();

        let mut products = self.list().await?;
        let idx = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.clone() })?;

        let mut product = merge(&products[idx], patch).normalize();
        product.updated_at = now_stamp();
        products[idx] = product;
        self.store
            .replace(products)
            .await
            .map_err(CatalogError::Persistence)
    }

    /// Removes every record with the given id, keeping the relative order
    /// of the rest. Deleting an unknown id is a successful no-op.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::IdRequired);
        }
        let mut products = self.list().await?;
        products.retain(|p| p.id != id);
        self.store
            .replace(products)
            .await
            .map_err(CatalogError::Persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorePaths;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> CatalogService {
        CatalogService::new(CatalogStore::new(StorePaths::new(dir.path().join("data"))))
    }

    fn patch(title: &str) -> ProductPatch {
        ProductPatch {
            title: Some(title.to_string()),
            ..ProductPatch::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_unique_ids() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let mut payload = patch("Palfinger PK 17502");
        payload.id = Some("forced-id".into());
        let a = svc.create(payload).await.unwrap();
        let b = svc.create(patch("Fassi F215A")).await.unwrap();
        assert_ne!(a, b);
        assert_ne!(a, "forced-id");

        let ids: Vec<String> = svc.list().await.unwrap().iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn create_without_title_falls_back_to_minted_id() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let id = svc
            .create(ProductPatch {
                id: Some("forced-id".into()),
                ..ProductPatch::default()
            })
            .await
            .unwrap();

        let products = svc.list().await.unwrap();
        assert_eq!(products[0].id, id);
        // the discarded payload id must not leak into the title
        assert_eq!(products[0].title, id);
        assert_eq!(products[0].slug, id);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let mut payload = patch("X");
        payload.id = Some("missing".into());
        assert!(matches!(
            svc.update(payload).await,
            Err(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn update_requires_id() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        assert!(matches!(
            svc.update(patch("X")).await,
            Err(CatalogError::IdRequired)
        ));
    }

    #[tokio::test]
    async fn update_preserves_position_and_whitelist() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let first = svc.create(patch("First")).await.unwrap();
        let mut featured = patch("Second");
        featured.featured = Some(true);
        featured.featured_rank = Some("2".into());
        let second = svc.create(featured).await.unwrap();
        svc.create(patch("Third")).await.unwrap();

        // payload without featured_rank keeps the stored "2"
        let mut payload = patch("Second renamed");
        payload.id = Some(second.clone());
        svc.update(payload).await.unwrap();

        let products = svc.list().await.unwrap();
        assert_eq!(products[0].id, first);
        assert_eq!(products[1].id, second);
        assert_eq!(products[1].title, "Second renamed");
        assert!(products[1].featured);
        assert_eq!(products[1].featured_rank, "2");
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        let a = svc.create(patch("A")).await.unwrap();
        let b = svc.create(patch("B")).await.unwrap();
        let c = svc.create(patch("C")).await.unwrap();

        svc.delete(&b).await.unwrap();
        let before = svc.list().await.unwrap();
        assert_eq!(
            before.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec![a.as_str(), c.as_str()]
        );

        svc.delete("never-existed").await.unwrap();
        assert_eq!(svc.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn ids_stay_unique_after_mixed_operations() {
        let dir = TempDir::new().unwrap();
        let svc = service(&dir);
        for i in 0..10 {
            svc.create(patch(&format!("Item {i}"))).await.unwrap();
        }
        let products = svc.list().await.unwrap();
        let unique: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unique.len(), products.len());
    }
}
