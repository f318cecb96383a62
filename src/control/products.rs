use crate::catalog::CatalogService;
use crate::config::AppConfig;
use crate::control::{require_admin, AdminCredentials, Response};
use crate::import;
use crate::query::{enrich, enumerate_facets, query, QueryParams};
use actix_web::web::{Data, Json, Query};
use actix_web::{get, post, HttpRequest, HttpResponse};
use catalog_types::product::ProductPatch;
use serde::Deserialize;
use serde_json::json;

/// Full normalized collection with derived facet fields, optionally
/// filtered and sorted. This is what the catalog pages consume.
#[get("/api/public/products")]
pub async fn public_products(
    catalog: Data<CatalogService>,
    params: Query<QueryParams>,
) -> Response {
    let items = enrich(catalog.list().await?);
    Ok(HttpResponse::Ok().json(query(&items, &params)))
}

#[derive(Debug, Default, Deserialize)]
pub struct FacetQuery {
    pub category: Option<String>,
}

/// Distinct filter values for the UI selects.
#[get("/api/public/facets")]
pub async fn public_facets(catalog: Data<CatalogService>, params: Query<FacetQuery>) -> Response {
    let items = enrich(catalog.list().await?);
    let options = enumerate_facets(&items, params.category.as_deref());
    Ok(HttpResponse::Ok().json(options))
}

#[get("/api/products")]
pub async fn admin_products(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    catalog: Data<CatalogService>,
) -> Response {
    require_admin(&req, &creds)?;
    Ok(HttpResponse::Ok().json(catalog.list().await?))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProductAction {
    Create { product: ProductPatch },
    Update { product: ProductPatch },
    Delete { id: String },
}

#[post("/api/products")]
pub async fn mutate_products(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    catalog: Data<CatalogService>,
    payload: Json<ProductAction>,
) -> Response {
    require_admin(&req, &creds)?;
    match payload.into_inner() {
        ProductAction::Create { product } => {
            let id = catalog.create(product).await?;
            Ok(HttpResponse::Ok().json(json!({"ok": true, "id": id})))
        }
        ProductAction::Update { product } => {
            catalog.update(product).await?;
            Ok(HttpResponse::Ok().json(json!({"ok": true})))
        }
        ProductAction::Delete { id } => {
            catalog.delete(&id).await?;
            Ok(HttpResponse::Ok().json(json!({"ok": true})))
        }
    }
}

/// Rebuilds the whole collection from the seed CSV. All-or-nothing: a bad
/// row fails the request before anything is persisted.
#[post("/api/import_csv")]
pub async fn import_csv(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    catalog: Data<CatalogService>,
    config: Data<AppConfig>,
) -> Response {
    require_admin(&req, &creds)?;
    let count = import::import_csv(catalog.store(), &config.products_csv()).await?;
    Ok(HttpResponse::Ok().json(json!({"ok": true, "count": count})))
}
