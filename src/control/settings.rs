use crate::catalog::CatalogService;
use crate::control::{require_admin, AdminCredentials, Response};
use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpRequest, HttpResponse};
use catalog_types::settings::SettingsPatch;

#[get("/api/public/settings")]
pub async fn public_settings(catalog: Data<CatalogService>) -> Response {
    let settings = catalog.store().load_settings().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[post("/api/settings")]
pub async fn save_settings(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    catalog: Data<CatalogService>,
    payload: Json<SettingsPatch>,
) -> Response {
    require_admin(&req, &creds)?;
    let saved = catalog.store().save_settings(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(saved))
}
