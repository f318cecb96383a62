use actix_web::web::Data;
use actix_web::{App, HttpServer};
use crane_catalog::catalog::CatalogService;
use crane_catalog::config::AppConfig;
use crane_catalog::control::{self, AdminCredentials};
use crane_catalog::leads::LeadSink;
use crane_catalog::store::{CatalogStore, StorePaths};
use crane_catalog::uploader::UploadStore;
use log_error::LogError;
use std::env;

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(env::VarError::NotPresent) = env::var("RUST_LOG") {
        env::set_var("RUST_LOG", "INFO");
    }
    pretty_env_logger::formatted_timed_builder()
        .parse_default_env()
        .init();

    match std::fs::File::open(".env") {
        Ok(_) => envmnt::load_file(".env")?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::File::create(".env")?;
        }
        Err(err) => return Err(err.into()),
    }

    let config = AppConfig::from_env();
    if config.admin_pass.is_empty() {
        log::warn!("ADMIN_PASS is not set, admin endpoints will reject every request");
    }

    let store = CatalogStore::new(StorePaths::new(config.data_dir()));
    let initial = store
        .load()
        .await
        .log_error("Unable to read catalog")
        .unwrap_or_default();
    log::info!("Catalog loaded, {} products", initial.len());
    let catalog = CatalogService::new(store);

    // first run: seed the collection from the bundled CSV if there is one
    if initial.is_empty() && config.products_csv().exists() {
        match crane_catalog::import::import_csv(catalog.store(), &config.products_csv()).await {
            Ok(count) => log::info!("Seeded catalog from products.csv, {count} products"),
            Err(err) => log::warn!("Catalog seed skipped: {err}"),
        }
    }
    let leads = LeadSink::new(config.leads_dir());
    let uploads = UploadStore::new(config.uploads_dir());
    let creds = AdminCredentials::new(config.admin_user.clone(), config.admin_pass.clone());

    let bind = (config.bind_addr.clone(), config.port);
    log::info!("Catalog server listening on {}:{}", bind.0, bind.1);

    let assets_dir = config.assets_dir();
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(catalog.clone()))
            .app_data(Data::new(leads.clone()))
            .app_data(Data::new(uploads.clone()))
            .app_data(Data::new(creds.clone()))
            .app_data(Data::new(config.clone()))
            .service(control::products::public_products)
            .service(control::products::public_facets)
            .service(control::products::admin_products)
            .service(control::products::mutate_products)
            .service(control::products::import_csv)
            .service(control::settings::public_settings)
            .service(control::settings::save_settings)
            .service(control::leads::submit_lead)
            .service(control::leads::download_leads)
            .service(control::upload::upload_images)
            .service(actix_files::Files::new("/assets", assets_dir.clone()))
    })
    .bind(bind)?
    .run()
    .await?;
    Ok(())
}
