use crate::control::{require_admin, AdminCredentials, ControllerError, Response};
use crate::uploader::{UploadStore, MAX_FILES_PER_REQUEST};
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::web::Data;
use actix_web::{post, HttpRequest, HttpResponse};
use serde_json::json;

#[derive(MultipartForm, Debug)]
pub struct UploadForm {
    #[multipart(rename = "file")]
    pub files: Vec<TempFile>,
    pub category: Option<Text<String>>,
    pub slug: Option<Text<String>>,
}

#[post("/api/upload")]
pub async fn upload_images(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    store: Data<UploadStore>,
    form: MultipartForm<UploadForm>,
) -> Response {
    require_admin(&req, &creds)?;
    let form = form.into_inner();
    let category = form.category.map(|t| t.into_inner()).unwrap_or_default();
    let hint = form.slug.map(|t| t.into_inner()).unwrap_or_default();
    let hint = if hint.trim().is_empty() {
        "image".to_string()
    } else {
        hint
    };

    let mut saved = Vec::new();
    for file in form.files.into_iter().take(MAX_FILES_PER_REQUEST) {
        let original_name = file.file_name.clone().unwrap_or_default();
        let url = store
            .save(&category, &hint, &original_name, file.file.path())
            .await?;
        saved.push(url);
    }

    if saved.is_empty() {
        return Err(ControllerError::InvalidInput {
            field: "file".to_string(),
            msg: "file required".to_string(),
        });
    }
    Ok(HttpResponse::Ok().json(json!({"ok": true, "path": saved[0], "paths": saved})))
}
