use crate::control::{client_ip, require_admin, AdminCredentials, Response};
use crate::leads::LeadSink;
use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpRequest, HttpResponse};
use catalog_types::lead::{LeadRecord, LeadRequest};
use serde_json::json;

#[post("/api/lead")]
pub async fn submit_lead(
    req: HttpRequest,
    sink: Data<LeadSink>,
    payload: Json<LeadRequest>,
) -> Response {
    let record = LeadRecord::from_request(payload.into_inner(), client_ip(&req));
    sink.append(record).await?;
    Ok(HttpResponse::Ok().json(json!({"ok": true, "msg": "Заявка отправлена"})))
}

#[get("/api/leads.csv")]
pub async fn download_leads(
    req: HttpRequest,
    creds: Data<AdminCredentials>,
    sink: Data<LeadSink>,
) -> Response {
    require_admin(&req, &creds)?;
    let csv = sink.export().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"leads.csv\"",
        ))
        .body(csv))
}
