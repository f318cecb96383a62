//! HTTP surface: error taxonomy, admin gate and request helpers shared by
//! the controllers.

use crate::catalog::CatalogError;
use crate::import::ImportError;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use base64::Engine;
use derive_more::{Display, Error};
use serde_json::json;

pub mod leads;
pub mod products;
pub mod settings;
pub mod upload;

pub type Response = Result<HttpResponse, ControllerError>;

#[derive(Debug, Display, Error)]
pub enum ControllerError {
    NotFound,
    Unauthorized,
    #[error(ignore)]
    #[display("Invalid field {field}: {msg}")]
    InvalidInput {
        field: String,
        msg: String,
    },
    #[error(ignore)]
    InternalServerError(anyhow::Error),
}

impl From<anyhow::Error> for ControllerError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err)
    }
}

impl From<CatalogError> for ControllerError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::IdRequired => ControllerError::InvalidInput {
                field: "id".to_string(),
                msg: "id required".to_string(),
            },
            CatalogError::NotFound { .. } => ControllerError::NotFound,
            CatalogError::Persistence(err) => ControllerError::InternalServerError(err),
        }
    }
}

impl From<ImportError> for ControllerError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::SourceMissing => ControllerError::NotFound,
            ImportError::EmptyHeader | ImportError::Malformed(_) => ControllerError::InvalidInput {
                field: "csv".to_string(),
                msg: err.to_string(),
            },
            ImportError::Persistence(err) => ControllerError::InternalServerError(err),
        }
    }
}

impl actix_web::error::ResponseError for ControllerError {
    fn error_response(&self) -> HttpResponse {
        log::warn!("{self:?}");
        match self {
            ControllerError::NotFound => {
                HttpResponse::NotFound().json(json!({"ok": false, "error": "not found"}))
            }
            ControllerError::Unauthorized => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Basic realm=\"Admin\""))
                .json(json!({"ok": false, "error": "Unauthorized"})),
            ControllerError::InvalidInput { .. } => HttpResponse::BadRequest()
                .json(json!({"ok": false, "error": self.to_string()})),
            ControllerError::InternalServerError(_) => HttpResponse::InternalServerError()
                .json(json!({"ok": false, "error": "internal error"})),
        }
    }
}

#[derive(Clone)]
pub struct AdminCredentials {
    pub user: String,
    pub pass: String,
}

impl AdminCredentials {
    pub fn new(user: String, pass: String) -> Self {
        Self { user, pass }
    }
}

/// Basic-auth capability gate in front of every admin operation. Empty
/// configured credentials always deny.
pub fn require_admin(req: &HttpRequest, creds: &AdminCredentials) -> Result<(), ControllerError> {
    if creds.user.is_empty() || creds.pass.is_empty() {
        return Err(ControllerError::Unauthorized);
    }
    let decoded = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|b64| base64::engine::general_purpose::STANDARD.decode(b64.trim()).ok())
        .and_then(|raw| String::from_utf8(raw).ok())
        .ok_or(ControllerError::Unauthorized)?;
    match decoded.split_once(':') {
        Some((user, pass)) if user == creds.user && pass == creds.pass => Ok(()),
        _ => Err(ControllerError::Unauthorized),
    }
}

/// Client address, preferring proxy headers the way the deployment sets
/// them, first entry of a comma list.
pub fn client_ip(req: &HttpRequest) -> String {
    for name in ["cf-connecting-ip", "x-real-ip", "x-forwarded-for"] {
        if let Some(value) = req.headers().get(name).and_then(|v| v.to_str().ok()) {
            let first = value.split(',').next().unwrap_or("").trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    req.peer_addr()
        .map(|a| a.ip().to_string())
        .unwrap_or_default()
}
