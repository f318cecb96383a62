//! Append-only lead records. Write-once: nothing in the system mutates or
//! deletes a stored lead.

use crate::now_stamp;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEAD_TYPE: &str = "lead_form";

/// Lead as posted by the public form.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct LeadRequest {
    pub lead_type: String,
    pub page: String,
    pub referer: String,
    pub utm: serde_json::Value,
    pub fields: serde_json::Value,
}

/// One row of the persisted lead log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LeadRecord {
    pub ts: String,
    pub ip: String,
    pub lead_type: String,
    pub page: String,
    pub referer: String,
    pub utm_json: String,
    pub fields_json: String,
}

impl LeadRecord {
    pub fn from_request(req: LeadRequest, ip: String) -> Self {
        let lead_type = req.lead_type.trim();
        Self {
            ts: now_stamp(),
            ip,
            lead_type: if lead_type.is_empty() {
                DEFAULT_LEAD_TYPE.to_string()
            } else {
                lead_type.to_string()
            },
            page: req.page.trim().to_string(),
            referer: req.referer.trim().to_string(),
            utm_json: compact_json(&req.utm),
            fields_json: compact_json(&req.fields),
        }
    }
}

fn compact_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(_) => value.to_string(),
        _ => "{}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_defaults_lead_type_and_flattens_json() {
        let rec = LeadRecord::from_request(
            LeadRequest {
                lead_type: " ".into(),
                page: "/catalog/kmu/".into(),
                utm: json!({"utm_source": "yd"}),
                fields: json!("not an object"),
                ..LeadRequest::default()
            },
            "10.0.0.1".into(),
        );
        assert_eq!(rec.lead_type, DEFAULT_LEAD_TYPE);
        assert_eq!(rec.utm_json, r#"{"utm_source":"yd"}"#);
        assert_eq!(rec.fields_json, "{}");
        assert_eq!(rec.ip, "10.0.0.1");
    }
}
