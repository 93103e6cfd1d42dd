//! Request and response bodies of the scraping API. Field names are the
//! wire contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SitesResponse {
    #[serde(default)]
    pub(crate) sites_disponiveis: BTreeMap<String, String>,
}

impl SitesResponse {
    pub(crate) fn into_entries(self) -> Vec<SiteEntry> {
        self.sites_disponiveis
            .into_iter()
            .map(|(key, name)| SiteEntry { key, name })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateJobRequest {
    pub site: String,
    pub termo_busca: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_paginas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

impl CreateJobRequest {
    pub fn new(site: impl Into<String>, termo_busca: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            termo_busca: termo_busca.into(),
            max_paginas: None,
            delay: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct CreateJobResponse {
    #[serde(default)]
    pub(crate) job_id: Option<String>,
}

/// Failure body. `detail` is a string for handled errors and a list for
/// request validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_detail(self) -> Option<String> {
        let detail = match self.detail {
            Some(Value::String(text)) => Some(text),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        detail
            .or(self.message)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct JobStatusBody {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub progress: Option<Progress>,
    #[serde(default)]
    pub produtos: Option<Vec<ProductBody>>,
    /// Failure text some backends send instead of `message`.
    #[serde(default)]
    pub erro: Option<String>,
}

/// `progress` arrives either as a number or as free text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Progress {
    Percent(f64),
    Text(String),
}

impl Progress {
    /// Percentage clamped to 0..=100, if one can be read.
    pub fn percent(&self) -> Option<u8> {
        let raw = match self {
            Progress::Percent(value) => *value,
            Progress::Text(text) => text.trim().trim_end_matches('%').trim().parse().ok()?,
        };
        if raw.is_nan() {
            return None;
        }
        Some(raw.round().clamp(0.0, 100.0) as u8)
    }

    /// Free text that is not a percentage.
    pub fn text(&self) -> Option<&str> {
        match self {
            Progress::Text(text) if self.percent().is_none() && !text.trim().is_empty() => {
                Some(text)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProductBody {
    #[serde(default, deserialize_with = "display_string")]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub preco: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub avaliacao: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub vendas: Option<String>,
}

/// Accepts any scalar and keeps it as display text.
fn display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_body_accepts_numeric_and_text_progress() {
        let body: JobStatusBody =
            serde_json::from_value(json!({"status": "running", "progress": 10})).unwrap();
        assert_eq!(body.progress.unwrap().percent(), Some(10));

        let body: JobStatusBody = serde_json::from_value(
            json!({"status": "running", "progress": "Processando página 2..."}),
        )
        .unwrap();
        let progress = body.progress.unwrap();
        assert_eq!(progress.percent(), None);
        assert_eq!(progress.text(), Some("Processando página 2..."));

        let body: JobStatusBody =
            serde_json::from_value(json!({"status": "running", "progress": "45%"})).unwrap();
        assert_eq!(body.progress.unwrap().percent(), Some(45));
    }

    #[test]
    fn product_fields_tolerate_numbers_and_nulls() {
        let product: ProductBody = serde_json::from_value(
            json!({"nome": "X", "preco": 10.5, "link": null, "vendas": 120}),
        )
        .unwrap();
        assert_eq!(product.nome.as_deref(), Some("X"));
        assert_eq!(product.preco.as_deref(), Some("10.5"));
        assert_eq!(product.link, None);
        assert_eq!(product.avaliacao, None);
        assert_eq!(product.vendas.as_deref(), Some("120"));
    }

    #[test]
    fn error_body_prefers_detail_then_message() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "nope"})).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("nope"));

        let body: ErrorBody = serde_json::from_value(json!({"message": "later"})).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("later"));

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).unwrap();
        assert!(body.into_detail().unwrap().contains("field required"));
    }

    #[test]
    fn optional_creation_fields_are_omitted() {
        let body = serde_json::to_value(CreateJobRequest::new("shop_a", "phone")).unwrap();
        assert_eq!(body, json!({"site": "shop_a", "termo_busca": "phone"}));
    }
}
