//! Beer list

use serde_json::{json, Value};

use super::{field_string, query_string, rows, send, ApiError, ApiRequest};
use crate::config::ApiConfig;
use crate::models::{Beer, Host};

pub fn beers_request(cfg: &ApiConfig, limit: u32) -> ApiRequest {
    match &cfg.supabase {
        Some(sb) => ApiRequest::post_json(
            format!("{}/rest/v1/rpc/get_beers_with_score", sb.url),
            &json!({ "p_host": Host::Ruda.as_str(), "p_limit": limit }),
        )
        .with_supabase_auth(sb),
        None => ApiRequest::get(format!("{}/beers?{}", cfg.base, query_string(&[("limit", limit.to_string().as_str())]))),
    }
}

/// Rows with missing fields become empty strings, a missing description is `None`.
pub fn normalize_beers(data: &Value) -> Vec<Beer> {
    rows(data)
        .iter()
        .map(|row| Beer {
            id: field_string(row, "id"),
            label: field_string(row, "label"),
            image_path: field_string(row, "image_path"),
            description: match row.get("description") {
                None | Some(Value::Null) => None,
                Some(_) => Some(field_string(row, "description")),
            },
        })
        .collect()
}

pub async fn fetch_beers(cfg: &ApiConfig, limit: u32) -> Result<Vec<Beer>, ApiError> {
    let response = send(beers_request(cfg, limit)).await?;
    let beers = normalize_beers(&response.json()?);
    log::info!("[API] Loaded {} beers", beers.len());
    Ok(beers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo_net::http::Method;

    #[test]
    fn test_worker_request() {
        let cfg = ApiConfig::from_parts(Some("/api"), None, None);
        let req = beers_request(&cfg, 15);
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url, "/api/beers?limit=15");
        assert!(req.body.is_none());
    }

    #[test]
    fn test_supabase_request() {
        let cfg = ApiConfig::from_parts(None, Some("https://sb.example"), Some("anon"));
        let req = beers_request(&cfg, 15);
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "https://sb.example/rest/v1/rpc/get_beers_with_score");

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"p_host": "ruda", "p_limit": 15}));
    }

    #[test]
    fn test_normalize_fills_missing_fields() {
        let data = json!([
            {"id": 3, "label": "Pilsner", "image_path": "/img/p.png", "description": "Crisp"},
            {"id": "b2", "label": null},
        ]);
        let beers = normalize_beers(&data);

        assert_eq!(
            beers[0],
            Beer { id: "3".into(), label: "Pilsner".into(), image_path: "/img/p.png".into(), description: Some("Crisp".into()) }
        );
        assert_eq!(beers[1], Beer { id: "b2".into(), label: String::new(), image_path: String::new(), description: None });
        assert!(normalize_beers(&json!({"error": "nope"})).is_empty());
    }
}
