//! Result submission

use std::collections::HashMap;

use serde_json::{json, Value};

use leptos_swipe::Decision;

use super::{field_number, send, ApiError, ApiRequest};
use crate::config::ApiConfig;
use crate::models::SubmitResult;

pub fn submit_request(cfg: &ApiConfig, name: &str, choices: &HashMap<String, Decision>) -> ApiRequest {
    match &cfg.supabase {
        Some(sb) => ApiRequest::post_json(
            format!("{}/rest/v1/rpc/submit_result", sb.url),
            &json!({ "name_in": name, "choices": choices }),
        )
        .with_supabase_auth(sb),
        None => ApiRequest::post_json(format!("{}/submit", cfg.base), &json!({ "name": name, "choices": choices })),
    }
}

fn scores_from(row: &Value) -> SubmitResult {
    SubmitResult { score_ruda: field_number(row, "score_ruda"), score_marek: field_number(row, "score_marek") }
}

/// The RPC returns a one-row table; an empty result scores zero.
pub fn first_score_row(data: &Value) -> SubmitResult {
    match data {
        Value::Array(rows) => rows.first().map(scores_from).unwrap_or_default(),
        row @ Value::Object(_) => scores_from(row),
        _ => SubmitResult::default(),
    }
}

pub async fn submit_result(
    cfg: &ApiConfig,
    name: &str,
    choices: &HashMap<String, Decision>,
) -> Result<SubmitResult, ApiError> {
    log::info!("[API] Submitting {} choices for {}", choices.len(), name);
    let response = send(submit_request(cfg, name, choices)).await?.ensure_ok()?;
    Ok(first_score_row(&response.json()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> HashMap<String, Decision> {
        HashMap::from([("b1".to_string(), Decision::Yes), ("b2".to_string(), Decision::No)])
    }

    #[test]
    fn test_worker_payload() {
        let cfg = ApiConfig::from_parts(None, None, None);
        let req = submit_request(&cfg, "Alice", &choices());
        assert_eq!(req.url, "/api/submit");

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Alice", "choices": {"b1": 1, "b2": 0}}));
    }

    #[test]
    fn test_supabase_payload() {
        let cfg = ApiConfig::from_parts(None, Some("https://sb.example"), Some("anon"));
        let req = submit_request(&cfg, "Alice", &choices());
        assert_eq!(req.url, "https://sb.example/rest/v1/rpc/submit_result");

        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name_in"], "Alice");
        assert_eq!(body["choices"]["b1"], 1);
    }

    #[test]
    fn test_first_score_row() {
        let rpc = json!([{"score_ruda": 80, "score_marek": 47}]);
        assert_eq!(first_score_row(&rpc), SubmitResult { score_ruda: 80.0, score_marek: 47.0 });
        assert_eq!(first_score_row(&json!([])), SubmitResult::default());

        let worker = json!({"score_ruda": 12, "score_marek": "33"});
        assert_eq!(first_score_row(&worker), SubmitResult { score_ruda: 12.0, score_marek: 33.0 });
    }
}
