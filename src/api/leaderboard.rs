//! Leaderboard

use serde_json::Value;

use super::{field_number, field_string, query_string, rows, send, ApiError, ApiRequest};
use crate::config::ApiConfig;
use crate::models::{Host, LeaderboardRow};

pub fn leaderboard_request(cfg: &ApiConfig, host: Host, limit: u32) -> ApiRequest {
    let limit = limit.to_string();
    match &cfg.supabase {
        Some(sb) => {
            let order = format!("{}.desc.nullslast", host.score_column());
            let qs = query_string(&[
                ("select", "name,score_ruda,score_marek,created_at"),
                ("order", order.as_str()),
                ("limit", limit.as_str()),
            ]);
            ApiRequest::get(format!("{}/rest/v1/leaderboard_public?{}", sb.url, qs)).with_supabase_auth(sb)
        }
        None => {
            let qs = query_string(&[("host", host.as_str()), ("limit", limit.as_str())]);
            ApiRequest::get(format!("{}/leaderboard?{}", cfg.base, qs))
        }
    }
}

/// Rows already carrying a numeric `score` are kept, others take the
/// host's score column.
pub fn normalize_rows(data: &Value, host: Host) -> Vec<LeaderboardRow> {
    rows(data)
        .iter()
        .map(|row| {
            let score = match row.get("score").and_then(Value::as_f64) {
                Some(score) => score,
                None => field_number(row, host.score_column()),
            };
            LeaderboardRow { name: field_string(row, "name"), score, created_at: field_string(row, "created_at") }
        })
        .collect()
}

pub async fn fetch_leaderboard(cfg: &ApiConfig, host: Host, limit: u32) -> Result<Vec<LeaderboardRow>, ApiError> {
    let response = send(leaderboard_request(cfg, host, limit)).await?.ensure_ok()?;
    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::Decode { url: response.url.clone(), message: e.to_string() })?;
    Ok(normalize_rows(&body, host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_worker_request() {
        let cfg = ApiConfig::from_parts(None, None, None);
        let req = leaderboard_request(&cfg, Host::Marek, 10);
        assert_eq!(req.url, "/api/leaderboard?host=marek&limit=10");
    }

    #[test]
    fn test_postgrest_request() {
        let cfg = ApiConfig::from_parts(None, Some("https://sb.example"), Some("anon"));
        let req = leaderboard_request(&cfg, Host::Marek, 10);
        assert_eq!(
            req.url,
            "https://sb.example/rest/v1/leaderboard_public?select=name%2Cscore_ruda%2Cscore_marek%2Ccreated_at&order=score_marek.desc.nullslast&limit=10"
        );
        assert!(req.headers.iter().any(|(k, v)| *k == "apikey" && v == "anon"));
    }

    #[test]
    fn test_normalize_picks_host_column() {
        let data = json!([
            {"name": "Eva", "score_ruda": 90, "score_marek": 40, "created_at": "2025-10-01"},
            {"name": "Jan", "score_ruda": null, "score_marek": "abc"},
        ]);
        let marek = normalize_rows(&data, Host::Marek);
        assert_eq!(marek[0], LeaderboardRow { name: "Eva".into(), score: 40.0, created_at: "2025-10-01".into() });
        assert_eq!(marek[1].score, 0.0);
        assert_eq!(marek[1].created_at, "");

        let ruda = normalize_rows(&data, Host::Ruda);
        assert_eq!(ruda[0].score, 90.0);
        assert_eq!(ruda[1].score, 0.0);
    }

    #[test]
    fn test_normalize_keeps_existing_score() {
        let data = json!([{"name": "Eva", "score": 55, "score_ruda": 90}]);
        assert_eq!(normalize_rows(&data, Host::Ruda)[0].score, 55.0);
    }
}
