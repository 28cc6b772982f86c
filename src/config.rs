//! Build-time Configuration
//!
//! Endpoints and log level come from environment variables read when the
//! wasm bundle is compiled (`BEER_API_BASE`, `BEER_SUPABASE_URL`,
//! `BEER_SUPABASE_ANON_KEY`, `BEER_LOG_LEVEL`).

use std::sync::OnceLock;

use leptos_swipe::policy::{Threshold, DEFAULT_PROGRESS_CAP_PX, DEFAULT_THRESHOLD_FRACTION};
use leptos_swipe::SwipePolicy;

const DEFAULT_API_BASE: &str = "/api";

#[derive(Clone, Debug, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    /// Base of the worker API, without trailing slash
    pub base: String,
    /// Direct Supabase access, used instead of the worker when set
    pub supabase: Option<SupabaseConfig>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ApiConfig {
    pub fn from_parts(base: Option<&str>, supabase_url: Option<&str>, anon_key: Option<&str>) -> Self {
        let base = non_empty(base).unwrap_or(DEFAULT_API_BASE).trim_end_matches('/').to_string();
        let supabase = match (non_empty(supabase_url), non_empty(anon_key)) {
            (Some(url), Some(key)) => Some(SupabaseConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key: key.to_string(),
            }),
            _ => None,
        };
        Self { base, supabase }
    }
}

pub fn api() -> &'static ApiConfig {
    static API: OnceLock<ApiConfig> = OnceLock::new();
    API.get_or_init(|| {
        ApiConfig::from_parts(
            option_env!("BEER_API_BASE"),
            option_env!("BEER_SUPABASE_URL"),
            option_env!("BEER_SUPABASE_ANON_KEY"),
        )
    })
}

pub fn parse_log_level(value: Option<&str>) -> log::Level {
    non_empty(value).and_then(|v| v.parse().ok()).unwrap_or(log::Level::Info)
}

pub fn log_level() -> log::Level {
    parse_log_level(option_env!("BEER_LOG_LEVEL"))
}

/// Game tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameConfig {
    /// Beers requested per game
    pub max_items: u32,
    /// Commit distance: a viewport fraction when `<= 1`, pixels otherwise
    pub swipe_threshold: f64,
    pub progress_cap_px: f64,
    /// Rows shown per host on the leaderboard
    pub leaderboard_limit: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_items: 15,
            swipe_threshold: DEFAULT_THRESHOLD_FRACTION,
            progress_cap_px: DEFAULT_PROGRESS_CAP_PX,
            leaderboard_limit: 10,
        }
    }
}

impl GameConfig {
    pub fn swipe_policy(&self) -> SwipePolicy {
        SwipePolicy::new(Threshold::from_raw(self.swipe_threshold), self.progress_cap_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ApiConfig::from_parts(None, None, None);
        assert_eq!(cfg.base, "/api");
        assert!(cfg.supabase.is_none());
    }

    #[test]
    fn test_supabase_needs_both_parts() {
        let cfg = ApiConfig::from_parts(Some("https://x.example/api/"), Some("https://sb.example/"), Some(""));
        assert_eq!(cfg.base, "https://x.example/api");
        assert!(cfg.supabase.is_none());

        let cfg = ApiConfig::from_parts(None, Some("https://sb.example/"), Some("anon"));
        assert_eq!(
            cfg.supabase,
            Some(SupabaseConfig { url: "https://sb.example".into(), anon_key: "anon".into() })
        );
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse_log_level(None), log::Level::Info);
        assert_eq!(parse_log_level(Some("debug")), log::Level::Debug);
        assert_eq!(parse_log_level(Some("nonsense")), log::Level::Info);
    }

    #[test]
    fn test_game_defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.max_items, 15);
        assert_eq!(cfg.swipe_policy(), SwipePolicy::default());
    }

    #[test]
    fn test_swipe_threshold_units() {
        let fraction = GameConfig { swipe_threshold: 0.5, ..GameConfig::default() };
        assert_eq!(fraction.swipe_policy().threshold, Threshold::Fraction(0.5));

        let pixels = GameConfig { swipe_threshold: 120.0, ..GameConfig::default() };
        assert_eq!(pixels.swipe_policy().threshold, Threshold::Pixels(120.0));
    }
}
