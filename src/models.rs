//! Frontend Models
//!
//! Data structures returned by the beer API.

use serde::{Deserialize, Serialize};

use leptos_swipe::DeckItem;

/// Beer card data (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: String,
    pub label: String,
    pub image_path: String,
    pub description: Option<String>,
}

impl DeckItem for Beer {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Taste match with each host, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    #[serde(default)]
    pub score_ruda: f64,
    #[serde(default)]
    pub score_marek: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Ruda,
    Marek,
}

impl Host {
    pub const ALL: [Host; 2] = [Host::Ruda, Host::Marek];

    /// Value used in API query strings
    pub fn as_str(self) -> &'static str {
        match self {
            Host::Ruda => "ruda",
            Host::Marek => "marek",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Host::Ruda => "Ruda",
            Host::Marek => "Marek",
        }
    }

    /// Column holding this host's match score
    pub fn score_column(self) -> &'static str {
        match self {
            Host::Ruda => "score_ruda",
            Host::Marek => "score_marek",
        }
    }

    pub fn score_of(self, result: &SubmitResult) -> f64 {
        match self {
            Host::Ruda => result.score_ruda,
            Host::Marek => result.score_marek,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub name: String,
    pub score: f64,
    pub created_at: String,
}
