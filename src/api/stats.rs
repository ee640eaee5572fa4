use crate::error::AppError;
use std::fs;
use std::path::Path;
use std::time::Duration;

use super::endpoints::{player_stats_url, USER_AGENT};
use super::models::PlayerData;

const STATS_TIMEOUT_SECS: u64 = 10;

/// Anything that can look up one player's stats by name.
///
/// `Ok(None)` means the provider has no data for that player; errors are
/// transport or parse failures.
pub trait StatsSource {
    fn fetch(&self, name: &str) -> Result<Option<PlayerData>, AppError>;
}

pub struct HttpStatsSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpStatsSource {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(STATS_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build();
        HttpStatsSource {
            base_url: base_url.to_string(),
            agent,
        }
    }
}

impl StatsSource for HttpStatsSource {
    fn fetch(&self, name: &str) -> Result<Option<PlayerData>, AppError> {
        let url = player_stats_url(&self.base_url, name);

        let body = match self.agent.get(&url).call() {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| AppError::HttpError(e.to_string()))?,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(ureq::Error::Status(429, _)) => return Err(AppError::RateLimited),
            Err(e) => return Err(AppError::HttpError(e.to_string())),
        };

        let player: PlayerData =
            serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))?;
        player.validate()?;
        Ok(Some(player))
    }
}

/// Player stats held in memory, either loaded from a JSON export or built
/// from sample data.
#[derive(Debug, Clone, Default)]
pub struct LocalStatsSource {
    players: Vec<PlayerData>,
}

impl LocalStatsSource {
    pub fn from_players(players: Vec<PlayerData>) -> Result<Self, AppError> {
        for player in &players {
            player.validate()?;
        }
        Ok(LocalStatsSource { players })
    }

    /// Loads a JSON array of players, e.g. `[{"name": "TenZ", "stats": [...]}]`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let players: Vec<PlayerData> = serde_json::from_str(&content)
            .map_err(|e| AppError::ParseError(format!("{}: {}", path.display(), e)))?;
        Self::from_players(players)
    }

    pub fn players(&self) -> &[PlayerData] {
        &self.players
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }
}

impl StatsSource for LocalStatsSource {
    fn fetch(&self, name: &str) -> Result<Option<PlayerData>, AppError> {
        Ok(self
            .players
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }
}

/// Fetches each name in turn, keeping input order. Players the source has no
/// data for, and failed fetches, are dropped.
pub fn fetch_players<F>(source: &dyn StatsSource, names: &[String], mut on_fetched: F) -> Vec<PlayerData>
where
    F: FnMut(&str),
{
    let mut results = Vec::with_capacity(names.len());

    for name in names {
        match source.fetch(name) {
            Ok(Some(player)) => results.push(player),
            Ok(None) => tracing::info!(player = %name, "no stats found"),
            Err(e) => tracing::warn!(player = %name, error = %e, "failed to fetch stats"),
        }
        on_fetched(name);
    }

    results
}
