use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use chrono::{DateTime, Utc};
use crate::api::models::PlayerData;
use crate::api::stats::StatsSource;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedPlayer {
    pub player: PlayerData,
    pub cached_at: DateTime<Utc>,
}

impl CachedPlayer {
    pub fn is_stale(&self, max_age_mins: u64) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age.num_minutes() >= max_age_mins as i64
    }
}

/// One JSON file per player under the cache directory.
pub struct PlayerCache {
    dir: PathBuf,
}

impl PlayerCache {
    pub fn new(dir: PathBuf) -> Self {
        PlayerCache { dir }
    }

    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".valorant_scout")
            .join("players")
    }

    /// Lowercase ASCII letters and digits are kept; every other byte becomes
    /// `_xx` hex, so distinct names never share a file.
    fn get_cache_path(&self, player: &str) -> PathBuf {
        let mut file_name = String::with_capacity(player.len());
        for byte in player.to_lowercase().bytes() {
            if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
                file_name.push(byte as char);
            } else {
                file_name.push_str(&format!("_{:02x}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }

    pub fn load(&self, player: &str) -> Result<Option<CachedPlayer>, AppError> {
        let path = self.get_cache_path(player);

        match fs::read_to_string(&path) {
            Ok(content) => {
                let cached: CachedPlayer = serde_json::from_str(&content).map_err(|e| {
                    AppError::CacheError(format!("Failed to parse cache {}: {}", path.display(), e))
                })?;
                cached.player.validate()?;
                Ok(Some(cached))
            }
            Err(_) => Ok(None),
        }
    }

    pub fn save(&self, player: &PlayerData) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::CacheError(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;

        let cached = CachedPlayer {
            player: player.clone(),
            cached_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&cached)
            .map_err(|e| AppError::CacheError(format!("Failed to serialize cache: {}", e)))?;

        fs::write(self.get_cache_path(&player.name), json)
            .map_err(|e| AppError::CacheError(format!("Failed to write cache: {}", e)))?;

        Ok(())
    }
}

/// Serves fresh cache entries and falls through to `inner` otherwise,
/// caching whatever it returns.
pub struct CachedStatsSource<S> {
    inner: S,
    cache: PlayerCache,
    max_age_mins: u64,
    refresh: bool,
}

impl<S: StatsSource> CachedStatsSource<S> {
    pub fn new(inner: S, cache: PlayerCache, max_age_mins: u64, refresh: bool) -> Self {
        CachedStatsSource {
            inner,
            cache,
            max_age_mins,
            refresh,
        }
    }
}

impl<S: StatsSource> StatsSource for CachedStatsSource<S> {
    fn fetch(&self, name: &str) -> Result<Option<PlayerData>, AppError> {
        if !self.refresh {
            match self.cache.load(name) {
                Ok(Some(cached)) if !cached.player.name.eq_ignore_ascii_case(name) => {
                    tracing::warn!(player = %name, cached = %cached.player.name, "cache entry belongs to another player");
                }
                Ok(Some(cached)) if !cached.is_stale(self.max_age_mins) => {
                    tracing::debug!(player = %name, "stats cache hit");
                    return Ok(Some(cached.player));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(player = %name, error = %e, "ignoring unreadable cache entry"),
            }
        }

        let fetched = self.inner.fetch(name)?;
        if let Some(player) = &fetched {
            if let Err(e) = self.cache.save(player) {
                tracing::warn!(player = %name, error = %e, "failed to cache stats");
            }
        }
        Ok(fetched)
    }
}
