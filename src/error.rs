use thiserror::Error;

use crate::analysis::roles::Role;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Scout AI service is not configured")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid response from scout AI service: {0}")]
    SchemaError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

/// Reasons a lineup cannot be recommended from the supplied data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsufficientDataError {
    #[error("No player data available for analysis")]
    NoPlayers,

    #[error("Not enough role data to recommend a complete lineup")]
    NotEnoughRoles,

    #[error("Missing data for these essential roles: {}", join_roles(.0))]
    MissingRoles(Vec<Role>),

    #[error("Not enough distinct players to cover these essential roles: {}", join_roles(.0))]
    NotEnoughPlayers(Vec<Role>),
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
