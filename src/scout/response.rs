//! Typed results of the scout assistant, and the schema checks that turn raw
//! service JSON into them.

use crate::analysis::maps::AgentSelection;
use crate::analysis::recommender::TeamComposition;
use crate::analysis::roles::Role;
use crate::error::AppError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

const MAX_LINEUP: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoutResponse {
    TeamComposition {
        #[serde(flatten)]
        team: TeamComposition,
        is_fallback: bool,
    },
    AgentSelection {
        map: String,
        #[serde(flatten)]
        selection: AgentSelection,
        is_fallback: bool,
    },
    TextResponse {
        content: String,
        is_fallback: bool,
    },
    Error {
        message: String,
    },
}

#[derive(Serialize)]
struct Payload<'a> {
    success: bool,
    #[serde(flatten)]
    response: &'a ScoutResponse,
}

impl ScoutResponse {
    pub fn is_fallback(&self) -> bool {
        match self {
            ScoutResponse::TeamComposition { is_fallback, .. }
            | ScoutResponse::AgentSelection { is_fallback, .. }
            | ScoutResponse::TextResponse { is_fallback, .. } => *is_fallback,
            ScoutResponse::Error { .. } => true,
        }
    }

    /// Wire form: the response fields plus a top-level `success` flag.
    pub fn to_payload(&self) -> Value {
        let payload = Payload {
            success: !matches!(self, ScoutResponse::Error { .. }),
            response: self,
        };
        serde_json::to_value(payload).unwrap_or_else(|e| {
            serde_json::json!({"success": false, "type": "error", "message": e.to_string()})
        })
    }
}

fn check_success_flag(value: &Value) -> Result<(), AppError> {
    match value.get("success") {
        Some(Value::Bool(false)) => {
            let reason = value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("service reported failure");
            Err(AppError::SchemaError(reason.to_string()))
        }
        _ => Ok(()),
    }
}

pub fn parse_team_composition(value: Value) -> Result<TeamComposition, AppError> {
    check_success_flag(&value)?;
    let team: TeamComposition =
        serde_json::from_value(value).map_err(|e| AppError::SchemaError(e.to_string()))?;

    if team.lineup.len() < Role::ALL.len() || team.lineup.len() > MAX_LINEUP {
        return Err(AppError::SchemaError(format!(
            "lineup must hold {} to {} players, got {}",
            Role::ALL.len(),
            MAX_LINEUP,
            team.lineup.len()
        )));
    }

    let missing: Vec<&str> = Role::ALL
        .iter()
        .filter(|role| !team.lineup.iter().any(|e| e.role == **role))
        .map(Role::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::SchemaError(format!(
            "lineup does not cover: {}",
            missing.join(", ")
        )));
    }

    let mut names = HashSet::new();
    for entry in &team.lineup {
        if !names.insert(entry.name.as_str()) {
            return Err(AppError::SchemaError(format!("{} appears twice in lineup", entry.name)));
        }
        if !(0.0..=1.0).contains(&entry.confidence) {
            return Err(AppError::SchemaError(format!(
                "confidence for {} must be within 0..1, got {}",
                entry.name, entry.confidence
            )));
        }
        let stats = &entry.stats;
        for (field, value) in [("acs", stats.acs), ("kd", stats.kd), ("adr", stats.adr)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::SchemaError(format!(
                    "{} for {} must be a non-negative number, got {}",
                    field, entry.name, value
                )));
            }
        }
    }

    Ok(team)
}

pub fn parse_agent_selection(value: Value) -> Result<AgentSelection, AppError> {
    check_success_flag(&value)?;
    let selection: AgentSelection =
        serde_json::from_value(value).map_err(|e| AppError::SchemaError(e.to_string()))?;
    selection.validate()?;
    Ok(selection)
}

pub fn parse_text(value: Value) -> Result<String, AppError> {
    check_success_flag(&value)?;
    value
        .get("content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::SchemaError("missing text content".to_string()))
}
