use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Duelist,
    Controller,
    Sentinel,
    Initiator,
}

impl Role {
    /// Required roles, in the order the lineup builder fills them.
    pub const ALL: [Role; 4] = [
        Role::Duelist,
        Role::Controller,
        Role::Sentinel,
        Role::Initiator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Duelist => "Duelist",
            Role::Controller => "Controller",
            Role::Sentinel => "Sentinel",
            Role::Initiator => "Initiator",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Role::Duelist => 0,
            Role::Controller => 1,
            Role::Sentinel => 2,
            Role::Initiator => 3,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_ROSTER: &[(&str, Role)] = &[
    ("Brimstone", Role::Controller),
    ("Viper", Role::Controller),
    ("Omen", Role::Controller),
    ("Astra", Role::Controller),
    ("Harbor", Role::Controller),
    ("Clove", Role::Controller),
    ("Sova", Role::Initiator),
    ("Breach", Role::Initiator),
    ("Skye", Role::Initiator),
    ("KAY/O", Role::Initiator),
    ("Fade", Role::Initiator),
    ("Gekko", Role::Initiator),
    ("Tejo", Role::Initiator),
    ("Killjoy", Role::Sentinel),
    ("Cypher", Role::Sentinel),
    ("Sage", Role::Sentinel),
    ("Chamber", Role::Sentinel),
    ("Deadlock", Role::Sentinel),
    ("Vyse", Role::Sentinel),
    ("Phoenix", Role::Duelist),
    ("Jett", Role::Duelist),
    ("Reyna", Role::Duelist),
    ("Raze", Role::Duelist),
    ("Yoru", Role::Duelist),
    ("Neon", Role::Duelist),
    ("Iso", Role::Duelist),
];

/// Agent name to role lookup. Agents missing from the table have no role and
/// are left out of every aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    agents: HashMap<String, Role>,
}

impl Default for RoleTable {
    fn default() -> Self {
        RoleTable::from_pairs(DEFAULT_ROSTER.iter().map(|(a, r)| (a.to_string(), *r)))
    }
}

impl RoleTable {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Role)>,
    {
        RoleTable {
            agents: pairs.into_iter().collect(),
        }
    }

    /// Loads a roster file shaped like `{"Jett": "Duelist", "Omen": "Controller"}`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read roster {}: {}", path.display(), e))
        })?;
        let agents: HashMap<String, Role> = serde_json::from_str(&content)
            .map_err(|e| AppError::JsonError(format!("Failed to parse roster: {}", e)))?;
        Ok(RoleTable { agents })
    }

    pub fn lookup(&self, agent: &str) -> Option<Role> {
        self.agents.get(agent).copied()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn agents_for(&self, role: Role) -> Vec<&str> {
        let mut agents: Vec<&str> = self
            .agents
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(a, _)| a.as_str())
            .collect();
        agents.sort_unstable();
        agents
    }
}
