use super::role_stats::{analyze_role_performance, sort_by_success, RolePerformance};
use super::roles::{Role, RoleTable};
use crate::api::models::{Kast, PlayerData, PlayerStatRecord};
use crate::error::InsufficientDataError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

const LINEUP_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupStats {
    pub acs: f64,
    pub kd: f64,
    pub adr: f64,
    pub kast: Kast,
}

impl From<&PlayerStatRecord> for LineupStats {
    fn from(record: &PlayerStatRecord) -> Self {
        LineupStats {
            acs: record.acs,
            kd: record.kd,
            adr: record.adr,
            kast: record.kast,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub name: String,
    pub agent: String,
    pub role: Role,
    pub confidence: f64,
    pub stats: LineupStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamComposition {
    pub lineup: Vec<LineupEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_analysis: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeamRecommendation {
    Success(TeamComposition),
    Failure(InsufficientDataError),
}

impl Serialize for TeamRecommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            TeamRecommendation::Success(team) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("lineup", &team.lineup)?;
                if let Some(analysis) = &team.team_analysis {
                    map.serialize_entry("teamAnalysis", analysis)?;
                }
            }
            TeamRecommendation::Failure(reason) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", &reason.to_string())?;
            }
        }
        map.end()
    }
}

pub struct TeamRecommender;

impl TeamRecommender {
    /// One distinct player per required role in `Role::ALL` order, then
    /// backfill from the best-scoring roles until five players are placed or
    /// no unplaced contributor remains.
    pub fn recommend(players: &[PlayerData], table: &RoleTable) -> TeamRecommendation {
        match Self::build_lineup(players, table) {
            Ok(team) => TeamRecommendation::Success(team),
            Err(reason) => {
                tracing::info!(%reason, "no lineup recommendation");
                TeamRecommendation::Failure(reason)
            }
        }
    }

    fn build_lineup(
        players: &[PlayerData],
        table: &RoleTable,
    ) -> Result<TeamComposition, InsufficientDataError> {
        if players.is_empty() {
            return Err(InsufficientDataError::NoPlayers);
        }

        let performance = analyze_role_performance(players, table);
        if performance.is_empty() {
            return Err(InsufficientDataError::NotEnoughRoles);
        }

        let missing: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| !performance.iter().any(|p| p.role == *role))
            .collect();
        if !missing.is_empty() {
            return Err(InsufficientDataError::MissingRoles(missing));
        }

        let required: Vec<&RolePerformance> = Role::ALL
            .iter()
            .filter_map(|role| performance.iter().find(|p| p.role == *role))
            .collect();

        let mut chosen: Vec<&str> = Vec::with_capacity(required.len());
        if !Self::assign_required(&required, &mut chosen) {
            return Err(InsufficientDataError::NotEnoughPlayers(Self::uncovered_roles(&required)));
        }

        let mut lineup: Vec<LineupEntry> = Vec::with_capacity(LINEUP_SIZE);
        let mut placed: HashSet<String> = HashSet::new();
        for (role_perf, name) in required.iter().zip(chosen) {
            if let Some(entry) = Self::entry_for(players, role_perf, name) {
                placed.insert(entry.name.clone());
                lineup.push(entry);
            }
        }

        if lineup.len() < LINEUP_SIZE {
            let mut by_score = performance.clone();
            sort_by_success(&mut by_score);

            for role_perf in &by_score {
                if lineup.len() >= LINEUP_SIZE {
                    break;
                }
                if let Some(entry) = Self::first_available(players, role_perf, &placed) {
                    placed.insert(entry.name.clone());
                    lineup.push(entry);
                }
            }
        }

        let team_analysis = Self::summarize(&lineup, &performance);
        Ok(TeamComposition {
            lineup,
            team_analysis: Some(team_analysis),
        })
    }

    /// One distinct contributor per required role. Contributors are tried in
    /// first-contribution order; a later role that runs dry sends the search
    /// back to pick someone else for an earlier role.
    fn assign_required<'p>(required: &[&'p RolePerformance], chosen: &mut Vec<&'p str>) -> bool {
        let Some((role_perf, rest)) = required.split_first() else {
            return true;
        };
        for name in &role_perf.players {
            if chosen.contains(&name.as_str()) {
                continue;
            }
            chosen.push(name);
            if Self::assign_required(rest, chosen) {
                return true;
            }
            chosen.pop();
        }
        false
    }

    /// Roles left empty by a plain first-come pass, for the failure message.
    fn uncovered_roles(required: &[&RolePerformance]) -> Vec<Role> {
        let mut taken: HashSet<&str> = HashSet::new();
        let mut uncovered = Vec::new();
        for role_perf in required {
            match role_perf.players.iter().find(|n| !taken.contains(n.as_str())) {
                Some(name) => {
                    taken.insert(name);
                }
                None => uncovered.push(role_perf.role),
            }
        }
        uncovered
    }

    /// Lineup entry for `name` in `role_perf`, using that player's first stat record.
    fn entry_for(players: &[PlayerData], role_perf: &RolePerformance, name: &str) -> Option<LineupEntry> {
        let player = players.iter().find(|p| p.name == name)?;
        let stat = player.stats.first()?;
        Some(LineupEntry {
            name: name.to_string(),
            agent: stat.agent.clone(),
            role: role_perf.role,
            confidence: role_perf.confidence,
            stats: LineupStats::from(stat),
            analysis: None,
        })
    }

    /// First contributor of `role_perf` not yet placed.
    fn first_available(
        players: &[PlayerData],
        role_perf: &RolePerformance,
        placed: &HashSet<String>,
    ) -> Option<LineupEntry> {
        role_perf
            .players
            .iter()
            .filter(|name| !placed.contains(*name))
            .find_map(|name| Self::entry_for(players, role_perf, name))
    }

    fn summarize(lineup: &[LineupEntry], performance: &[RolePerformance]) -> String {
        let strongest = performance
            .first()
            .map(|p| format!(" Strongest role: {} (success score {:.2}).", p.role, p.success_score))
            .unwrap_or_default();
        format!(
            "Lineup of {} players covering all essential roles, built from the best available \
             role data.{}",
            lineup.len(),
            strongest
        )
    }
}

pub fn recommend_team_composition(players: &[PlayerData], table: &RoleTable) -> TeamRecommendation {
    TeamRecommender::recommend(players, table)
}
