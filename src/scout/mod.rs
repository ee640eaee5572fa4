//! The scouting assistant: routes a prompt to team analysis, agent selection
//! or free chat, asking the scout AI service first and answering from the
//! local algorithms whenever that fails.

pub mod fallback;
pub mod prompt;
pub mod response;

use crate::analysis::maps::recommend_agents;
use crate::analysis::recommender::{recommend_team_composition, TeamRecommendation};
use crate::analysis::roles::RoleTable;
use crate::api::client::AiBackend;
use crate::api::models::{AiRequest, PlayerData};
use crate::api::stats::{fetch_players, StatsSource};
use crate::error::AppError;
use fallback::{chat_fallback, FallbackReason};
use prompt::{extract_map_name, extract_player_names, is_agent_selection_query};
use response::{parse_agent_selection, parse_team_composition, parse_text, ScoutResponse};
use serde_json::Value;

pub struct Scout {
    backend: Option<Box<dyn AiBackend>>,
    stats: Box<dyn StatsSource>,
    table: RoleTable,
}

impl Scout {
    pub fn new(
        backend: Option<Box<dyn AiBackend>>,
        stats: Box<dyn StatsSource>,
        table: RoleTable,
    ) -> Self {
        Scout {
            backend,
            stats,
            table,
        }
    }

    fn invoke(&self, request: &AiRequest) -> Result<Value, AppError> {
        match &self.backend {
            Some(backend) => backend.invoke(request),
            None => Err(AppError::NotConfigured),
        }
    }

    pub fn ask(&self, prompt: &str) -> ScoutResponse {
        let names = extract_player_names(prompt);
        if !names.is_empty() {
            tracing::info!(players = names.len(), "routing prompt to player analysis");
            let players = fetch_players(self.stats.as_ref(), &names, |_| {});
            return self.analyze_players(players);
        }

        if is_agent_selection_query(prompt) {
            return match extract_map_name(prompt) {
                Some(map) => self.select_agents(&map, None, Vec::new()),
                None => ScoutResponse::TextResponse {
                    content: chat_fallback(prompt, &FallbackReason::MissingMap),
                    is_fallback: true,
                },
            };
        }

        self.chat(prompt)
    }

    pub fn analyze_players(&self, players: Vec<PlayerData>) -> ScoutResponse {
        // Nothing to send; the local builder reports the empty input.
        if players.is_empty() {
            return self.local_lineup(&players);
        }

        let request = AiRequest::AnalyzePlayers {
            players: players.clone(),
        };
        match self.invoke(&request).and_then(parse_team_composition) {
            Ok(team) => ScoutResponse::TeamComposition {
                team,
                is_fallback: false,
            },
            Err(e) => {
                tracing::warn!(action = request.action(), error = %e, "falling back to local lineup builder");
                self.local_lineup(&players)
            }
        }
    }

    fn local_lineup(&self, players: &[PlayerData]) -> ScoutResponse {
        match recommend_team_composition(players, &self.table) {
            TeamRecommendation::Success(team) => ScoutResponse::TeamComposition {
                team,
                is_fallback: true,
            },
            TeamRecommendation::Failure(reason) => ScoutResponse::Error {
                message: reason.to_string(),
            },
        }
    }

    /// `player_stats` and `team_composition` are passed to the service as
    /// context; the map table fallback ignores them.
    pub fn select_agents(
        &self,
        map: &str,
        player_stats: Option<Vec<PlayerData>>,
        team_composition: Vec<String>,
    ) -> ScoutResponse {
        let request = AiRequest::AgentSelection {
            map: map.to_string(),
            player_stats,
            team_composition,
        };
        let (selection, is_fallback) =
            match self.invoke(&request).and_then(parse_agent_selection) {
                Ok(selection) => (selection, false),
                Err(e) => {
                    tracing::warn!(action = request.action(), %map, error = %e, "falling back to map table");
                    (recommend_agents(map), true)
                }
            };

        ScoutResponse::AgentSelection {
            map: map.to_string(),
            selection,
            is_fallback,
        }
    }

    pub fn chat(&self, prompt: &str) -> ScoutResponse {
        let request = AiRequest::ScoutChat {
            prompt: prompt.to_string(),
        };
        match self.invoke(&request).and_then(parse_text) {
            Ok(content) => ScoutResponse::TextResponse {
                content,
                is_fallback: false,
            },
            Err(e) => {
                tracing::warn!(action = request.action(), error = %e, "falling back to canned reply");
                ScoutResponse::TextResponse {
                    content: chat_fallback(prompt, &FallbackReason::from(&e)),
                    is_fallback: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::roles::Role;
    use crate::api::models::sample_players;
    use crate::api::stats::LocalStatsSource;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays one canned outcome and records the actions it was asked for.
    struct FakeBackend {
        reply: Result<Value, AppError>,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl AiBackend for FakeBackend {
        fn invoke(&self, request: &AiRequest) -> Result<Value, AppError> {
            self.calls.borrow_mut().push(request.action());
            match &self.reply {
                Ok(v) => Ok(v.clone()),
                Err(AppError::RateLimited) => Err(AppError::RateLimited),
                Err(e) => Err(AppError::HttpError(e.to_string())),
            }
        }
    }

    fn scout_with(reply: Result<Value, AppError>) -> (Scout, Rc<RefCell<Vec<&'static str>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let backend = FakeBackend {
            reply,
            calls: Rc::clone(&calls),
        };
        let stats = LocalStatsSource::from_players(sample_players()).unwrap();
        let scout = Scout::new(Some(Box::new(backend)), Box::new(stats), RoleTable::default());
        (scout, calls)
    }

    fn offline_scout() -> Scout {
        let stats = LocalStatsSource::from_players(sample_players()).unwrap();
        Scout::new(None, Box::new(stats), RoleTable::default())
    }

    fn service_entry(name: &str, agent: &str, role: &str) -> Value {
        json!({
            "name": name, "agent": agent, "role": role, "confidence": 0.9,
            "stats": {"acs": 250, "kd": 1.2, "adr": 140, "kast": "75%"}
        })
    }

    #[test]
    fn team_prompt_uses_service_lineup_when_valid() {
        let (scout, calls) = scout_with(Ok(json!({
            "success": true,
            "lineup": [
                service_entry("TenZ", "Jett", "Duelist"),
                service_entry("cNed", "Viper", "Controller"),
                service_entry("yay", "Killjoy", "Sentinel"),
                service_entry("ShahZaM", "Sova", "Initiator"),
                service_entry("Asuna", "Reyna", "Duelist"),
            ],
            "teamAnalysis": "From the service"
        })));

        match scout.ask("Build a team with TenZ") {
            ScoutResponse::TeamComposition { team, is_fallback } => {
                assert!(!is_fallback);
                assert_eq!(team.lineup.len(), 5);
                assert_eq!(team.team_analysis.as_deref(), Some("From the service"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(*calls.borrow(), vec!["analyze_players"]);
    }

    #[test]
    fn partial_service_lineup_falls_back_to_local_builder() {
        let (scout, calls) = scout_with(Ok(json!({
            "success": true,
            "lineup": [service_entry("TenZ", "Jett", "Duelist")],
            "teamAnalysis": "One duelist is enough"
        })));

        match scout.analyze_players(sample_players()) {
            ScoutResponse::TeamComposition { team, is_fallback } => {
                assert!(is_fallback);
                assert_eq!(team.lineup.len(), 5);
                for role in Role::ALL {
                    assert!(team.lineup.iter().any(|e| e.role == role));
                }
                assert_ne!(team.team_analysis.as_deref(), Some("One duelist is enough"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(*calls.borrow(), vec!["analyze_players"]);
    }

    #[test]
    fn malformed_service_lineup_falls_back_to_local_builder() {
        let (scout, _) = scout_with(Ok(json!({"success": true, "rawAnalysis": "not json"})));

        match scout.ask("recommend a lineup") {
            ScoutResponse::TeamComposition { team, is_fallback } => {
                assert!(is_fallback);
                assert_eq!(team.lineup.len(), 5);
                assert_eq!(team.lineup[0].role, Role::Duelist);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn local_failure_surfaces_as_error_result() {
        let (scout, _) = scout_with(Err(AppError::HttpError("down".to_string())));

        match scout.ask("team with TenZ and Asuna") {
            ScoutResponse::Error { message } => assert_eq!(
                message,
                "Missing data for these essential roles: Controller, Sentinel, Initiator"
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn no_players_found_skips_the_service() {
        let (scout, calls) = scout_with(Ok(json!({})));
        let response = scout.analyze_players(Vec::new());

        assert_eq!(
            response,
            ScoutResponse::Error {
                message: "No player data available for analysis".to_string()
            }
        );
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn agent_query_falls_back_to_map_table() {
        let response = offline_scout().ask("Which agent is best on Ascent?");
        match response {
            ScoutResponse::AgentSelection {
                map,
                selection,
                is_fallback,
            } => {
                assert_eq!(map, "Ascent");
                assert!(is_fallback);
                assert_eq!(selection, recommend_agents("Ascent"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn agent_query_without_map_asks_for_one() {
        let (scout, calls) = scout_with(Ok(json!({})));
        let response = scout.ask("what's the agent meta?");
        match response {
            ScoutResponse::TextResponse { content, is_fallback } => {
                assert!(is_fallback);
                assert!(content.starts_with("Tell me which map"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn service_agent_selection_is_used_when_valid() {
        let reply = serde_json::to_value(recommend_agents("Bind")).unwrap();
        let (scout, _) = scout_with(Ok(reply));
        let response = scout.select_agents("Lotus", None, vec!["Jett".to_string()]);
        assert!(!response.is_fallback());
    }

    #[test]
    fn chat_reply_passes_through() {
        let (scout, calls) = scout_with(Ok(json!({"success": true, "content": "Play Omen."})));
        assert_eq!(
            scout.ask("How do I improve my aim?"),
            ScoutResponse::TextResponse {
                content: "Play Omen.".to_string(),
                is_fallback: false
            }
        );
        assert_eq!(*calls.borrow(), vec!["scout_chat"]);
    }

    #[test]
    fn chat_fallback_reflects_failure_kind() {
        let (scout, _) = scout_with(Err(AppError::RateLimited));
        match scout.chat("Tips for Split?") {
            ScoutResponse::TextResponse { content, is_fallback } => {
                assert!(is_fallback);
                assert!(content.contains("quota"));
                assert!(content.contains("Map strategies"));
            }
            other => panic!("unexpected {:?}", other),
        }

        match offline_scout().chat("hi") {
            ScoutResponse::TextResponse { content, .. } => {
                assert!(content.contains("configuration issues"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
