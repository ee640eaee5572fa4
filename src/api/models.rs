use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// KAST percentage, normalized to `0..=100`.
///
/// Accepts `"75%"`, `"75"` or `75` on input and always serializes as `"75%"`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "KastRepr", into = "String")]
pub struct Kast(f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum KastRepr {
    Number(f64),
    Text(String),
}

impl Kast {
    pub fn new(value: f64) -> Result<Self, AppError> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(AppError::ParseError(format!(
                "KAST must be between 0 and 100, got {}",
                value
            )));
        }
        Ok(Kast(value))
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let value: f64 = number
            .parse()
            .map_err(|_| AppError::ParseError(format!("invalid KAST value '{}'", raw)))?;
        Kast::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<KastRepr> for Kast {
    type Error = AppError;

    fn try_from(repr: KastRepr) -> Result<Self, Self::Error> {
        match repr {
            KastRepr::Number(n) => Kast::new(n),
            KastRepr::Text(s) => Kast::parse(&s),
        }
    }
}

impl From<Kast> for String {
    fn from(kast: Kast) -> Self {
        kast.to_string()
    }
}

impl fmt::Display for Kast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// Per-agent stats as served by the stats provider. The VLR-style keys are
// accepted so scraped exports load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatRecord {
    #[serde(alias = "Agent")]
    pub agent: String,
    #[serde(alias = "RoundsPlayed", alias = "Rounds Played")]
    pub rounds_played: u32,
    #[serde(alias = "ACS")]
    pub acs: f64,
    #[serde(alias = "ADR")]
    pub adr: f64,
    #[serde(alias = "KD", alias = "K:D")]
    pub kd: f64,
    #[serde(alias = "KAST")]
    pub kast: Kast,
    #[serde(default, alias = "KPR", skip_serializing_if = "Option::is_none")]
    pub kpr: Option<f64>,
    #[serde(default, alias = "APR", skip_serializing_if = "Option::is_none")]
    pub apr: Option<f64>,
}

impl PlayerStatRecord {
    pub fn new(agent: &str, rounds_played: u32, acs: f64, adr: f64, kd: f64, kast: Kast) -> Self {
        PlayerStatRecord {
            agent: agent.to_string(),
            rounds_played,
            acs,
            adr,
            kd,
            kast,
            kpr: None,
            apr: None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [
            ("acs", Some(self.acs)),
            ("adr", Some(self.adr)),
            ("kd", Some(self.kd)),
            ("kpr", self.kpr),
            ("apr", self.apr),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(AppError::ParseError(format!(
                        "{} for {} must be a non-negative number, got {}",
                        field, self.agent, v
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub name: String,
    pub stats: Vec<PlayerStatRecord>,
}

impl PlayerData {
    pub fn validate(&self) -> Result<(), AppError> {
        for stat in &self.stats {
            stat.validate()
                .map_err(|e| AppError::ParseError(format!("player {}: {}", self.name, e)))?;
        }
        Ok(())
    }
}

/// Request body understood by the scout AI service.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum AiRequest {
    AnalyzePlayers { players: Vec<PlayerData> },
    AgentSelection {
        map: String,
        #[serde(rename = "playerStats", skip_serializing_if = "Option::is_none")]
        player_stats: Option<Vec<PlayerData>>,
        #[serde(rename = "teamComposition", skip_serializing_if = "Vec::is_empty")]
        team_composition: Vec<String>,
    },
    ScoutChat { prompt: String },
}

impl AiRequest {
    pub fn action(&self) -> &'static str {
        match self {
            AiRequest::AnalyzePlayers { .. } => "analyze_players",
            AiRequest::AgentSelection { .. } => "agent_selection",
            AiRequest::ScoutChat { .. } => "scout_chat",
        }
    }
}

/// Five single-agent players for demos and offline runs.
pub fn sample_players() -> Vec<PlayerData> {
    let rows: [(&str, &str, u32, f64, f64, f64, f64); 5] = [
        ("TenZ", "Jett", 20, 250.0, 140.0, 1.2, 75.0),
        ("ShahZaM", "Sova", 25, 210.0, 135.0, 1.1, 72.0),
        ("cNed", "Viper", 22, 230.0, 130.0, 1.3, 78.0),
        ("Asuna", "Reyna", 18, 280.0, 150.0, 1.5, 70.0),
        ("yay", "Killjoy", 21, 200.0, 120.0, 1.0, 80.0),
    ];

    rows.iter()
        .map(|&(name, agent, rounds, acs, adr, kd, kast)| PlayerData {
            name: name.to_string(),
            stats: vec![PlayerStatRecord::new(
                agent,
                rounds,
                acs,
                adr,
                kd,
                Kast(kast),
            )],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kast_accepts_percent_bare_and_numeric_forms() {
        assert_eq!(Kast::parse("75%").unwrap().value(), 75.0);
        assert_eq!(Kast::parse(" 72.5 % ").unwrap().value(), 72.5);
        assert_eq!(Kast::parse("80").unwrap().value(), 80.0);

        let from_number: Kast = serde_json::from_value(json!(68)).unwrap();
        assert_eq!(from_number.value(), 68.0);
    }

    #[test]
    fn kast_rejects_garbage_and_out_of_range() {
        assert!(matches!(Kast::parse("high"), Err(AppError::ParseError(_))));
        assert!(matches!(Kast::parse("%"), Err(AppError::ParseError(_))));
        assert!(matches!(Kast::parse("NaN"), Err(AppError::ParseError(_))));
        assert!(matches!(Kast::parse("120%"), Err(AppError::ParseError(_))));
        assert!(matches!(Kast::parse("-1"), Err(AppError::ParseError(_))));
        assert!(serde_json::from_value::<Kast>(json!("n/a")).is_err());
    }

    #[test]
    fn kast_serializes_with_percent_suffix() {
        let kast = Kast::parse("72.5").unwrap();
        assert_eq!(serde_json::to_value(kast).unwrap(), json!("72.5%"));
        assert_eq!(Kast::parse("75").unwrap().to_string(), "75%");
    }

    #[test]
    fn record_reads_camel_case_and_vlr_keys() {
        let camel: PlayerStatRecord = serde_json::from_value(json!({
            "agent": "Jett", "roundsPlayed": 20, "acs": 250, "adr": 140,
            "kd": 1.2, "kast": "75%"
        }))
        .unwrap();
        let vlr: PlayerStatRecord = serde_json::from_value(json!({
            "Agent": "Jett", "RoundsPlayed": 20, "ACS": 250, "ADR": 140,
            "KD": 1.2, "KAST": "75%", "KPR": 0.8, "APR": 0.3
        }))
        .unwrap();

        assert_eq!(camel.agent, vlr.agent);
        assert_eq!(camel.kast, vlr.kast);
        assert_eq!(camel.kpr, None);
        assert_eq!(vlr.kpr, Some(0.8));
    }

    #[test]
    fn validate_rejects_negative_stats() {
        let mut record = PlayerStatRecord::new("Jett", 10, 200.0, 120.0, 1.0, Kast(70.0));
        assert!(record.validate().is_ok());

        record.kd = -0.5;
        assert!(matches!(record.validate(), Err(AppError::ParseError(_))));

        record.kd = 1.0;
        record.apr = Some(f64::INFINITY);
        assert!(record.validate().is_err());
    }

    #[test]
    fn request_body_is_tagged_by_action() {
        let body = serde_json::to_value(AiRequest::AgentSelection {
            map: "Bind".to_string(),
            player_stats: None,
            team_composition: Vec::new(),
        })
        .unwrap();
        assert_eq!(body, json!({"action": "agent_selection", "data": {"map": "Bind"}}));

        let with_context = serde_json::to_value(AiRequest::AgentSelection {
            map: "Bind".to_string(),
            player_stats: Some(sample_players()[..1].to_vec()),
            team_composition: vec!["Jett".to_string(), "Omen".to_string()],
        })
        .unwrap();
        assert_eq!(with_context["data"]["teamComposition"], json!(["Jett", "Omen"]));
        assert_eq!(with_context["data"]["playerStats"][0]["name"], json!("TenZ"));

        let chat = AiRequest::ScoutChat {
            prompt: "hi".to_string(),
        };
        assert_eq!(chat.action(), "scout_chat");
    }

    #[test]
    fn sample_players_are_valid() {
        let players = sample_players();
        assert_eq!(players.len(), 5);
        assert!(players.iter().all(|p| p.validate().is_ok()));
    }
}
