use super::roles::Role;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecommendation {
    pub agent: String,
    pub role: Role,
    pub map_effectiveness: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSelection {
    pub recommendations: Vec<AgentRecommendation>,
    #[serde(default)]
    pub strategy_notes: String,
}

impl AgentSelection {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.recommendations.is_empty() {
            return Err(AppError::SchemaError("no agent recommendations".to_string()));
        }
        for rec in &self.recommendations {
            if rec.agent.trim().is_empty() {
                return Err(AppError::SchemaError("recommendation without an agent".to_string()));
            }
            if !(0.0..=1.0).contains(&rec.map_effectiveness) {
                return Err(AppError::SchemaError(format!(
                    "map_effectiveness for {} must be within 0..1, got {}",
                    rec.agent, rec.map_effectiveness
                )));
            }
        }
        Ok(())
    }
}

type Pick = (&'static str, Role, f64, &'static str);

struct MapPlan {
    name: &'static str,
    picks: [Pick; 5],
    notes: &'static str,
}

const MAP_PLANS: &[MapPlan] = &[
    MapPlan {
        name: "Ascent",
        picks: [
            ("Jett", Role::Duelist, 0.92, "Great mobility for mid control and OPing from market or A main"),
            ("Omen", Role::Controller, 0.90, "Strong smokes for mid control and site executes"),
            ("Killjoy", Role::Sentinel, 0.95, "Excellent for site lockdown, especially on B site"),
            ("Fade", Role::Initiator, 0.85, "Strong recon abilities for clearing site corners"),
            ("Chamber", Role::Sentinel, 0.88, "Effective at holding angles and providing info"),
        ],
        notes: "Focus on mid control which opens up options to both sites. Sentinel anchoring B is crucial.",
    },
    MapPlan {
        name: "Bind",
        picks: [
            ("Raze", Role::Duelist, 0.94, "Grenade and Boombot are perfect for close quarters and clearing hookah/bathroom"),
            ("Brimstone", Role::Controller, 0.92, "Precise smokes for site executes and post-plant situations"),
            ("Cypher", Role::Sentinel, 0.90, "Trip wires excellent for flank watch on this map with many paths"),
            ("Skye", Role::Initiator, 0.89, "Flash and scout information through tight corridors"),
            ("Viper", Role::Controller, 0.87, "Wall can effectively split sites for executes"),
        ],
        notes: "Map favors utility to clear tight spaces. Double controller can be strong for executes.",
    },
    MapPlan {
        name: "Haven",
        picks: [
            ("Phoenix", Role::Duelist, 0.87, "Flashes and wall are great for taking map control"),
            ("Astra", Role::Controller, 0.93, "Global presence helps control all three sites simultaneously"),
            ("Killjoy", Role::Sentinel, 0.89, "Strong for holding C site and delaying pushes"),
            ("Breach", Role::Initiator, 0.90, "Long corridors perfect for flashes and stuns"),
            ("Jett", Role::Duelist, 0.88, "Mobility to rotate quickly between the three sites"),
        ],
        notes: "With three sites, mid control and fast rotations are essential. Prioritize information gathering.",
    },
    MapPlan {
        name: "Breeze",
        picks: [
            ("Jett", Role::Duelist, 0.96, "Dash provides mobility across large open areas"),
            ("Viper", Role::Controller, 0.97, "Wall is essential for splitting large sites"),
            ("Chamber", Role::Sentinel, 0.95, "Teleport great for playing angles, trap for flank watch"),
            ("Sova", Role::Initiator, 0.94, "Recon dart excellent on large, open sites"),
            ("Fade", Role::Initiator, 0.88, "Haunt good for revealing multiple enemies on large sites"),
        ],
        notes: "Map favors long-range engagements. Viper is almost mandatory for site executes.",
    },
];

static DEFAULT_PLAN: MapPlan = MapPlan {
    name: "Default",
    picks: [
        ("Omen", Role::Controller, 0.85, "Versatile controller that works on most maps"),
        ("Jett", Role::Duelist, 0.83, "Mobility makes her effective on most maps"),
        ("Killjoy", Role::Sentinel, 0.82, "Strong site anchor on most maps"),
        ("Skye", Role::Initiator, 0.84, "Information gathering and flashes useful everywhere"),
        ("Sage", Role::Sentinel, 0.81, "Healing and wall provide value on any map"),
    ],
    notes: "This is a balanced team composition that should be effective on most maps.",
};

/// Static agent picks for `map`. Maps without a dedicated plan get a
/// balanced default.
pub fn recommend_agents(map: &str) -> AgentSelection {
    let plan = MAP_PLANS
        .iter()
        .find(|plan| plan.name.eq_ignore_ascii_case(map.trim()))
        .unwrap_or(&DEFAULT_PLAN);

    AgentSelection {
        recommendations: plan
            .picks
            .iter()
            .map(|&(agent, role, map_effectiveness, reason)| AgentRecommendation {
                agent: agent.to_string(),
                role,
                map_effectiveness,
                reason: reason.to_string(),
            })
            .collect(),
        strategy_notes: plan.notes.to_string(),
    }
}
