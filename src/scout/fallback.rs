use crate::error::AppError;

/// Why the assistant is answering from its canned replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    QuotaExceeded,
    MissingBackend,
    ApiError,
    MissingMap,
    General(String),
}

impl From<&AppError> for FallbackReason {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::RateLimited => FallbackReason::QuotaExceeded,
            AppError::NotConfigured => FallbackReason::MissingBackend,
            AppError::HttpError(_) | AppError::ApiError(_) => FallbackReason::ApiError,
            other => FallbackReason::General(other.to_string()),
        }
    }
}

impl FallbackReason {
    fn lead(&self) -> String {
        match self {
            FallbackReason::QuotaExceeded => "I'm currently experiencing high demand and my AI service quota has been temporarily reached. ".to_string(),
            FallbackReason::MissingBackend => "My AI service is currently unavailable due to configuration issues. ".to_string(),
            FallbackReason::ApiError => "I'm having trouble connecting to my AI service right now. ".to_string(),
            FallbackReason::MissingMap => "Tell me which map you're playing and I can suggest agents for it. ".to_string(),
            FallbackReason::General(details) => format!(
                "I encountered an unexpected error while processing your request. Details: {} ",
                details
            ),
        }
    }
}

const AGENT_TOPICS: &[&str] = &["agent", "duelist", "controller", "initiator", "sentinel"];
const MAP_TOPICS: &[&str] = &[
    "map", "haven", "bind", "ascent", "split", "breeze", "lotus", "pearl", "sunset",
];
const PLAYER_TOPICS: &[&str] = &["player", "pro", "team", "stats", "performance"];

/// Canned chat reply: a lead chosen by failure kind, a paragraph matching the
/// prompt's topic, and a closing line.
pub fn chat_fallback(prompt: &str, reason: &FallbackReason) -> String {
    let lower = prompt.to_lowercase();
    let mentions = |topics: &[&str]| topics.iter().any(|t| lower.contains(t));

    let topic = if mentions(AGENT_TOPICS) {
        "For agent information, I recommend checking the current meta on sites like blitz.gg or valorbuff.com. Popular agents in the current meta include Jett, Fade, Skye, and Omen, but agent selection should always consider map and team composition."
    } else if mentions(MAP_TOPICS) {
        "Map strategies vary widely in Valorant. Each map has unique callouts, optimal agent compositions, and execution strategies. Consider watching professional matches on the specific map you're interested in to learn current meta strategies."
    } else if mentions(PLAYER_TOPICS) {
        "Player performance is typically measured using metrics like ACS (Average Combat Score), K/D ratio, ADR (Average Damage per Round), and KAST percentage. These statistics can be found on official VCT websites or third-party analytics platforms."
    } else {
        "While my advanced features are temporarily unavailable, you can still access basic information about Valorant agents, maps, and general strategies through the app's static content."
    };

    format!("{}{} I'll be back with my full functionality soon!", reason.lead(), topic)
}
