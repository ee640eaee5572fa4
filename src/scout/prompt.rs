const PLAYER_KEYWORDS: &[&str] = &["player", "team", "lineup", "roster", "professional"];

const PRO_PLAYERS: &[&str] = &[
    "TenZ", "yay", "Asuna", "ShahZaM", "cNed", "ScreaM", "Boaster", "nAts",
];

/// Players used when a prompt asks about a team without naming anyone.
const DEFAULT_LINEUP_SIZE: usize = 5;

const AGENT_SELECTION_KEYWORDS: &[&str] = &[
    "agent selection",
    "which agent",
    "best agent",
    "agent for",
    "pick agent",
    "should i play",
    "agent on",
    "good agent",
    "meta agent",
    "agent meta",
];

const MAPS: &[&str] = &[
    "ascent", "bind", "breeze", "haven", "icebox", "split", "fracture", "pearl", "lotus", "sunset",
];

/// Pro players a team/lineup prompt refers to. Empty when the prompt is not
/// about players at all.
pub fn extract_player_names(prompt: &str) -> Vec<String> {
    let lower = prompt.to_lowercase();
    if !PLAYER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Vec::new();
    }

    let mentioned: Vec<String> = PRO_PLAYERS
        .iter()
        .filter(|p| lower.contains(&p.to_lowercase()))
        .map(|p| p.to_string())
        .collect();

    if mentioned.is_empty() {
        PRO_PLAYERS
            .iter()
            .take(DEFAULT_LINEUP_SIZE)
            .map(|p| p.to_string())
            .collect()
    } else {
        mentioned
    }
}

pub fn is_agent_selection_query(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    AGENT_SELECTION_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// First known map named in the prompt, capitalized (`"bind"` → `"Bind"`).
pub fn extract_map_name(prompt: &str) -> Option<String> {
    let lower = prompt.to_lowercase();
    MAPS.iter().find(|m| lower.contains(*m)).map(|m| capitalize(m))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
