// URL builders for the stats provider. The scout AI service is a single
// configured endpoint and needs none.

pub const USER_AGENT: &str = "valorant_scout/0.1.0";

pub fn player_stats_url(base_url: &str, player: &str) -> String {
    format!("{}/players/{}", base_url.trim_end_matches('/'), encode_segment(player))
}

fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_player_url() {
        assert_eq!(
            player_stats_url("http://stats.local/", "TenZ"),
            "http://stats.local/players/TenZ"
        );
        assert_eq!(
            player_stats_url("http://stats.local", "Sacy 2/3"),
            "http://stats.local/players/Sacy%202%2F3"
        );
    }
}
