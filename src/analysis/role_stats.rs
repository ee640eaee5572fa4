use super::roles::{Role, RoleTable};
use crate::api::models::{PlayerData, PlayerStatRecord};
use serde::Serialize;

const ACS_WEIGHT: f64 = 0.4;
const KD_WEIGHT: f64 = 0.3;
const ADR_WEIGHT: f64 = 0.2;
const KAST_WEIGHT: f64 = 0.1;

/// Record count at which a role's confidence saturates at 1.0.
const CONFIDENCE_SAMPLES: f64 = 10.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct RoleStats {
    pub role: Role,
    pub rounds: u64,
    pub acs: f64,
    pub adr: f64,
    pub kd: f64,
    pub kast: f64,
    pub kpr: f64,
    pub apr: f64,
    pub kpr_count: usize,
    pub apr_count: usize,
    pub count: usize,
    pub players: Vec<String>, // first-contribution order
}

impl RoleStats {
    pub fn new(role: Role) -> Self {
        RoleStats {
            role,
            rounds: 0,
            acs: 0.0,
            adr: 0.0,
            kd: 0.0,
            kast: 0.0,
            kpr: 0.0,
            apr: 0.0,
            kpr_count: 0,
            apr_count: 0,
            count: 0,
            players: Vec::new(),
        }
    }

    fn add_record(&mut self, player: &str, record: &PlayerStatRecord) {
        self.rounds += u64::from(record.rounds_played);
        self.acs += record.acs;
        self.adr += record.adr;
        self.kd += record.kd;
        self.kast += record.kast.value();
        if let Some(kpr) = record.kpr {
            self.kpr += kpr;
            self.kpr_count += 1;
        }
        if let Some(apr) = record.apr {
            self.apr += apr;
            self.apr_count += 1;
        }
        self.count += 1;

        if !self.players.iter().any(|p| p == player) {
            self.players.push(player.to_string());
        }
    }

    fn mean(sum: f64, count: usize) -> f64 {
        round2(sum / count as f64)
    }

    pub fn confidence(&self) -> f64 {
        round2((self.count as f64 / CONFIDENCE_SAMPLES).min(1.0))
    }

    /// `None` when no record reached this role.
    pub fn performance(&self) -> Option<RolePerformance> {
        if self.count == 0 {
            return None;
        }

        let avg_acs = Self::mean(self.acs, self.count);
        let avg_adr = Self::mean(self.adr, self.count);
        let avg_kd = Self::mean(self.kd, self.count);
        let avg_kast = Self::mean(self.kast, self.count);

        Some(RolePerformance {
            role: self.role,
            total_rounds: self.rounds,
            avg_acs,
            avg_adr,
            avg_kd,
            avg_kast,
            avg_kpr: (self.kpr_count > 0).then(|| Self::mean(self.kpr, self.kpr_count)),
            avg_apr: (self.apr_count > 0).then(|| Self::mean(self.apr, self.apr_count)),
            success_score: success_score(avg_acs, avg_kd, avg_adr, avg_kast),
            confidence: self.confidence(),
            players: self.players.clone(),
        })
    }
}

/// Weighted blend of averaged stats, favouring raw combat score.
pub fn success_score(avg_acs: f64, avg_kd: f64, avg_adr: f64, avg_kast: f64) -> f64 {
    round2(
        avg_acs * ACS_WEIGHT + avg_kd * KD_WEIGHT + avg_adr * ADR_WEIGHT + avg_kast * KAST_WEIGHT,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePerformance {
    pub role: Role,
    pub total_rounds: u64,
    pub avg_acs: f64,
    pub avg_adr: f64,
    pub avg_kd: f64,
    pub avg_kast: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_kpr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_apr: Option<f64>,
    pub success_score: f64,
    pub confidence: f64,
    pub players: Vec<String>,
}

pub struct RoleStatsTracker<'a> {
    table: &'a RoleTable,
    stats: [RoleStats; 4],
}

impl<'a> RoleStatsTracker<'a> {
    pub fn new(table: &'a RoleTable) -> Self {
        RoleStatsTracker {
            table,
            stats: Role::ALL.map(RoleStats::new),
        }
    }

    /// Returns the role the record counted towards, if any.
    pub fn add_record(&mut self, player: &str, record: &PlayerStatRecord) -> Option<Role> {
        let role = self.table.lookup(&record.agent)?;
        self.stats[role.index()].add_record(player, record);
        Some(role)
    }

    pub fn add_player(&mut self, player: &PlayerData) {
        for record in &player.stats {
            if self.add_record(&player.name, record).is_none() {
                tracing::debug!(player = %player.name, agent = %record.agent, "skipping agent with no known role");
            }
        }
    }

    /// Role summaries sorted by success score, best first. Ties keep
    /// `Role::ALL` order.
    pub fn get_performance(&self) -> Vec<RolePerformance> {
        let mut performance: Vec<RolePerformance> =
            self.stats.iter().filter_map(RoleStats::performance).collect();
        sort_by_success(&mut performance);
        performance
    }
}

pub fn sort_by_success(performance: &mut [RolePerformance]) {
    performance.sort_by(|a, b| {
        b.success_score
            .partial_cmp(&a.success_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

pub fn analyze_role_performance(players: &[PlayerData], table: &RoleTable) -> Vec<RolePerformance> {
    let mut tracker = RoleStatsTracker::new(table);
    for player in players {
        tracker.add_player(player);
    }
    tracker.get_performance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{sample_players, Kast};

    fn record(agent: &str, acs: f64, adr: f64, kd: f64, kast: f64) -> PlayerStatRecord {
        PlayerStatRecord::new(agent, 20, acs, adr, kd, Kast::new(kast).unwrap())
    }

    fn player(name: &str, stats: Vec<PlayerStatRecord>) -> PlayerData {
        PlayerData {
            name: name.to_string(),
            stats,
        }
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn averages_two_duelists() {
        let players = vec![
            player("a", vec![record("Jett", 250.0, 140.0, 1.2, 75.0)]),
            player("b", vec![record("Reyna", 280.0, 150.0, 1.5, 70.0)]),
        ];

        let result = analyze_role_performance(&players, &RoleTable::default());
        assert_eq!(result.len(), 1);

        let duelist = &result[0];
        assert_eq!(duelist.role, Role::Duelist);
        assert_eq!(duelist.total_rounds, 40);
        assert!(approx_eq(duelist.avg_acs, 265.0));
        assert!(approx_eq(duelist.avg_adr, 145.0));
        assert!(approx_eq(duelist.avg_kd, 1.35));
        assert!(approx_eq(duelist.avg_kast, 72.5));
        assert_eq!(duelist.players, vec!["a", "b"]);
    }

    #[test]
    fn means_are_rounded_to_two_decimals() {
        let players = vec![player(
            "a",
            vec![
                record("Omen", 200.0, 100.0, 1.0, 70.0),
                record("Viper", 201.0, 100.0, 1.0, 70.0),
                record("Astra", 201.0, 100.0, 1.0, 70.0),
            ],
        )];
        let result = analyze_role_performance(&players, &RoleTable::default());
        assert!(approx_eq(result[0].avg_acs, 200.67));
    }

    #[test]
    fn success_score_uses_fixed_weights() {
        assert!(approx_eq(success_score(250.0, 1.2, 140.0, 75.0), 135.86));

        let players = vec![player("a", vec![record("Jett", 250.0, 140.0, 1.2, 75.0)])];
        let result = analyze_role_performance(&players, &RoleTable::default());
        assert!(approx_eq(result[0].success_score, 135.86));
    }

    #[test]
    fn confidence_scales_then_saturates() {
        let table = RoleTable::default();
        for (count, expected) in [(3, 0.3), (10, 1.0), (15, 1.0)] {
            let stats = (0..count)
                .map(|_| record("Sage", 200.0, 120.0, 1.0, 70.0))
                .collect();
            let result = analyze_role_performance(&[player("a", stats)], &table);
            assert!(approx_eq(result[0].confidence, expected), "count {}", count);
        }
    }

    #[test]
    fn unknown_agents_contribute_nothing() {
        let players = vec![
            player("ghost", vec![record("Waylay", 400.0, 200.0, 3.0, 90.0)]),
            player("a", vec![record("Killjoy", 200.0, 120.0, 1.0, 80.0)]),
        ];
        let result = analyze_role_performance(&players, &RoleTable::default());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].role, Role::Sentinel);
        assert_eq!(result[0].players, vec!["a"]);
        assert!(result.iter().all(|r| !r.players.contains(&"ghost".to_string())));
    }

    #[test]
    fn empty_roles_are_omitted_and_roles_are_unique() {
        let result = analyze_role_performance(&sample_players(), &RoleTable::default());
        assert_eq!(result.len(), 4);
        for role in Role::ALL {
            assert_eq!(result.iter().filter(|r| r.role == role).count(), 1);
        }
        assert!(analyze_role_performance(&[], &RoleTable::default()).is_empty());
    }

    #[test]
    fn sorted_by_success_score_descending() {
        let result = analyze_role_performance(&sample_players(), &RoleTable::default());
        for pair in result.windows(2) {
            assert!(pair[0].success_score >= pair[1].success_score);
        }
        assert_eq!(result[0].role, Role::Duelist);
    }

    #[test]
    fn equal_scores_keep_role_order() {
        let players = vec![
            player("i1", vec![record("Sova", 200.0, 130.0, 1.0, 70.0)]),
            player("s1", vec![record("Sage", 200.0, 130.0, 1.0, 70.0)]),
            player("d1", vec![record("Jett", 200.0, 130.0, 1.0, 70.0)]),
            player("c1", vec![record("Omen", 200.0, 130.0, 1.0, 70.0)]),
        ];
        let perf = analyze_role_performance(&players, &RoleTable::default());

        let roles: Vec<Role> = perf.iter().map(|p| p.role).collect();
        assert_eq!(roles, Role::ALL.to_vec());
        assert!(perf.windows(2).all(|w| w[0].success_score == w[1].success_score));

        let pair = vec![
            player("i1", vec![record("Fade", 210.0, 140.0, 1.1, 72.0)]),
            player("d1", vec![record("Raze", 210.0, 140.0, 1.1, 72.0)]),
        ];
        let roles: Vec<Role> = analyze_role_performance(&pair, &RoleTable::default())
            .iter()
            .map(|p| p.role)
            .collect();
        assert_eq!(roles, vec![Role::Duelist, Role::Initiator]);
    }

    #[test]
    fn player_listed_once_per_role() {
        let players = vec![player(
            "a",
            vec![
                record("Jett", 250.0, 140.0, 1.2, 75.0),
                record("Raze", 230.0, 150.0, 1.1, 72.0),
            ],
        )];
        let result = analyze_role_performance(&players, &RoleTable::default());
        assert_eq!(result[0].players, vec!["a"]);
        assert!(approx_eq(result[0].confidence, 0.2));
    }

    #[test]
    fn extended_averages_only_cover_records_that_carry_them() {
        let mut with_kpr = record("Sova", 210.0, 135.0, 1.1, 72.0);
        with_kpr.kpr = Some(0.75);
        let players = vec![player("a", vec![with_kpr, record("Fade", 200.0, 130.0, 1.0, 70.0)])];

        let result = analyze_role_performance(&players, &RoleTable::default());
        assert_eq!(result[0].avg_kpr, Some(0.75));
        assert_eq!(result[0].avg_apr, None);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let table = RoleTable::default();
        let first = serde_json::to_string(&analyze_role_performance(&sample_players(), &table)).unwrap();
        let second = serde_json::to_string(&analyze_role_performance(&sample_players(), &table)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn custom_table_is_honoured() {
        let table = RoleTable::from_pairs([("Jett".to_string(), Role::Sentinel)]);
        let players = vec![player("a", vec![record("Jett", 250.0, 140.0, 1.2, 75.0)])];
        let result = analyze_role_performance(&players, &table);
        assert_eq!(result[0].role, Role::Sentinel);
    }
}
