use crate::analysis::maps::AgentSelection;
use crate::analysis::recommender::TeamComposition;
use crate::analysis::role_stats::RolePerformance;
use crate::scout::response::ScoutResponse;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RoleRow {
    rank: String,
    role: String,
    rounds: String,
    acs: String,
    adr: String,
    #[tabled(rename = "K:D")]
    kd: String,
    kast: String,
    score: String,
    confidence: String,
    players: String,
}

#[derive(Tabled)]
struct LineupRow {
    #[tabled(rename = "#")]
    number: String,
    player: String,
    agent: String,
    role: String,
    acs: String,
    #[tabled(rename = "K:D")]
    kd: String,
    adr: String,
    kast: String,
    confidence: String,
}

#[derive(Tabled)]
struct AgentRow {
    agent: String,
    role: String,
    effectiveness: String,
    reason: String,
}

fn fallback_note(is_fallback: bool) {
    if is_fallback {
        println!(
            "{}",
            "(scout AI unavailable, showing built-in analysis)".dimmed()
        );
    }
}

pub fn display_role_performance(performance: &[RolePerformance]) {
    println!("\n{}", "📊 ROLE PERFORMANCE".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if performance.is_empty() {
        println!("{}", "No role data available (no known agents in input)".yellow());
        return;
    }

    let rows: Vec<RoleRow> = performance
        .iter()
        .enumerate()
        .map(|(idx, perf)| RoleRow {
            rank: format!("#{}", idx + 1),
            role: perf.role.to_string(),
            rounds: perf.total_rounds.to_string(),
            acs: format!("{:.2}", perf.avg_acs),
            adr: format!("{:.2}", perf.avg_adr),
            kd: format!("{:.2}", perf.avg_kd),
            kast: format!("{:.2}%", perf.avg_kast),
            score: format!("{:.2}", perf.success_score),
            confidence: format!("{:.0}%", perf.confidence * 100.0),
            players: perf.players.join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!("\n{}", "Interpretation".bold().yellow());
    println!("• Score: 0.4 × ACS + 0.3 × K:D + 0.2 × ADR + 0.1 × KAST");
    println!("• Confidence: grows with sample size, full at 10 records per role\n");
}

pub fn display_team(team: &TeamComposition, is_fallback: bool) {
    println!("\n{}", "🎯 RECOMMENDED LINEUP".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    fallback_note(is_fallback);

    let rows: Vec<LineupRow> = team
        .lineup
        .iter()
        .enumerate()
        .map(|(idx, entry)| LineupRow {
            number: format!("{}", idx + 1),
            player: entry.name.clone(),
            agent: entry.agent.clone(),
            role: entry.role.to_string(),
            acs: format!("{:.0}", entry.stats.acs),
            kd: format!("{:.2}", entry.stats.kd),
            adr: format!("{:.0}", entry.stats.adr),
            kast: entry.stats.kast.to_string(),
            confidence: format!("{:.0}%", entry.confidence * 100.0),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    for entry in &team.lineup {
        if let Some(analysis) = &entry.analysis {
            println!("  {} {}", format!("{}:", entry.name).bold(), analysis);
        }
    }

    if let Some(analysis) = &team.team_analysis {
        println!("\n{}", "Team Analysis".bold().yellow());
        println!("{}", analysis);
    }
    println!();
}

pub fn display_agent_selection(map: &str, selection: &AgentSelection, is_fallback: bool) {
    println!("\n{}", format!("🗺️  AGENT PICKS FOR {}", map.to_uppercase()).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    fallback_note(is_fallback);

    let rows: Vec<AgentRow> = selection
        .recommendations
        .iter()
        .map(|rec| AgentRow {
            agent: rec.agent.clone(),
            role: rec.role.to_string(),
            effectiveness: format!("{:.0}%", rec.map_effectiveness * 100.0),
            reason: rec.reason.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if !selection.strategy_notes.is_empty() {
        println!("\n{}", "Strategy".bold().yellow());
        println!("{}\n", selection.strategy_notes);
    }
}

pub fn display_scout_response(response: &ScoutResponse) {
    match response {
        ScoutResponse::TeamComposition { team, is_fallback } => display_team(team, *is_fallback),
        ScoutResponse::AgentSelection {
            map,
            selection,
            is_fallback,
        } => display_agent_selection(map, selection, *is_fallback),
        ScoutResponse::TextResponse {
            content,
            is_fallback,
        } => {
            println!();
            fallback_note(*is_fallback);
            println!("{} {}\n", "💬".cyan(), content);
        }
        ScoutResponse::Error { message } => display_warning(message),
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_warning(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
