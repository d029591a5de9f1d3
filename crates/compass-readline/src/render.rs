//! Terminal rendering of controller state.

use colored::Colorize;
use compass_application::SessionSnapshot;
use compass_application::session::REPORT_MIN_TURNS;
use compass_core::history::{GrowthTrend, SessionRecord};
use compass_core::insight::Insight;
use compass_core::phase::Phase;
use compass_core::prompt::METHODOLOGY;
use compass_core::report::Report;
use compass_core::session::{Role, Turn};

pub fn welcome() {
    println!("{}", "=== COMPASS ===".bright_magenta().bold());
    println!(
        "{}",
        "A five-phase coaching dialogue. Type /start to begin, /history to look back, /help for commands."
            .bright_black()
    );
    println!();
    println!("{}", "Grounded in".bold());
    for (name, description) in METHODOLOGY {
        println!("  {} {}", name.bright_cyan(), description.bright_black());
    }
    println!();
}

pub fn help() {
    let rows = [
        ("/start", "Begin a new session (discards the current one)"),
        ("/report", "Generate the life-planning report (after 8 turns)"),
        ("/insight", "Show what has been learned so far"),
        ("/status", "Show phase and turn count"),
        ("/history", "Show past sessions and growth"),
        ("/home", "Back to the welcome screen"),
        ("/quit", "Exit"),
    ];
    for (name, text) in rows {
        println!("  {:<10} {}", name.bright_cyan(), text.bright_black());
    }
}

pub fn turn(turn: &Turn) {
    match turn.role {
        Role::User => println!("{}", format!("> {}", turn.text).green()),
        Role::Assistant => {
            for line in turn.text.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    println!();
}

pub fn phase_banner(phase: Phase) {
    println!(
        "{}",
        format!(
            "── Phase {} · {} · {}",
            phase.number(),
            phase.name(),
            phase.description()
        )
        .bright_magenta()
    );
}

pub fn status(snapshot: &SessionSnapshot) {
    if snapshot.session_id.is_none() {
        println!("{}", "No active session. Type /start to begin.".bright_black());
        return;
    }

    phase_banner(snapshot.phase);
    println!("  Turns: {}", snapshot.turn_count);
    if snapshot.turn_count >= REPORT_MIN_TURNS {
        println!("  {}", "Report available: /report".bright_green());
    } else {
        println!(
            "  {}",
            format!(
                "{} more turn(s) until the report",
                REPORT_MIN_TURNS - snapshot.turn_count
            )
            .bright_black()
        );
    }
}

pub fn insight(insight: &Insight) {
    if insight.is_empty() {
        println!(
            "{}",
            "No insights yet. They appear every third turn.".bright_black()
        );
        return;
    }

    if !insight.keywords.is_empty() {
        println!("  Keywords:   {}", insight.headline_keywords().join(", ").bright_yellow());
    }
    if !insight.core_value.is_empty() {
        println!("  Core value: {}", insight.core_value.bright_yellow());
    }
    for (key, value) in insight.scores.entries() {
        println!("  {:<14} {}", key, score_bar(value));
    }
    if !insight.insight.is_empty() {
        println!("  {}", insight.insight.italic());
    }
}

fn score_bar(value: u8) -> String {
    let filled = usize::from(value / 10);
    format!("{}{} {:>3}", "█".repeat(filled), "·".repeat(10 - filled), value)
}

pub fn report(report: &Report) {
    println!();
    println!("{}", report.personality_type.bright_magenta().bold());
    println!("{}", report.summary);
    println!();

    println!("{}", "Vision".bold());
    println!("  {}", report.vision.bright_blue());
    println!();

    println!("{}", "SWOT".bold());
    let swot = [
        ("Strengths", &report.swot.strengths),
        ("Weaknesses", &report.swot.weaknesses),
        ("Opportunities", &report.swot.opportunities),
        ("Threats", &report.swot.threats),
    ];
    for (label, items) in swot {
        println!("  {}: {}", label.bright_cyan(), items.join(" / "));
    }
    println!();

    println!("{}", "Roadmap".bold());
    for period in &report.roadmap {
        println!("  {} · {}", period.period.bright_cyan(), period.theme);
        for action in &period.actions {
            println!("    - {}", action);
        }
        println!("    {} {}", "Milestone:".bright_black(), period.milestone);
    }
    println!();

    println!("{}", "Top 5 actions".bold());
    for action in report.ranked_actions() {
        println!(
            "  {}. {} ({})",
            action.rank,
            action.action.bright_green(),
            action.deadline.bright_black()
        );
        println!("     {}", action.detail);
    }
    println!();

    println!("{}", report.message.italic());
    println!();
}

pub fn history(sessions: &[SessionRecord], trend: Option<&GrowthTrend>) {
    if sessions.is_empty() {
        println!("{}", "No sessions yet.".bright_black());
        return;
    }

    if let Some(trend) = trend {
        println!("{}", "Growth since last session".bold());
        for score in &trend.scores {
            let delta = match score.delta {
                d if d > 0 => format!("+{}", d).bright_green(),
                d if d < 0 => d.to_string().bright_red(),
                _ => "±0".bright_black(),
            };
            println!("  {:<14} {:>3} {}", score.key, score.latest, delta);
        }
        println!();
    }

    println!("{}", "Sessions".bold());
    for record in sessions {
        println!(
            "  {}  {:>2} turns  {}",
            record.date.bright_black(),
            record.turn_count,
            record.report.personality_type.bright_magenta()
        );
        if !record.insights.core_value.is_empty() {
            println!("      core value: {}", record.insights.core_value);
        }
    }
}
