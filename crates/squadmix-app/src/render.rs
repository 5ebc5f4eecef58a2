// Plain-text rendering of source rosters and generated teams.

use std::fmt::Write;

use squadmix_core::roster::SQUAD_SIZE;
use squadmix_core::{CompositeRoster, GeneratedBatch, Player, Role, Roster, Source};

use crate::franchises;

/// Badge shown next to a player: franchise abbreviation, shortened to two
/// characters when longer than three, or the side number without one.
pub fn badge(roster: &Roster, side: Source) -> String {
    match &roster.franchise {
        Some(info) => {
            let abbr = franchises::abbreviation(&info.id);
            if abbr.chars().count() > 3 {
                abbr.chars().take(2).collect()
            } else {
                abbr
            }
        }
        None => format!("T{}", side.index() + 1),
    }
}

fn captaincy_marker(player: &Player) -> &'static str {
    if player.is_captain {
        " (C)"
    } else if player.is_vice_captain {
        " (VC)"
    } else {
        ""
    }
}

/// A source roster: header with fill count, then one numbered line per player.
pub fn render_source(roster: &Roster, side: Source) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}/{})",
        roster.display_name(side),
        roster.len(),
        SQUAD_SIZE
    );
    if roster.is_empty() {
        let _ = writeln!(out, "  (no players)");
    }
    for (i, player) in roster.players.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<28} {}", i + 1, player.name, player.role);
    }
    let counts = roster.role_counts();
    let summary: Vec<String> = Role::ALL
        .iter()
        .map(|r| format!("{} {}", r.label(), counts[r.sort_order()]))
        .collect();
    let _ = writeln!(out, "  [{}]", summary.join(" | "));
    out
}

/// One generated team, players in role order.
pub fn render_team(index: usize, team: &CompositeRoster, a: &Roster, b: &Roster) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Team {}", index + 1);

    for player in team.sorted_by_role() {
        let source_badge = match player.original_source {
            Some(Source::A) => badge(a, Source::A),
            Some(Source::B) => badge(b, Source::B),
            None => "--".to_string(),
        };
        let name = format!("{}{}", player.name, captaincy_marker(player));
        let _ = writeln!(out, "  [{:<3}] {:<32} {}", source_badge, name, player.role);
    }

    let _ = writeln!(
        out,
        "  {}: {} | {}: {}",
        a.display_name(Source::A),
        team.count_from(Source::A),
        b.display_name(Source::B),
        team.count_from(Source::B)
    );
    out
}

/// Every team in the batch, separated by blank lines.
pub fn render_batch(batch: &GeneratedBatch, a: &Roster, b: &Roster) -> String {
    batch
        .iter()
        .enumerate()
        .map(|(i, team)| render_team(i, team, a, b))
        .collect::<Vec<_>>()
        .join("\n")
}
