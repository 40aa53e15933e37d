//! Greedy lineup assignment
//!
//! Deliberately a per-slot-type greedy allocation rather than an exact
//! assignment solver: for rosters this small the result matches or nearly
//! matches optimal, and "highest scorer eligible for each slot, in order"
//! is explainable to the user. Ties in adjusted score keep original roster
//! order (stable sort), so identical inputs always produce the same lineup.

use crate::config::LineupConfig;
use crate::hashing::slot_hash;
use crate::models::{
    AdminOverrides, PlayerDetail, PlayerMeta, RosterRules, SlotKind, UserRoster, WeeklyLineup,
};
use chrono::Utc;
use ensemble_engine::{BlendedEstimate, Position, Tier};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

struct Candidate {
    player_id: String,
    position: Option<Position>,
    /// Score used for ordering; the sentinel when unplaceable
    adjusted: f64,
    /// Human-meaningful points for the per-player detail
    detail_points: f64,
    placeable: bool,
    ci_low: f64,
    ci_high: f64,
    tier: Option<Tier>,
    notes: Vec<String>,
    placed: bool,
}

/// Slot kinds a position may fill, own slot before FLEX overflow
fn preferred_slots(position: Position) -> &'static [SlotKind] {
    match position {
        Position::QB => &[SlotKind::QB],
        Position::RB => &[SlotKind::RB, SlotKind::FLEX],
        Position::WR => &[SlotKind::WR, SlotKind::FLEX],
        Position::TE => &[SlotKind::TE, SlotKind::FLEX],
        Position::K => &[SlotKind::K],
        Position::DST => &[SlotKind::DST],
    }
}

/// Assign a roster to starting slots and a bench
///
/// Always produces a lineup: per-player degradations (missing projection,
/// injury, an unplaceable forced starter) become notes in the per-player
/// detail, never failures.
pub fn assign_lineup(
    roster: &UserRoster,
    rules: &RosterRules,
    blended_by_player: &HashMap<String, BlendedEstimate>,
    overrides: &AdminOverrides,
    meta: &HashMap<String, PlayerMeta>,
    config: &LineupConfig,
) -> WeeklyLineup {
    let mut candidates = build_candidates(roster, blended_by_player, overrides, meta, config);

    let mut slots: BTreeMap<SlotKind, Vec<String>> = BTreeMap::new();
    for kind in SlotKind::ALL {
        if rules.required(kind) > 0 {
            slots.insert(kind, Vec::new());
        }
    }

    let open = |slots: &BTreeMap<SlotKind, Vec<String>>, kind: SlotKind| {
        slots.get(&kind).map(|v| v.len() < rules.required(kind)).unwrap_or(false)
    };

    // Forced starters first, in roster order
    for candidate in candidates.iter_mut() {
        if !overrides.force_start.contains(&candidate.player_id) || !candidate.placeable {
            continue;
        }
        let Some(position) = candidate.position else { continue };
        let target = preferred_slots(position).iter().copied().find(|k| open(&slots, *k));
        match target {
            Some(kind) => {
                slots.entry(kind).or_default().push(candidate.player_id.clone());
                candidate.placed = true;
            }
            None => {
                candidate
                    .notes
                    .push("forced into lineup but no eligible slot was open".to_string());
            }
        }
    }

    // Everyone else, best adjusted score first; stable sort keeps roster
    // order on ties
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .adjusted
            .partial_cmp(&candidates[a].adjusted)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Required single-position slots
    for kind in SlotKind::SINGLE_POSITION {
        for &index in &order {
            if !open(&slots, kind) {
                break;
            }
            let candidate = &mut candidates[index];
            if candidate.placed || !candidate.placeable {
                continue;
            }
            if candidate.position.map(|p| kind.accepts(p)).unwrap_or(false) {
                slots.entry(kind).or_default().push(candidate.player_id.clone());
                candidate.placed = true;
            }
        }
    }

    // FLEX: user pins ahead of score order, then the remaining pool
    if rules.flex > 0 {
        for pin in &roster.flex_pins {
            if !open(&slots, SlotKind::FLEX) {
                break;
            }
            let Some(candidate) =
                candidates.iter_mut().find(|c| &c.player_id == pin && !c.placed)
            else {
                continue;
            };
            if candidate.placeable
                && candidate.position.map(|p| SlotKind::FLEX.accepts(p)).unwrap_or(false)
            {
                slots.entry(SlotKind::FLEX).or_default().push(candidate.player_id.clone());
                candidate.placed = true;
                candidate.notes.push("pinned for FLEX".to_string());
            }
        }
        for &index in &order {
            if !open(&slots, SlotKind::FLEX) {
                break;
            }
            let candidate = &mut candidates[index];
            if candidate.placed || !candidate.placeable {
                continue;
            }
            if candidate.position.map(|p| SlotKind::FLEX.accepts(p)).unwrap_or(false) {
                slots.entry(SlotKind::FLEX).or_default().push(candidate.player_id.clone());
                candidate.placed = true;
            }
        }
    }

    // Bench is informational: best first, unplaceable players at the end
    let bench: Vec<String> = order
        .iter()
        .filter(|&&i| !candidates[i].placed)
        .map(|&i| candidates[i].player_id.clone())
        .collect();

    let total_score: f64 =
        candidates.iter().filter(|c| c.placed).map(|c| c.adjusted).sum();

    let per_player_detail: BTreeMap<String, PlayerDetail> = candidates
        .iter()
        .map(|c| {
            let note = if c.notes.is_empty() { None } else { Some(c.notes.join("; ")) };
            (
                c.player_id.clone(),
                PlayerDetail {
                    points: c.detail_points,
                    ci_low: c.ci_low,
                    ci_high: c.ci_high,
                    tier: c.tier,
                    note,
                },
            )
        })
        .collect();

    let content_hash = slot_hash(&slots);
    debug!(
        "Assigned {} starters and {} bench players for week {}",
        slots.values().map(|v| v.len()).sum::<usize>(),
        bench.len(),
        overrides.week
    );

    WeeklyLineup {
        week: overrides.week,
        slots,
        bench,
        per_player_detail,
        total_score,
        content_hash,
        computed_at: Utc::now(),
    }
}

fn build_candidates(
    roster: &UserRoster,
    blended_by_player: &HashMap<String, BlendedEstimate>,
    overrides: &AdminOverrides,
    meta: &HashMap<String, PlayerMeta>,
    config: &LineupConfig,
) -> Vec<Candidate> {
    roster
        .players
        .iter()
        .map(|player_id| {
            let mut notes = Vec::new();
            let estimate = blended_by_player.get(player_id);
            let player_meta = meta.get(player_id);

            let position = player_meta.map(|m| m.position).or_else(|| estimate.map(|e| e.position));
            if position.is_none() {
                notes.push("position unknown, cannot be placed".to_string());
            }

            let base = match estimate {
                Some(e) => e.mean,
                None => {
                    notes.push("no projection available this week".to_string());
                    0.0
                }
            };
            let delta = overrides.point_delta.get(player_id).copied().unwrap_or(0.0);
            if delta != 0.0 {
                notes.push(format!("administrator adjustment {delta:+.1}"));
            }

            let mut placeable = position.is_some();
            let mut penalty = 0.0;
            match player_meta.map(|m| m.injury_status).unwrap_or_default() {
                crate::models::InjuryStatus::Healthy => {}
                crate::models::InjuryStatus::Questionable => {
                    penalty = config.questionable_penalty;
                    notes.push("questionable".to_string());
                }
                crate::models::InjuryStatus::Doubtful => {
                    penalty = config.doubtful_penalty;
                    notes.push("doubtful".to_string());
                }
                crate::models::InjuryStatus::Out => {
                    placeable = false;
                    notes.push("ruled out".to_string());
                }
            }

            if overrides.force_sit.contains(player_id) {
                placeable = false;
                notes.push("benched by administrator".to_string());
            }

            let detail_points = base + delta + penalty;
            let adjusted = if placeable { detail_points } else { config.unplaceable_score };

            Candidate {
                player_id: player_id.clone(),
                position,
                adjusted,
                detail_points,
                placeable,
                ci_low: estimate.map(|e| e.ci_low).unwrap_or(0.0),
                ci_high: estimate.map(|e| e.ci_high).unwrap_or(0.0),
                tier: estimate.and_then(|e| e.tier),
                notes,
                placed: false,
            }
        })
        .collect()
}
