//! Tier assignment by rank quantile within each position

use crate::config::TierCuts;
use crate::models::{BlendedEstimate, Position, Tier};

/// Bucket blended estimates into tiers A through D per position
///
/// Estimates are ranked by mean descending within their position; the rank
/// fraction decides the tier. Positions with very few candidates may leave
/// the extreme tiers empty, which is expected.
pub fn assign_tiers(mut estimates: Vec<BlendedEstimate>, cuts: &TierCuts) -> Vec<BlendedEstimate> {
    for position in Position::ALL {
        let mut indices: Vec<usize> = estimates
            .iter()
            .enumerate()
            .filter(|(_, e)| e.position == position)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            continue;
        }

        indices.sort_by(|&a, &b| {
            estimates[b].mean.partial_cmp(&estimates[a].mean).unwrap_or(std::cmp::Ordering::Equal)
        });

        let count = indices.len() as f64;
        for (rank, &index) in indices.iter().enumerate() {
            let fraction = rank as f64 / count;
            estimates[index].tier = Some(if fraction < cuts.a_cut {
                Tier::A
            } else if fraction < cuts.b_cut {
                Tier::B
            } else if fraction < cuts.c_cut {
                Tier::C
            } else {
                Tier::D
            });
        }
    }
    estimates
}
