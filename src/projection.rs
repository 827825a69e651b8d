//! Ranking projection: points earned from a bracket run and the resulting
//! next-cycle ranking table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, PlayerId};

/// Ranking points for reaching each round, indexed by round. The entry one
/// past a player's deepest round is the tier they earn by winning it, so
/// the champion of an R-round draw earns `ROUND_POINTS[R]`.
pub const ROUND_POINTS: [u32; 8] = [10, 45, 90, 180, 360, 720, 1200, 2000];

/// A roster entry from the current ranking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub rank: u32,
    pub name: String,
    pub points: u32,
    pub points_dropping: u32,
}

/// A roster entry with the projected next-cycle columns filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPlayer {
    pub rank: u32,
    pub name: String,
    pub points: u32,
    pub points_dropping: u32,
    pub points_gaining: u32,
    pub new_points: u32,
    pub new_rank: u32,
}

/// Points each player earns from this bracket. Rounds are scanned in
/// order and later rounds overwrite, so each player ends up valued at the
/// deepest round they appear in. The champion is bumped one tier past the
/// final round, clamped to the last table tier for a maximum-depth draw.
pub fn points_earned(bracket: &Bracket, champion: Option<PlayerId>) -> HashMap<PlayerId, u32> {
    let mut earned = HashMap::new();
    for (round_idx, round) in bracket.rounds.iter().enumerate() {
        let value = round_points(round_idx);
        for m in round {
            for slot in m {
                if let Some(player) = slot {
                    earned.insert(*player, value);
                }
            }
        }
    }
    if let Some(winner) = champion {
        earned.insert(winner, round_points(bracket.round_count()));
    }
    earned
}

fn round_points(round: usize) -> u32 {
    ROUND_POINTS
        .get(round)
        .copied()
        .unwrap_or(ROUND_POINTS[ROUND_POINTS.len() - 1])
}

/// Project the ranking table after this tournament. Roster index is the
/// player's bracket id. Players who never appear in a resolved slot gain
/// zero. `new_rank` orders by `new_points` descending; the sort is stable,
/// so ties keep roster order.
pub fn update_rankings(
    players: &[RankedPlayer],
    bracket: &Bracket,
    champion: Option<PlayerId>,
) -> Vec<ProjectedPlayer> {
    let earned = points_earned(bracket, champion);
    let mut projected: Vec<ProjectedPlayer> = players
        .iter()
        .enumerate()
        .map(|(id, player)| {
            let points_gaining = earned.get(&id).copied().unwrap_or(0);
            let new_points =
                player.points.saturating_sub(player.points_dropping) + points_gaining;
            ProjectedPlayer {
                rank: player.rank,
                name: player.name.clone(),
                points: player.points,
                points_dropping: player.points_dropping,
                points_gaining,
                new_points,
                new_rank: 0,
            }
        })
        .collect();

    let mut order: Vec<usize> = (0..projected.len()).collect();
    order.sort_by_key(|&idx| std::cmp::Reverse(projected[idx].new_points));
    for (position, idx) in order.into_iter().enumerate() {
        projected[idx].new_rank = (position + 1) as u32;
    }
    projected
}
