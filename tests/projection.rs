use std::collections::HashMap;

use slam_terminal::bracket::Bracket;
use slam_terminal::projection::{
    ROUND_POINTS, RankedPlayer, points_earned, update_rankings,
};

fn quarterfinal_draw() -> Bracket {
    Bracket::from_rounds(vec![
        vec![
            [Some(0), Some(7)],
            [Some(3), Some(4)],
            [Some(2), Some(5)],
            [Some(1), Some(6)],
        ],
        vec![[Some(0), Some(3)], [Some(2), Some(1)]],
        vec![[Some(0), Some(1)]],
    ])
}

fn roster(points: &[(u32, u32)]) -> Vec<RankedPlayer> {
    points
        .iter()
        .enumerate()
        .map(|(idx, &(points, points_dropping))| RankedPlayer {
            rank: idx as u32 + 1,
            name: format!("Player {idx}"),
            points,
            points_dropping,
        })
        .collect()
}

#[test]
fn players_are_valued_at_their_deepest_round() {
    let earned = points_earned(&quarterfinal_draw(), Some(1));
    let expected: HashMap<usize, u32> = [
        (0, 90),
        (1, 180),
        (2, 45),
        (3, 45),
        (4, 10),
        (5, 10),
        (6, 10),
        (7, 10),
    ]
    .into_iter()
    .collect();
    assert_eq!(earned, expected);
}

#[test]
fn champion_earns_the_tier_past_the_final() {
    let earned = points_earned(&quarterfinal_draw(), Some(0));
    assert_eq!(earned.get(&0), Some(&ROUND_POINTS[3]));
    // The runner-up keeps the final-round tier.
    assert_eq!(earned.get(&1), Some(&ROUND_POINTS[2]));
}

#[test]
fn champion_tier_clamps_at_maximum_depth() {
    // A 256-player draw uses all eight point tiers.
    let first_round = (0..128).map(|j| [Some(2 * j), Some(2 * j + 1)]).collect();
    let draw = Bracket::seeded(first_round);
    assert_eq!(draw.round_count(), ROUND_POINTS.len());

    let (filled, champion) = slam_terminal::engine::fill_bracket(&draw);
    assert_eq!(champion, Some(0));
    let earned = points_earned(&filled, champion);
    assert_eq!(earned.get(&0), Some(&ROUND_POINTS[7]));
}

#[test]
fn new_points_replace_dropping_with_gaining() {
    let players = roster(&[(11430, 2000), (9260, 1200), (8105, 720), (6675, 360)]);
    let draw = Bracket::from_rounds(vec![
        vec![[Some(0), Some(3)], [Some(2), Some(1)]],
        vec![[Some(0), Some(1)]],
    ]);
    let projected = update_rankings(&players, &draw, Some(0));

    assert_eq!(projected[0].points_gaining, ROUND_POINTS[2]);
    assert_eq!(projected[0].new_points, 11430 - 2000 + ROUND_POINTS[2]);
    assert_eq!(projected[1].points_gaining, ROUND_POINTS[1]);
    assert_eq!(projected[2].points_gaining, ROUND_POINTS[0]);
    assert_eq!(projected[3].points_gaining, ROUND_POINTS[0]);
    assert_eq!(projected[0].new_rank, 1);
}

#[test]
fn absent_players_gain_nothing() {
    let players = roster(&[(500, 0), (400, 0), (300, 0)]);
    let draw = Bracket::from_rounds(vec![vec![[Some(0), Some(1)]]]);
    let projected = update_rankings(&players, &draw, Some(0));
    assert_eq!(projected[2].points_gaining, 0);
    assert_eq!(projected[2].new_points, 300);
}

#[test]
fn ties_keep_roster_order() {
    let players = roster(&[(100, 0), (50, 0), (100, 0), (50, 0)]);
    let projected = update_rankings(&players, &Bracket::from_rounds(Vec::new()), None);
    let new_ranks: Vec<u32> = projected.iter().map(|p| p.new_rank).collect();
    assert_eq!(new_ranks, vec![1, 3, 2, 4]);
}

#[test]
fn dropping_more_than_held_bottoms_out_at_gaining() {
    let players = roster(&[(40, 90)]);
    let draw = Bracket::from_rounds(vec![vec![[Some(0), None]]]);
    let projected = update_rankings(&players, &draw, None);
    assert_eq!(projected[0].new_points, ROUND_POINTS[0]);
}

#[test]
fn new_rank_is_a_permutation() {
    let players = roster(&[
        (11430, 2000),
        (9260, 1200),
        (8105, 720),
        (6675, 360),
        (5440, 720),
        (4885, 180),
        (4320, 360),
        (3895, 90),
    ]);
    let projected = update_rankings(&players, &quarterfinal_draw(), Some(1));
    let mut new_ranks: Vec<u32> = projected.iter().map(|p| p.new_rank).collect();
    new_ranks.sort_unstable();
    assert_eq!(new_ranks, (1..=8).collect::<Vec<u32>>());
}
