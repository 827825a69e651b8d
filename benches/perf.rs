use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use slam_terminal::bracket::{Bracket, Modification};
use slam_terminal::engine::{apply_and_fill, apply_modifications, fill_bracket};
use slam_terminal::persist::TournamentFile;
use slam_terminal::projection::{RankedPlayer, update_rankings};
use slam_terminal::rankings_fetch::parse_live_rankings_json;

fn big_draw() -> (Vec<RankedPlayer>, Bracket) {
    let players = (0..256)
        .map(|idx| RankedPlayer {
            rank: idx as u32 + 1,
            name: format!("Player {idx}"),
            points: 8000u32.saturating_sub(idx as u32 * 30),
            points_dropping: (idx as u32 % 8) * 45,
        })
        .collect();
    let first_round = (0..128).map(|j| [Some(2 * j), Some(2 * j + 1)]).collect();
    (players, Bracket::seeded(first_round))
}

fn upset_modifications() -> Vec<Modification> {
    vec![
        Modification::Advance { player_id: 255, to_round: 4 },
        Modification::Advance { player_id: 129, to_round: 6 },
        Modification::Advance { player_id: 64, to_round: 7 },
        Modification::Champion { winner: 64 },
    ]
}

fn bench_fill(c: &mut Criterion) {
    let (_, draw) = big_draw();
    c.bench_function("fill_256_draw", |b| {
        b.iter(|| {
            let (filled, champion) = fill_bracket(black_box(&draw));
            black_box((filled.round_count(), champion));
        })
    });
}

fn bench_apply_modifications(c: &mut Criterion) {
    let (_, draw) = big_draw();
    let (filled, _) = fill_bracket(&draw);
    let mods = upset_modifications();
    c.bench_function("apply_modifications_256_draw", |b| {
        b.iter(|| {
            let (modified, winner) = apply_modifications(black_box(&filled), black_box(&mods));
            black_box((modified.round_count(), winner));
        })
    });
}

fn bench_apply_and_fill(c: &mut Criterion) {
    let (_, draw) = big_draw();
    let mods = upset_modifications();
    c.bench_function("apply_and_fill_256_draw", |b| {
        b.iter(|| {
            let (bracket, champion) = apply_and_fill(black_box(&draw), black_box(&mods));
            black_box((bracket.round_count(), champion));
        })
    });
}

fn bench_update_rankings(c: &mut Criterion) {
    let (players, draw) = big_draw();
    let (filled, champion) = fill_bracket(&draw);
    c.bench_function("update_rankings_256_players", |b| {
        b.iter(|| {
            let projected =
                update_rankings(black_box(&players), black_box(&filled), black_box(champion));
            black_box(projected.len());
        })
    });
}

fn bench_tournament_parse(c: &mut Criterion) {
    c.bench_function("tournament_parse", |b| {
        b.iter(|| {
            let file: TournamentFile =
                serde_json::from_str(black_box(DRAW_JSON)).unwrap();
            black_box(file.players.len());
        })
    });
}

fn bench_live_rankings_parse(c: &mut Criterion) {
    c.bench_function("live_rankings_parse", |b| {
        b.iter(|| {
            let rows = parse_live_rankings_json(black_box(RANKINGS_JSON)).unwrap();
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_fill,
    bench_apply_modifications,
    bench_apply_and_fill,
    bench_update_rankings,
    bench_tournament_parse,
    bench_live_rankings_parse
);
criterion_main!(perf);

static DRAW_JSON: &str = include_str!("../tests/fixtures/quarterfinal_draw.json");
static RANKINGS_JSON: &str = include_str!("../tests/fixtures/live_rankings.json");
