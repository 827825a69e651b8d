//! Headless projection: load a tournament file, optionally a modifications
//! JSON file, and print the filled bracket plus the projected rankings.
//!
//! Usage: project <tournament.json> [modifications.json]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use slam_terminal::bracket::Modification;
use slam_terminal::engine::apply_and_fill;
use slam_terminal::persist::load_tournament;
use slam_terminal::projection::update_rankings;

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/quarterfinal_draw.json"));
    let mods_path = std::env::args().nth(2).map(PathBuf::from);

    let tournament = load_tournament(&path)?;
    let modifications: Vec<Modification> = match mods_path {
        Some(p) => {
            let raw = fs::read_to_string(&p)
                .with_context(|| format!("read modifications file {}", p.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parse modifications file {}", p.display()))?
        }
        None => Vec::new(),
    };

    let (bracket, champion) = apply_and_fill(&tournament.matches, &modifications);

    let name_of = |player: usize| {
        tournament
            .players
            .get(player)
            .map(|p| p.name.as_str())
            .unwrap_or("??")
    };

    println!("{} ({} modifications)", tournament.name, modifications.len());
    for (i, round) in bracket.rounds.iter().enumerate() {
        println!("Round {i}:");
        for m in round {
            let side = |slot: Option<usize>| match slot {
                Some(player) => name_of(player).to_string(),
                None => "--".to_string(),
            };
            println!("  {} vs {}", side(m[0]), side(m[1]));
        }
    }
    match champion {
        Some(player) => println!("Champion: {}", name_of(player)),
        None => println!("Champion: undecided"),
    }

    let projection = update_rankings(&tournament.players, &bracket, champion);
    println!();
    println!(
        "{:>4}  {:<20} {:>7} {:>9} {:>8} {:>8} {:>8}",
        "Rank", "Player", "Points", "Dropping", "Gaining", "NewPts", "NewRank"
    );
    for p in &projection {
        println!(
            "{:>4}  {:<20} {:>7} {:>9} {:>8} {:>8} {:>8}",
            p.rank, p.name, p.points, p.points_dropping, p.points_gaining, p.new_points, p.new_rank
        );
    }
    Ok(())
}
