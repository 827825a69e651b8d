use std::fs;
use std::path::PathBuf;

use slam_terminal::bracket::Modification;
use slam_terminal::persist::TournamentFile;
use slam_terminal::rankings_fetch::parse_live_rankings_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn modification_shapes_round_trip() {
    let raw = r#"[{"winner": 1}, {"playerId": 7, "toRound": 1}]"#;
    let mods: Vec<Modification> = serde_json::from_str(raw).expect("shapes should parse");
    assert_eq!(
        mods,
        vec![
            Modification::Champion { winner: 1 },
            Modification::Advance { player_id: 7, to_round: 1 },
        ]
    );

    let value = serde_json::to_value(&mods).expect("shapes should serialize");
    assert_eq!(
        value,
        serde_json::json!([{ "winner": 1 }, { "playerId": 7, "toRound": 1 }])
    );
}

#[test]
fn parses_tournament_fixture() {
    let raw = read_fixture("quarterfinal_draw.json");
    let file: TournamentFile = serde_json::from_str(&raw).expect("fixture should parse");
    assert_eq!(file.name, "Sample Slam");
    assert_eq!(file.players.len(), 8);
    assert_eq!(file.players[0].name, "A. Stone");
    assert_eq!(file.players[0].points_dropping, 2000);
    assert_eq!(file.matches.round_count(), 3);
    assert_eq!(file.matches.rounds[0][0], [Some(0), Some(7)]);
    assert!(file.matches.is_fully_resolved());
}

#[test]
fn null_slots_parse_as_empty() {
    let raw = read_fixture("quarterfinal_draw_unplayed.json");
    let file: TournamentFile = serde_json::from_str(&raw).expect("fixture should parse");
    assert_eq!(file.matches.rounds[1], vec![[None, None], [None, None]]);
    assert_eq!(file.matches.rounds[2], vec![[None, None]]);
    assert!(!file.matches.is_fully_resolved());
}

#[test]
fn bracket_serializes_as_bare_arrays() {
    let raw = read_fixture("quarterfinal_draw.json");
    let file: TournamentFile = serde_json::from_str(&raw).expect("fixture should parse");
    let value = serde_json::to_value(&file.matches).expect("bracket should serialize");
    assert_eq!(value[2], serde_json::json!([[0, 1]]));
}

#[test]
fn parses_live_rankings_fixture() {
    let raw = read_fixture("live_rankings.json");
    let rows = parse_live_rankings_json(&raw).expect("fixture should parse");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].name, "A. Stone");
    assert_eq!(rows[0].points_dropping, 1800);
    // The dropping column is optional.
    assert_eq!(rows[1].points_dropping, 0);
}

#[test]
fn live_rankings_null_is_empty() {
    assert!(
        parse_live_rankings_json("null")
            .expect("null should parse")
            .is_empty()
    );
    assert!(
        parse_live_rankings_json("  ")
            .expect("blank should parse")
            .is_empty()
    );
}
