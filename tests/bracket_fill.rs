use slam_terminal::bracket::Bracket;
use slam_terminal::engine::fill_bracket;

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

#[test]
fn resolved_bracket_is_unchanged() {
    let draw = quarterfinal_draw();
    let (filled, champion) = fill_bracket(&draw);
    assert_eq!(filled, draw);
    assert_eq!(champion, Some(0));
}

#[test]
fn fills_empty_rounds_by_seed() {
    let draw = Bracket::seeded(vec![
        [Some(0), Some(7)],
        [Some(3), Some(4)],
        [Some(2), Some(5)],
        [Some(1), Some(6)],
    ]);
    let (filled, champion) = fill_bracket(&draw);
    assert_eq!(filled.rounds[1], vec![[Some(0), Some(3)], [Some(2), Some(1)]]);
    assert_eq!(filled.rounds[2], vec![[Some(0), Some(1)]]);
    assert_eq!(champion, Some(0));
}

#[test]
fn keeps_forced_slots_and_resolves_the_rest() {
    let mut draw = quarterfinal_draw();
    draw.rounds[1] = vec![[None, Some(4)], [None, None]];
    draw.rounds[2] = vec![[None, None]];

    let (filled, champion) = fill_bracket(&draw);
    assert_eq!(filled.rounds[1], vec![[Some(0), Some(4)], [Some(2), Some(1)]]);
    assert_eq!(filled.rounds[2], vec![[Some(0), Some(1)]]);
    assert_eq!(champion, Some(0));
    assert!(filled.is_fully_resolved());
}

#[test]
fn single_occupant_match_advances_its_player() {
    let draw = Bracket::from_rounds(vec![
        vec![[Some(5), None], [Some(2), Some(3)]],
        vec![[None, None]],
    ]);
    let (filled, champion) = fill_bracket(&draw);
    assert_eq!(filled.rounds[1], vec![[Some(5), Some(2)]]);
    assert_eq!(champion, Some(2));
}

#[test]
fn input_bracket_is_not_mutated() {
    let draw = Bracket::seeded(vec![[Some(0), Some(3)], [Some(1), Some(2)]]);
    let snapshot = draw.clone();
    let _ = fill_bracket(&draw);
    assert_eq!(draw, snapshot);
}

#[test]
fn bracket_without_rounds_has_no_champion() {
    let (filled, champion) = fill_bracket(&Bracket::from_rounds(Vec::new()));
    assert!(filled.rounds.is_empty());
    assert_eq!(champion, None);
}
