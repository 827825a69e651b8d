//! Bracket propagation: seed-priority forward fill, ordered outcome
//! overrides with cascading invalidation, and the composite of the two.
//! Every function here builds a fresh bracket and never mutates its input.

use crate::bracket::{Bracket, BracketMatch, Modification, PlayerId, Slot, parent_slot};

/// Resolve every undetermined slot from the feeding match one round below,
/// taking the numerically lower id (the stronger seed) as the winner.
/// Rounds are processed in increasing order so round `i` always reads a
/// resolved round `i - 1`. Slots that already hold a player are kept.
///
/// The returned champion is the stronger seed of the final match, `None`
/// only for a bracket with no rounds.
pub fn fill_bracket(bracket: &Bracket) -> (Bracket, Option<PlayerId>) {
    let mut out = bracket.clone();
    for i in 1..out.rounds.len() {
        for j in 0..out.rounds[i].len() {
            for k in 0..2 {
                if out.rounds[i][j][k].is_none() {
                    let feeder = out.rounds[i - 1].get(j * 2 + k).copied();
                    out.rounds[i][j][k] = feeder.and_then(seed_winner);
                }
            }
        }
    }
    let champion = out.final_match().copied().and_then(seed_winner);
    (out, champion)
}

fn seed_winner(m: BracketMatch) -> Option<PlayerId> {
    match m {
        [Some(a), Some(b)] => Some(a.min(b)),
        [Some(a), None] | [None, Some(a)] => Some(a),
        [None, None] => None,
    }
}

/// Apply overrides in list order, later entries winning conflicts. Returns
/// the reshaped bracket and the explicitly declared champion, if any entry
/// named one.
///
/// For each override, every occurrence of the player in the covered rounds
/// is advanced into its parent slot. When that displaces a different
/// player, the chain of ancestor slots still recording wins for the
/// displaced player is cleared, starting from their next win two rounds up
/// and stopping at the first slot holding someone else (an independently
/// forced lineage stays intact).
///
/// Entries naming a player absent from the bracket, or a round past the
/// final, have no matching occurrences and degrade to no-ops. Applying the
/// same list to its own output changes nothing.
pub fn apply_modifications(
    bracket: &Bracket,
    modifications: &[Modification],
) -> (Bracket, Option<PlayerId>) {
    let mut out = bracket.clone();
    let mut explicit: Option<PlayerId> = None;
    let round_count = out.rounds.len();

    for modification in modifications {
        let (player, fill_to) = match *modification {
            Modification::Champion { winner } => {
                explicit = Some(winner);
                (winner, round_count.saturating_sub(1))
            }
            Modification::Advance { player_id, to_round } => (player_id, to_round),
        };

        for i in 0..fill_to.min(round_count) {
            if i + 1 >= round_count {
                break;
            }
            for j in 0..out.rounds[i].len() {
                for k in 0..2 {
                    if out.rounds[i][j][k] != Some(player) {
                        continue;
                    }
                    let (pj, pk) = parent_slot(j);
                    let Some(parent) = out.rounds[i + 1].get_mut(pj) else {
                        continue;
                    };
                    let displaced = parent[pk];
                    parent[pk] = Some(player);
                    if displaced.is_some() && displaced != Some(player) {
                        clear_lineage(&mut out, i + 2, pj, displaced);
                    }
                }
            }
        }
    }

    (out, explicit)
}

/// Walk upward from `round`, clearing the slots where the displaced player
/// was recorded as winning. `match_idx` is the match the player was just
/// displaced from, so their next recorded win sits at that match's parent
/// slot. The first ancestor slot holding anyone else ends the walk.
fn clear_lineage(bracket: &mut Bracket, mut round: usize, mut match_idx: usize, displaced: Slot) {
    while round < bracket.rounds.len() {
        let (j, k) = parent_slot(match_idx);
        let Some(m) = bracket.rounds[round].get_mut(j) else {
            return;
        };
        if m[k] != displaced {
            return;
        }
        m[k] = None;
        match_idx = j;
        round += 1;
    }
}

/// Overrides first, then seed fill. An explicitly declared champion who is
/// no longer in the final match after all overrides is invalidated; the
/// champion is then whoever the seed fill produces.
pub fn apply_and_fill(
    bracket: &Bracket,
    modifications: &[Modification],
) -> (Bracket, Option<PlayerId>) {
    let (modified, mut explicit) = apply_modifications(bracket, modifications);
    if let Some(winner) = explicit
        && let Some(finals) = modified.final_match()
        && !finals.contains(&Some(winner))
    {
        explicit = None;
    }
    let (filled, seed_champion) = fill_bracket(&modified);
    (filled, explicit.or(seed_champion))
}
