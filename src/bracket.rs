use serde::{Deserialize, Serialize};

/// Index into the tournament roster. Lower id means stronger seed.
pub type PlayerId = usize;

/// One side of a match. `None` is an undetermined slot.
pub type Slot = Option<PlayerId>;

/// The two sides of a match, in draw order.
pub type BracketMatch = [Slot; 2];

/// Where the winner of match `match_idx` advances to in the next round.
/// Returns `(parent_match, parent_pos)`.
pub fn parent_slot(match_idx: usize) -> (usize, usize) {
    (match_idx / 2, match_idx % 2)
}

/// A knockout draw as rounds of matches. Round 0 is the widest round; each
/// later round has half as many matches, down to a single final. The shape
/// never changes after construction; only slot contents do.
///
/// Serializes as the bare nested arrays (`null` = empty slot), which is the
/// shape tournament files use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bracket {
    pub rounds: Vec<Vec<BracketMatch>>,
}

impl Bracket {
    pub fn from_rounds(rounds: Vec<Vec<BracketMatch>>) -> Self {
        Self { rounds }
    }

    /// Bracket with a fully specified first round and all later rounds empty.
    pub fn seeded(first_round: Vec<BracketMatch>) -> Self {
        let mut len = first_round.len();
        let mut rounds = vec![first_round];
        while len > 1 {
            len /= 2;
            rounds.push(vec![[None, None]; len]);
        }
        Self { rounds }
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Matches in a round, 0 when out of range.
    pub fn matches_in_round(&self, round: usize) -> usize {
        self.rounds.get(round).map(|r| r.len()).unwrap_or(0)
    }

    /// Slot contents at the given coordinates, `None` when out of range.
    pub fn slot(&self, round: usize, match_idx: usize, pos: usize) -> Slot {
        self.rounds
            .get(round)
            .and_then(|r| r.get(match_idx))
            .and_then(|m| m.get(pos))
            .copied()
            .flatten()
    }

    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.rounds.last().and_then(|r| r.first())
    }

    pub fn contains_player(&self, player: PlayerId) -> bool {
        self.rounds
            .iter()
            .flatten()
            .flatten()
            .any(|slot| *slot == Some(player))
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.rounds
            .iter()
            .flatten()
            .flatten()
            .all(|slot| slot.is_some())
    }
}

/// A user override on the draw. Two wire shapes: `{"winner": n}` declares
/// the tournament champion, `{"playerId": n, "toRound": r}` forces the
/// player to win every match before round `r`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Modification {
    Champion {
        winner: PlayerId,
    },
    Advance {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        #[serde(rename = "toRound")]
        to_round: usize,
    },
}
