use std::collections::VecDeque;
use std::time::SystemTime;

use crate::bracket::{Bracket, Modification, PlayerId, parent_slot};
use crate::engine::apply_and_fill;
use crate::projection::{ProjectedPlayer, RankedPlayer, update_rankings};
use crate::rankings_fetch::LiveRankingRow;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Bracket,
    Rankings,
}

/// Cursor over the draw: round, match within the round, slot in the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BracketCursor {
    pub round: usize,
    pub match_idx: usize,
    pub pos: usize,
}

/// The session. `draw` stays pristine as loaded; `bracket`, `champion` and
/// `projection` are derived from scratch out of `draw` + `modifications`
/// after every change, so undo and reset are just list edits.
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub tournament_name: String,
    pub players: Vec<RankedPlayer>,
    pub draw: Bracket,
    pub modifications: Vec<Modification>,
    pub bracket: Bracket,
    pub champion: Option<PlayerId>,
    pub projection: Vec<ProjectedPlayer>,
    pub cursor: BracketCursor,
    pub rankings_selected: usize,
    pub live_fetched_at: Option<SystemTime>,
    pub live_loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        let (name, players, draw) = sample_tournament();
        Self::from_tournament(name, players, draw)
    }

    pub fn from_tournament(name: String, players: Vec<RankedPlayer>, draw: Bracket) -> Self {
        let mut state = Self {
            screen: Screen::Bracket,
            tournament_name: name,
            players,
            draw,
            modifications: Vec::new(),
            bracket: Bracket::from_rounds(Vec::new()),
            champion: None,
            projection: Vec::new(),
            cursor: BracketCursor::default(),
            rankings_selected: 0,
            live_fetched_at: None,
            live_loading: false,
            logs: VecDeque::new(),
            help_overlay: false,
        };
        state.recompute();
        state
    }

    /// Rebuild the derived view from the pristine draw and the current
    /// modification list.
    pub fn recompute(&mut self) {
        let (bracket, champion) = apply_and_fill(&self.draw, &self.modifications);
        self.projection = update_rankings(&self.players, &bracket, champion);
        self.bracket = bracket;
        self.champion = champion;
        self.clamp_cursor();
        if self.rankings_selected >= self.projection.len() {
            self.rankings_selected = self.projection.len().saturating_sub(1);
        }
    }

    pub fn player_name(&self, player: PlayerId) -> &str {
        self.players
            .get(player)
            .map(|p| p.name.as_str())
            .unwrap_or("??")
    }

    /// Turn the cursor into a modification the way clicking a name does:
    /// a final-round slot declares the champion, any other slot forces the
    /// player into the next round. Empty slots do nothing.
    pub fn advance_selected(&mut self) {
        let BracketCursor { round, match_idx, pos } = self.cursor;
        let Some(player) = self.bracket.slot(round, match_idx, pos) else {
            self.push_log("[INFO] Empty slot, nothing to advance");
            return;
        };
        let last_round = self.bracket.round_count().saturating_sub(1);
        let modification = if round == last_round {
            Modification::Champion { winner: player }
        } else {
            Modification::Advance { player_id: player, to_round: round + 1 }
        };
        self.modifications.push(modification);
        self.recompute();
        let name = self.player_name(player).to_string();
        match modification {
            Modification::Champion { .. } => {
                self.push_log(format!("[INFO] {name} declared champion"));
            }
            Modification::Advance { to_round, .. } => {
                self.push_log(format!("[INFO] {name} advanced to round {to_round}"));
            }
        }
    }

    pub fn undo_last(&mut self) {
        if self.modifications.pop().is_some() {
            self.recompute();
            self.push_log("[INFO] Last modification undone");
        } else {
            self.push_log("[INFO] Nothing to undo");
        }
    }

    pub fn reset_modifications(&mut self) {
        if self.modifications.is_empty() {
            self.push_log("[INFO] No modifications to reset");
            return;
        }
        self.modifications.clear();
        self.recompute();
        self.push_log("[INFO] Modifications cleared");
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Bracket => self.move_cursor_down(),
            Screen::Rankings => {
                if self.rankings_selected + 1 < self.projection.len() {
                    self.rankings_selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Bracket => self.move_cursor_up(),
            Screen::Rankings => {
                self.rankings_selected = self.rankings_selected.saturating_sub(1);
            }
        }
    }

    fn move_cursor_down(&mut self) {
        let slots = self.bracket.matches_in_round(self.cursor.round) * 2;
        if slots == 0 {
            return;
        }
        let linear = (self.cursor.match_idx * 2 + self.cursor.pos + 1) % slots;
        self.cursor.match_idx = linear / 2;
        self.cursor.pos = linear % 2;
    }

    fn move_cursor_up(&mut self) {
        let slots = self.bracket.matches_in_round(self.cursor.round) * 2;
        if slots == 0 {
            return;
        }
        let linear = (self.cursor.match_idx * 2 + self.cursor.pos + slots - 1) % slots;
        self.cursor.match_idx = linear / 2;
        self.cursor.pos = linear % 2;
    }

    /// Move one round later, following the slot the current match feeds.
    pub fn cursor_right(&mut self) {
        if self.cursor.round + 1 >= self.bracket.round_count() {
            return;
        }
        let (parent, pos) = parent_slot(self.cursor.match_idx);
        self.cursor.round += 1;
        self.cursor.match_idx = parent;
        self.cursor.pos = pos;
    }

    /// Move one round earlier, into the match feeding the current slot.
    pub fn cursor_left(&mut self) {
        if self.cursor.round == 0 {
            return;
        }
        self.cursor.round -= 1;
        self.cursor.match_idx = self.cursor.match_idx * 2 + self.cursor.pos;
        self.cursor.pos = 0;
    }

    fn clamp_cursor(&mut self) {
        let rounds = self.bracket.round_count();
        if rounds == 0 {
            self.cursor = BracketCursor::default();
            return;
        }
        if self.cursor.round >= rounds {
            self.cursor.round = rounds - 1;
        }
        let matches = self.bracket.matches_in_round(self.cursor.round);
        if matches == 0 {
            self.cursor.match_idx = 0;
            self.cursor.pos = 0;
        } else if self.cursor.match_idx >= matches {
            self.cursor.match_idx = matches - 1;
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push_front(line.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_back();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetLiveRankings(Vec<LiveRankingRow>),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchLiveRankings,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetLiveRankings(rows) => {
            let total = rows.len();
            let mut merged = 0usize;
            for row in rows {
                let Some(player) = state.players.iter_mut().find(|p| p.name == row.name)
                else {
                    continue;
                };
                player.rank = row.rank;
                player.points = row.points;
                if row.points_dropping > 0 {
                    // Feeds may omit the dropping column; keep the file's value then.
                    player.points_dropping = row.points_dropping;
                }
                merged += 1;
            }
            state.live_fetched_at = Some(SystemTime::now());
            state.live_loading = false;
            if merged > 0 {
                state.recompute();
            }
            state.push_log(format!(
                "[INFO] Live rankings merged for {merged} of {total} rows"
            ));
        }
        Delta::Log(line) => state.push_log(line),
    }
}

/// Built-in 8-player draw so the app runs without a tournament file.
pub fn sample_tournament() -> (String, Vec<RankedPlayer>, Bracket) {
    let players = [
        ("A. Stone", 11430, 2000),
        ("B. Vale", 9260, 1200),
        ("C. Marsh", 8105, 720),
        ("D. Ferro", 6675, 360),
        ("E. Quill", 5440, 720),
        ("F. Abara", 4885, 180),
        ("G. Lindt", 4320, 360),
        ("H. Osei", 3895, 90),
    ]
    .into_iter()
    .enumerate()
    .map(|(idx, (name, points, points_dropping))| RankedPlayer {
        rank: idx as u32 + 1,
        name: name.to_string(),
        points,
        points_dropping,
    })
    .collect();

    let draw = Bracket::seeded(vec![
        [Some(0), Some(7)],
        [Some(3), Some(4)],
        [Some(2), Some(5)],
        [Some(1), Some(6)],
    ]);

    ("Sample Slam".to_string(), players, draw)
}
