use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use slam_terminal::persist;
use slam_terminal::rankings_fetch::spawn_rankings_provider;
use slam_terminal::state::{self, AppState, Screen, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.screen = Screen::Bracket,
            KeyCode::Char('2') => self.state.screen = Screen::Rankings,
            KeyCode::Tab => {
                self.state.screen = match self.state.screen {
                    Screen::Bracket => Screen::Rankings,
                    Screen::Rankings => Screen::Bracket,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('h') | KeyCode::Left => {
                if self.state.screen == Screen::Bracket {
                    self.state.cursor_left();
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.state.screen == Screen::Bracket {
                    self.state.cursor_right();
                }
            }
            KeyCode::Char('a') | KeyCode::Enter => {
                if self.state.screen == Screen::Bracket {
                    self.state.advance_selected();
                }
            }
            KeyCode::Char('u') => self.state.undo_last(),
            KeyCode::Char('r') => self.state.reset_modifications(),
            KeyCode::Char('f') => self.request_live_rankings(true),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn request_live_rankings(&mut self, announce: bool) {
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log("[INFO] Live rankings fetch unavailable");
            }
            return;
        };
        if tx.send(state::ProviderCommand::FetchLiveRankings).is_err() {
            if announce {
                self.state.push_log("[WARN] Live rankings request failed");
            }
        } else {
            self.state.live_loading = true;
            if announce {
                self.state.push_log("[INFO] Live rankings request sent");
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app_state = load_initial_state();
    persist::load_into_state(&mut app_state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_rankings_provider(tx, cmd_rx);

    let mut app = App::new(app_state, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    persist::save_from_state(&app.state);

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn load_initial_state() -> AppState {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TOURNAMENT_FILE").ok())
        .map(PathBuf::from);
    let Some(path) = path else {
        let mut state = AppState::new();
        state.push_log("[INFO] No tournament file given, using sample draw");
        return state;
    };
    match persist::load_tournament(&path) {
        Ok(file) => AppState::from_tournament(file.name, file.players, file.matches),
        Err(err) => {
            let mut state = AppState::new();
            state.push_log(format!("[WARN] {err:#}, using sample draw"));
            state
        }
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Bracket => render_bracket(frame, chunks[1], &app.state),
        Screen::Rankings => render_rankings(frame, chunks[1], &app.state),
    }

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Bracket => "Bracket",
        Screen::Rankings => "Rankings",
    };
    let champion = state
        .champion
        .map(|p| state.player_name(p).to_string())
        .unwrap_or_else(|| "-".to_string());
    let line1 = format!("SLAM TERMINAL | {} | {}", state.tournament_name, screen);
    let mut line2 = format!(
        "Champion: {} | Modifications: {}",
        champion,
        state.modifications.len()
    );
    if state.live_loading {
        line2.push_str(" | Live: fetching...");
    } else if let Some(at) = state.live_fetched_at {
        let local = chrono::DateTime::<chrono::Local>::from(at);
        line2.push_str(&format!(" | Live: {}", local.format("%H:%M:%S")));
    }
    let line3 = state.logs.front().cloned().unwrap_or_default();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Bracket => {
            "1 Bracket | 2 Rankings | j/k/↑/↓ Slot | h/l/←/→ Round | Enter/a Advance | u Undo | r Reset | ? Help | q Quit"
                .to_string()
        }
        Screen::Rankings => {
            "1 Bracket | 2 Rankings | j/k/↑/↓ Move | f Fetch live | u Undo | r Reset | ? Help | q Quit"
                .to_string()
        }
    }
}

fn render_bracket(frame: &mut Frame, area: Rect, state: &AppState) {
    let rounds = state.bracket.round_count();
    if rounds == 0 {
        let empty =
            Paragraph::new("Empty bracket").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = (0..rounds)
        .map(|_| Constraint::Ratio(1, rounds as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for round in 0..rounds {
        let lines = round_column_lines(state, round, rounds);
        frame.render_widget(Paragraph::new(Text::from(lines)), cols[round]);
    }
}

fn round_column_lines(state: &AppState, round: usize, rounds: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::styled(
            round_label(round, rounds),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
    ];

    // Each round-0 match takes a 3-line cell; deeper rounds center their
    // two slot lines inside a block twice the size of the previous round's.
    let block_height = 3usize << round;
    let top_pad = (block_height - 2) / 2;
    let bottom_pad = block_height - 2 - top_pad;

    let Some(matches) = state.bracket.rounds.get(round) else {
        return lines;
    };
    for (match_idx, m) in matches.iter().enumerate() {
        for _ in 0..top_pad {
            lines.push(Line::raw(""));
        }
        for (pos, slot) in m.iter().enumerate() {
            let label = match slot {
                Some(player) => {
                    let seed = state
                        .players
                        .get(*player)
                        .map(|p| p.rank)
                        .unwrap_or(*player as u32 + 1);
                    format!(" {:>2} {}", seed, state.player_name(*player))
                }
                None => "     --".to_string(),
            };
            let mut style = Style::default();
            if round + 1 == rounds && slot.is_some() && *slot == state.champion {
                style = style.add_modifier(Modifier::BOLD);
            }
            let cursor = state.cursor;
            if cursor.round == round && cursor.match_idx == match_idx && cursor.pos == pos {
                style = style.fg(Color::White).bg(Color::DarkGray);
            }
            lines.push(Line::styled(label, style));
        }
        for _ in 0..bottom_pad {
            lines.push(Line::raw(""));
        }
    }
    lines
}

fn round_label(round: usize, rounds: usize) -> String {
    match rounds - 1 - round {
        0 => "Final".to_string(),
        1 => "Semifinals".to_string(),
        2 => "Quarterfinals".to_string(),
        _ => format!("Round {}", round + 1),
    }
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = rankings_columns();
    render_rankings_header(frame, sections[0], &widths);

    let list_area = sections[1];
    if state.projection.is_empty() {
        let empty =
            Paragraph::new("No roster loaded").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.rankings_selected, state.projection.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.rankings_selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let p = &state.projection[idx];
        let gaining_style = if p.points_gaining > 0 && !selected {
            row_style.fg(Color::Green)
        } else {
            row_style
        };
        let moved_style = if !selected && p.new_rank < p.rank {
            row_style.fg(Color::Green)
        } else if !selected && p.new_rank > p.rank {
            row_style.fg(Color::Red)
        } else {
            row_style
        };

        render_cell_text(frame, cols[0], &p.rank.to_string(), row_style);
        render_cell_text(frame, cols[1], &p.name, row_style);
        render_cell_text(frame, cols[2], &p.points.to_string(), row_style);
        render_cell_text(frame, cols[3], &p.points_dropping.to_string(), row_style);
        render_cell_text(frame, cols[4], &p.points_gaining.to_string(), gaining_style);
        render_cell_text(frame, cols[5], &p.new_points.to_string(), row_style);
        render_cell_text(frame, cols[6], &p.new_rank.to_string(), moved_style);
    }
}

fn rankings_columns() -> [Constraint; 7] {
    [
        Constraint::Length(6),
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
    ]
}

fn render_rankings_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Rank", style);
    render_cell_text(frame, cols[1], "Player", style);
    render_cell_text(frame, cols[2], "Points", style);
    render_cell_text(frame, cols[3], "Dropping", style);
    render_cell_text(frame, cols[4], "Gaining", style);
    render_cell_text(frame, cols[5], "New Pts", style);
    render_cell_text(frame, cols[6], "New Rank", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Slam Terminal - Help",
        "",
        "Global:",
        "  1 / 2        Bracket / Rankings",
        "  Tab          Switch screen",
        "  u            Undo last modification",
        "  r            Reset modifications",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Bracket:",
        "  j/k or ↑/↓   Move between slots",
        "  h/l or ←/→   Move between rounds",
        "  Enter / a    Advance selected player",
        "",
        "Rankings:",
        "  j/k or ↑/↓   Move/scroll",
        "  f            Fetch live rankings",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
