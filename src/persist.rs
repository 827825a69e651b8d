//! Tournament data files and the on-disk session cache. The session cache
//! keeps each tournament's modification list so an interrupted what-if
//! session picks up where it left off.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bracket::{Bracket, Modification};
use crate::projection::RankedPlayer;
use crate::state::AppState;

const CACHE_DIR: &str = "slam_terminal";
const CACHE_FILE: &str = "session.json";
const CACHE_VERSION: u32 = 1;

/// The JSON shape of a tournament file: the roster in ranking order and
/// the draw, with `players[i]` being bracket id `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentFile {
    #[serde(default)]
    pub name: String,
    pub players: Vec<RankedPlayer>,
    pub matches: Bracket,
}

pub fn load_tournament(path: &Path) -> Result<TournamentFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read tournament file {}", path.display()))?;
    let mut file: TournamentFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse tournament file {}", path.display()))?;
    if file.matches.rounds.is_empty() {
        anyhow::bail!("tournament file {} has no rounds", path.display());
    }
    if file.name.is_empty() {
        file.name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("tournament")
            .to_string();
    }
    Ok(file)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    version: u32,
    tournaments: HashMap<String, Vec<Modification>>,
}

pub fn load_into_state(state: &mut AppState) {
    let Some(path) = session_path() else {
        return;
    };
    let Ok(raw) = fs::read_to_string(&path) else {
        return;
    };
    let Ok(session) = serde_json::from_str::<SessionFile>(&raw) else {
        return;
    };
    if session.version != CACHE_VERSION {
        return;
    }
    let Some(modifications) = session.tournaments.get(&state.tournament_name) else {
        return;
    };
    if modifications.is_empty() {
        return;
    }
    state.modifications = modifications.clone();
    state.recompute();
    state.push_log(format!(
        "[INFO] Restored {} modification(s) from previous session",
        state.modifications.len()
    ));
}

pub fn save_from_state(state: &AppState) {
    let Some(path) = session_path() else {
        return;
    };
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let mut session = load_session_file(&path).unwrap_or_default();
    session.version = CACHE_VERSION;
    session
        .tournaments
        .insert(state.tournament_name.clone(), state.modifications.clone());

    if let Ok(json) = serde_json::to_string(&session) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, &path);
        }
    }
}

fn load_session_file(path: &Path) -> Option<SessionFile> {
    let raw = fs::read_to_string(path).ok()?;
    let session = serde_json::from_str::<SessionFile>(&raw).ok()?;
    if session.version != CACHE_VERSION {
        return None;
    }
    Some(session)
}

fn session_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}
