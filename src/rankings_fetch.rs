//! Live ranking feed. Pulls the current ranking table from a JSON endpoint
//! so projections start from live point totals instead of the tournament
//! file's snapshot. The endpoint comes from `LIVE_RANKINGS_URL`; when it is
//! unset the feature is simply off.

use std::env;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::state::{Delta, ProviderCommand};

/// One row of the feed. `pointsDropping` is optional; feeds that only
/// publish rank/name/points leave the tournament file's value in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveRankingRow {
    pub rank: u32,
    pub name: String,
    pub points: u32,
    #[serde(default)]
    pub points_dropping: u32,
}

pub fn parse_live_rankings_json(raw: &str) -> Result<Vec<LiveRankingRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("parse live rankings feed")
}

pub fn fetch_live_rankings(url: &str) -> Result<Vec<LiveRankingRow>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, url)?;
    parse_live_rankings_json(&body)
}

/// Worker thread answering `FetchLiveRankings` commands. With
/// `RANKINGS_POLL_SECS` set (and a URL configured) it also refreshes on its
/// own; 0 or unset disables polling.
pub fn spawn_rankings_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let url = env::var("LIVE_RANKINGS_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let poll = env::var("RANKINGS_POLL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(|secs| Duration::from_secs(secs.max(30)));
        let mut last_attempt: Option<Instant> = None;

        loop {
            let explicit = match cmd_rx.recv_timeout(Duration::from_millis(900)) {
                Ok(ProviderCommand::FetchLiveRankings) => true,
                Err(RecvTimeoutError::Timeout) => false,
                Err(RecvTimeoutError::Disconnected) => return,
            };

            let due = explicit
                || match (poll, last_attempt) {
                    (Some(interval), Some(at)) => at.elapsed() >= interval,
                    (Some(_), None) => true,
                    (None, _) => false,
                };
            if !due {
                continue;
            }

            let Some(url) = url.as_deref() else {
                if explicit {
                    let _ = tx.send(Delta::Log(
                        "[INFO] LIVE_RANKINGS_URL not set, live rankings disabled".to_string(),
                    ));
                }
                continue;
            };

            last_attempt = Some(Instant::now());
            match fetch_live_rankings(url) {
                Ok(rows) => {
                    let _ = tx.send(Delta::SetLiveRankings(rows));
                }
                Err(err) => {
                    let _ = tx.send(Delta::Log(format!("[WARN] Live rankings fetch error: {err}")));
                }
            }
        }
    });
}
