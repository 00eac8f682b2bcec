//! High score leaderboard boundary
//!
//! The simulation only produces a (name, score, date) submission at game
//! over. Storage lives behind the `Leaderboard` trait; record ids are always
//! assigned by the store.

use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Date format used by score records: `yyyy-MM-dd HH:mm:ss`
pub const DATE_FORMAT_LEN: usize = 19;

/// A stored score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Assigned by the store, never by the client
    pub id: String,
    pub date: String,
    pub name: String,
    pub score: u64,
}

/// What the game hands to the leaderboard at game over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// The store did not respond
    Unavailable(String),
    /// The store failed to persist the record
    Storage(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "leaderboard unavailable: {reason}"),
            Self::Storage(reason) => write!(f, "leaderboard storage failed: {reason}"),
        }
    }
}

impl std::error::Error for LeaderboardError {}

/// Remote or local score store
pub trait Leaderboard {
    /// Store a score, returns the id the store assigned
    fn submit_score(
        &mut self,
        name: &str,
        score: u64,
        date: &str,
    ) -> Result<String, LeaderboardError>;

    /// All records, best first
    fn list_scores(&self) -> Vec<ScoreRecord>;
}

/// Display order: score descending, ties broken by the earlier date
pub fn compare_records(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.date.cmp(&b.date))
}

pub fn sort_records(records: &mut [ScoreRecord]) {
    records.sort_by(compare_records);
}

/// Submit and swallow failures; a failed submission drops the entry
pub fn submit_or_drop(board: &mut dyn Leaderboard, submission: &ScoreSubmission) -> Option<String> {
    match board.submit_score(&submission.name, submission.score, &submission.date) {
        Ok(id) => {
            log::info!("Score {} submitted as {}", submission.score, id);
            Some(id)
        }
        Err(e) => {
            log::warn!("Dropping score submission: {}", e);
            None
        }
    }
}

/// Leaderboard held in memory, optionally persisted as JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLeaderboard {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

impl InMemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.records.iter().map(|r| r.score).max()
    }

    /// 1-indexed position of a record in display order
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.list_scores()
            .iter()
            .position(|r| r.id == id)
            .map(|i| i + 1)
    }

    pub fn from_json(json: &str) -> Result<Self, LeaderboardError> {
        serde_json::from_str(json).map_err(|e| LeaderboardError::Storage(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, LeaderboardError> {
        serde_json::to_string_pretty(self).map_err(|e| LeaderboardError::Storage(e.to_string()))
    }

    /// Load from a file, starting fresh when it is missing or corrupt
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(board) => {
                    log::info!("Loaded {} high scores", board.len());
                    board
                }
                Err(e) => {
                    log::warn!("{}; starting fresh", e);
                    Self::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}; starting fresh", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), LeaderboardError> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| LeaderboardError::Storage(e.to_string()))?;
        log::info!("High scores saved ({} entries)", self.len());
        Ok(())
    }
}

impl Leaderboard for InMemoryLeaderboard {
    fn submit_score(
        &mut self,
        name: &str,
        score: u64,
        date: &str,
    ) -> Result<String, LeaderboardError> {
        self.next_id += 1;
        let id = format!("score-{:06}", self.next_id);
        self.records.push(ScoreRecord {
            id: id.clone(),
            date: date.to_string(),
            name: name.to_string(),
            score,
        });
        Ok(id)
    }

    fn list_scores(&self) -> Vec<ScoreRecord> {
        let mut records = self.records.clone();
        sort_records(&mut records);
        records
    }
}

/// Format a Unix timestamp (seconds, UTC) as `yyyy-MM-dd HH:mm:ss`
pub fn format_timestamp(unix_secs: u64) -> String {
    let days = (unix_secs / 86_400) as i64;
    let secs_of_day = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        secs_of_day / 3600,
        (secs_of_day / 60) % 60,
        secs_of_day % 60
    )
}

/// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian calendar
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}

/// Short display date `yyyy/MM/dd`; unparseable dates are shown as-is
pub fn short_date(date: &str) -> String {
    let bytes = date.as_bytes();
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    let well_formed = bytes.len() >= 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && digits(0..4)
        && digits(5..7)
        && digits(8..10);
    if !well_formed {
        return date.to_string();
    }
    format!("{}/{}/{}", &date[..4], &date[5..7], &date[8..10])
}
