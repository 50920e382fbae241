//! High score leaderboard and score submission
//!
//! The simulation never talks to a score server itself. The host builds a
//! `ScoreSubmission` from the last run, hands it to a `ScoreService`, and
//! feeds the boolean outcome back as `Command::HighScoreSubmitted`.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::{LevelLog, RunSummary};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Payload version understood by the score service
pub const SUBMISSION_VERSION: u32 = 2;

/// Name used when the player leaves the field blank
pub const ANONYMOUS: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            level,
            timestamp,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load a leaderboard file; a missing file is an empty board
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Shape check equivalent to `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.contains(char::is_whitespace) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Payload sent to the score service at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub level: u32,
    pub score: u64,
    pub log: Vec<LevelLog>,
    pub version: u32,
}

impl ScoreSubmission {
    /// Build a submission for a finished run.
    ///
    /// A blank name becomes `"Anonymous"`; a blank email is omitted and a
    /// malformed one is rejected.
    pub fn new(name: &str, email: &str, run: &RunSummary) -> Result<Self> {
        let name = match name.trim() {
            "" => ANONYMOUS.to_string(),
            trimmed => trimmed.to_string(),
        };
        let email = match email.trim() {
            "" => None,
            trimmed if is_valid_email(trimmed) => Some(trimmed.to_string()),
            trimmed => return Err(GameError::InvalidEmail(trimmed.to_string())),
        };
        Ok(Self {
            name,
            email,
            level: run.level,
            score: run.score,
            log: run.log.clone(),
            version: SUBMISSION_VERSION,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Score persistence collaborator; only the accept/reject outcome matters
pub trait ScoreService {
    fn submit(&mut self, submission: &ScoreSubmission) -> bool;
}

/// Score service backed by the local leaderboard.
///
/// A submission is accepted when it earns a place on the board.
#[derive(Debug, Clone, Default)]
pub struct LocalScoreService {
    pub scores: HighScores,
}

impl LocalScoreService {
    pub fn new(scores: HighScores) -> Self {
        Self { scores }
    }
}

impl ScoreService for LocalScoreService {
    fn submit(&mut self, submission: &ScoreSubmission) -> bool {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        match self
            .scores
            .add_score(&submission.name, submission.score, submission.level, timestamp)
        {
            Some(rank) => {
                log::info!("{} ranked #{} with {}", submission.name, rank, submission.score);
                true
            }
            None => {
                log::warn!("Score {} did not make the leaderboard", submission.score);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64, level: u32) -> RunSummary {
        RunSummary {
            score,
            level,
            log: vec![LevelLog {
                level: 1,
                score: score / 2,
                frame: 900,
            }],
        }
    }

    #[test]
    fn test_leaderboard_sorted_and_capped() {
        let mut scores = HighScores::new();
        for i in 1..=12u64 {
            scores.add_score("p", i * 100, 1, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(1200));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(300));
        assert!(!scores.qualifies(300));
        assert_eq!(scores.potential_rank(1250), Some(1));
        assert_eq!(scores.potential_rank(301), Some(10));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@b@c.de"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn test_submission_defaults() {
        let sub = ScoreSubmission::new("   ", "", &run(1_200, 4)).unwrap();
        assert_eq!(sub.name, ANONYMOUS);
        assert_eq!(sub.email, None);
        assert_eq!(sub.level, 4);
        assert_eq!(sub.score, 1_200);
        assert_eq!(sub.version, 2);
        assert_eq!(sub.log.len(), 1);

        let json = sub.to_json().unwrap();
        assert!(!json.contains("email"));
        assert!(json.contains("\"version\":2"));
    }

    #[test]
    fn test_submission_rejects_bad_email() {
        let err = ScoreSubmission::new("Ada", "nope", &run(10, 1)).unwrap_err();
        assert!(matches!(err, GameError::InvalidEmail(_)));

        let ok = ScoreSubmission::new(" Ada ", "ada@example.com", &run(10, 1)).unwrap();
        assert_eq!(ok.name, "Ada");
        assert_eq!(ok.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_local_service_accepts_ranked_scores() {
        let mut service = LocalScoreService::default();
        let good = ScoreSubmission::new("Ada", "", &run(500, 2)).unwrap();
        assert!(service.submit(&good));
        assert_eq!(service.scores.entries[0].name, "Ada");
        assert_eq!(service.scores.entries[0].level, 2);

        let empty = ScoreSubmission::new("Bob", "", &run(0, 1)).unwrap();
        assert!(!service.submit(&empty));
        assert_eq!(service.scores.entries.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join("phat-invaders-no-such-scores.json");
        let _ = std::fs::remove_file(&path);
        let scores = HighScores::load(&path).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("phat-invaders-scores-{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.add_score("Ada", 900, 3, 1.0);
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path).unwrap();
        assert_eq!(loaded.entries, scores.entries);
        let _ = std::fs::remove_file(&path);
    }
}
