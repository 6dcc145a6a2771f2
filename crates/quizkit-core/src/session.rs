//! Session responses, summaries, and report persistence.
//!
//! The engine itself persists nothing; these types are the contract with
//! the session/scoring collaborator that accumulates score and history.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Question, SubmittedAnswer};
use crate::parser::QuestionBank;

/// Outcome of one question attempt. Created once per attempt and immutable
/// afterwards; owned by the calling session, not by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub question_id: String,
    pub correct: bool,
    /// Absent for skipped questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_answer: Option<SubmittedAnswer>,
    pub time_taken_ms: u64,
    pub points_awarded: u32,
    #[serde(default)]
    pub skipped: bool,
}

impl Response {
    /// Record a graded attempt; full points when correct, none otherwise.
    pub fn graded(
        question: &Question,
        submitted: SubmittedAnswer,
        correct: bool,
        time_taken_ms: u64,
    ) -> Self {
        Self {
            question_id: question.id().to_string(),
            correct,
            submitted_answer: Some(submitted),
            time_taken_ms,
            points_awarded: if correct { question.points() } else { 0 },
            skipped: false,
        }
    }

    /// Record a skipped question.
    pub fn skipped(question: &Question, time_taken_ms: u64) -> Self {
        Self {
            question_id: question.id().to_string(),
            correct: false,
            submitted_answer: None,
            time_taken_ms,
            points_awarded: 0,
            skipped: true,
        }
    }
}

/// Aggregate statistics over one session's responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Attempts that were actually answered (skips excluded).
    pub answered: usize,
    pub correct: usize,
    pub skipped: usize,
    /// Fraction of answered attempts that were correct.
    pub accuracy: f64,
    pub points: u64,
    /// Longest run of consecutive correct answers.
    pub best_streak: u32,
    /// Answered/correct counts keyed by question difficulty.
    pub per_difficulty: BTreeMap<u8, DifficultyStats>,
    /// Controller difficulty when the session ended.
    pub final_difficulty: u8,
}

/// Counts for one difficulty level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub answered: usize,
    pub correct: usize,
}

impl SessionSummary {
    /// Aggregate responses against the questions they were answered for.
    pub fn from_responses(
        responses: &[Response],
        questions: &[Question],
        final_difficulty: u8,
    ) -> Self {
        let difficulty_of: HashMap<&str, u8> = questions
            .iter()
            .map(|q| (q.id(), q.difficulty()))
            .collect();

        let mut answered = 0;
        let mut correct = 0;
        let mut skipped = 0;
        let mut points: u64 = 0;
        let mut best_streak: u32 = 0;
        let mut streak: u32 = 0;
        let mut per_difficulty: BTreeMap<u8, DifficultyStats> = BTreeMap::new();

        for response in responses {
            if response.skipped {
                skipped += 1;
                streak = 0;
                continue;
            }
            answered += 1;
            points += u64::from(response.points_awarded);

            if let Some(&difficulty) = difficulty_of.get(response.question_id.as_str()) {
                let stats = per_difficulty.entry(difficulty).or_default();
                stats.answered += 1;
                if response.correct {
                    stats.correct += 1;
                }
            }

            if response.correct {
                correct += 1;
                streak += 1;
                best_streak = best_streak.max(streak);
            } else {
                streak = 0;
            }
        }

        let accuracy = if answered == 0 {
            0.0
        } else {
            correct as f64 / answered as f64
        };

        Self {
            answered,
            correct,
            skipped,
            accuracy,
            points,
            best_streak,
            per_difficulty,
            final_difficulty,
        }
    }
}

/// A complete practice session report with JSON persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the bank the session ran against.
    pub bank: BankSummary,
    /// Individual responses in answer order.
    pub responses: Vec<Response>,
    /// Aggregate statistics.
    pub summary: SessionSummary,
}

/// Summary of a bank (without the full question records).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl SessionReport {
    /// Build a report from a finished session.
    pub fn new(bank: &QuestionBank, responses: Vec<Response>, final_difficulty: u8) -> Self {
        let summary = SessionSummary::from_responses(&responses, &bank.questions, final_difficulty);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary {
                id: bank.id.clone(),
                name: bank.name.clone(),
                question_count: bank.questions.len(),
            },
            responses,
            summary,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
