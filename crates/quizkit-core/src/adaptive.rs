//! Adaptive difficulty selection.
//!
//! One [`AdaptiveController`] per practice session, owned and driven by the
//! caller: `select_next` picks the question to present, the outcome of
//! evaluating the user's answer feeds back through `on_answer`, and the
//! difficulty walks up on streaks and down on misses. The caller owns the
//! feedback-display delay between the two calls; the controller only guards
//! against double submission with a lock and a debounce window.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Question, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Tunable policy constants, with the defaults the engine ships with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Consecutive correct answers required before the difficulty rises.
    pub streak_to_advance: u32,
    /// Window after an applied answer during which further answers for the
    /// same session are dropped.
    pub debounce_ms: u64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            streak_to_advance: 3,
            debounce_ms: 2000,
        }
    }
}

/// What happened to an `on_answer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was recorded and the streak/difficulty policy applied.
    Applied,
    /// Dropped by the lock or the debounce window; not an error, the caller
    /// may simply try again after the next selection.
    Ignored,
}

impl AnswerOutcome {
    pub fn is_applied(self) -> bool {
        self == AnswerOutcome::Applied
    }
}

/// Per-session selection state. Single-threaded; concurrent submissions are
/// serialized by the lock, and abandoning a session is just dropping the
/// controller.
#[derive(Debug, Clone)]
pub struct AdaptiveController {
    config: AdaptiveConfig,
    difficulty: u8,
    streak: u32,
    answered: HashSet<String>,
    last_answer_ms: Option<u64>,
    locked: bool,
}

impl Default for AdaptiveController {
    fn default() -> Self {
        Self::new(AdaptiveConfig::default())
    }
}

impl AdaptiveController {
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            difficulty: MIN_DIFFICULTY,
            streak: 0,
            answered: HashSet::new(),
            last_answer_ms: None,
            locked: false,
        }
    }

    /// Current difficulty level, 1 through 4.
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Consecutive correct answers since the last miss or difficulty change.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Whether a selection is pending after an applied answer.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Questions answered so far this session.
    pub fn answered_count(&self) -> usize {
        self.answered.len()
    }

    /// Pick the next question to present, uniformly at random from the
    /// preferred pool, and release the submission lock.
    ///
    /// Pool preference: unanswered questions at exactly the current
    /// difficulty; else unanswered questions at the numerically closest
    /// difficulty (ties broken toward the first such difficulty
    /// encountered). When every question has been answered the session
    /// state resets and selection repeats against the full bank, so a
    /// session never runs dry. Returns `None` only for an empty bank.
    pub fn select_next<'a, R: Rng + ?Sized>(
        &mut self,
        questions: &'a [Question],
        rng: &mut R,
    ) -> Option<&'a Question> {
        self.locked = false;
        if questions.is_empty() {
            return None;
        }

        let mut pool = self.available(questions);
        if pool.is_empty() {
            tracing::debug!("question pool exhausted, restarting session rotation");
            self.answered.clear();
            self.difficulty = MIN_DIFFICULTY;
            self.streak = 0;
            pool = self.available(questions);
        }
        pool.choose(rng).copied()
    }

    fn available<'a>(&self, questions: &'a [Question]) -> Vec<&'a Question> {
        let exact: Vec<&Question> = questions
            .iter()
            .filter(|q| q.difficulty() == self.difficulty && !self.answered.contains(q.id()))
            .collect();
        if !exact.is_empty() {
            return exact;
        }

        let unanswered: Vec<&Question> = questions
            .iter()
            .filter(|q| !self.answered.contains(q.id()))
            .collect();
        if unanswered.is_empty() {
            return Vec::new();
        }

        // Distinct difficulties in encounter order; the first one wins ties.
        let mut difficulties: Vec<u8> = Vec::new();
        for q in &unanswered {
            if !difficulties.contains(&q.difficulty()) {
                difficulties.push(q.difficulty());
            }
        }
        let distance = |d: u8| (i16::from(d) - i16::from(self.difficulty)).abs();
        let closest = difficulties
            .iter()
            .copied()
            .reduce(|prev, curr| if distance(curr) < distance(prev) { curr } else { prev })
            .expect("unanswered pool is non-empty");

        unanswered
            .into_iter()
            .filter(|q| q.difficulty() == closest)
            .collect()
    }

    /// Record the outcome of an answer at the caller's monotonic timestamp.
    ///
    /// Dropped (`Ignored`) while locked or within the debounce window of the
    /// previous applied answer. Otherwise the question is marked answered,
    /// the streak/difficulty policy runs, and the controller locks until the
    /// next `select_next`.
    pub fn on_answer(&mut self, correct: bool, question_id: &str, now_ms: u64) -> AnswerOutcome {
        if self.locked {
            return AnswerOutcome::Ignored;
        }
        if let Some(last) = self.last_answer_ms {
            if now_ms.saturating_sub(last) < self.config.debounce_ms {
                return AnswerOutcome::Ignored;
            }
        }

        self.locked = true;
        self.last_answer_ms = Some(now_ms);
        self.answered.insert(question_id.to_string());

        if correct {
            self.streak += 1;
            if self.streak >= self.config.streak_to_advance {
                let raised = (self.difficulty + 1).min(MAX_DIFFICULTY);
                tracing::debug!(from = self.difficulty, to = raised, "difficulty raised");
                self.difficulty = raised;
                self.streak = 0;
            }
        } else {
            let lowered = self.difficulty.saturating_sub(1).max(MIN_DIFFICULTY);
            tracing::debug!(from = self.difficulty, to = lowered, "difficulty lowered");
            self.difficulty = lowered;
            self.streak = 0;
        }

        AnswerOutcome::Applied
    }

    /// Return to the initial session state.
    pub fn reset(&mut self) {
        self.difficulty = MIN_DIFFICULTY;
        self.streak = 0;
        self.answered.clear();
        self.last_answer_ms = None;
        self.locked = false;
    }
}
