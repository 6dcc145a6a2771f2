//! Structural validation of question banks.
//!
//! Runs at load/build time, before any question reaches the evaluator or
//! the shuffle transform — both assume the invariants checked here. A
//! non-empty error list should fail the build.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::expr;
use crate::model::{
    item_index, GridConfig, OrderKey, Question, ValidationKind, MAX_DIFFICULTY, MIN_DIFFICULTY,
};
use crate::parser::QuestionBank;

/// A structural problem found in a bank.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The offending question, when attributable to one.
    pub question_id: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.question_id {
            Some(id) => write!(f, "[{id}] {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Check every question in a bank. Returns an empty list for a valid bank.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if bank.id.trim().is_empty() {
        errors.push(ValidationError {
            question_id: None,
            message: "bank is missing an id".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !q.id().is_empty() && !seen_ids.insert(q.id().to_string()) {
            errors.push(ValidationError {
                question_id: Some(q.id().to_string()),
                message: format!("duplicate question id: {}", q.id()),
            });
        }
        validate_question(q, &mut errors);
    }

    errors
}

fn validate_question(q: &Question, errors: &mut Vec<ValidationError>) {
    let id = if q.id().is_empty() {
        None
    } else {
        Some(q.id().to_string())
    };
    let mut push = |message: String| {
        errors.push(ValidationError {
            question_id: id.clone(),
            message,
        });
    };

    if q.id().trim().is_empty() {
        push("question is missing an id".into());
    }
    if q.prompt().trim().is_empty() {
        push("question is missing display text".into());
    }
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&q.difficulty()) {
        push(format!(
            "invalid difficulty {} (should be {MIN_DIFFICULTY}-{MAX_DIFFICULTY})",
            q.difficulty()
        ));
    }
    if q.points() < 1 {
        push("invalid points (should be positive)".into());
    }

    match q {
        Question::MultipleChoice(q) => {
            if q.options.len() < 2 {
                push("multiple choice question needs at least 2 options".into());
            }
            if q.correct_answers.is_empty() {
                push("multiple choice question needs at least 1 correct answer".into());
            }
            for answer in &q.correct_answers {
                if !q.options.iter().any(|o| o.content() == answer) {
                    push(format!("correct answer '{answer}' matches no option"));
                }
            }
        }

        Question::DragDrop(q) => {
            if q.items.len() < 2 {
                push("drag and drop question needs at least 2 items".into());
            }
            if q.drop_zones.is_empty() {
                push("drag and drop question needs at least 1 drop zone".into());
            }
            let mut zone_ids = HashSet::new();
            for zone in &q.drop_zones {
                if !zone_ids.insert(zone.id.as_str()) {
                    push(format!("duplicate drop zone id: {}", zone.id));
                }
                match item_index(&zone.correct_item_id) {
                    Some(index) if index < q.items.len() => {}
                    _ => push(format!(
                        "drop zone '{}' references invalid item '{}'",
                        zone.id, zone.correct_item_id
                    )),
                }
            }
        }

        Question::Graph(q) => {
            if q.correct_points.is_empty() {
                push("graph question needs at least 1 correct point".into());
            }
            check_grid(&q.grid, &mut push);
        }

        Question::Order(q) => match &q.correct_order {
            OrderKey::Direction(_) => {
                if q.numbers.len() < 2 {
                    push("order question needs at least 2 numbers".into());
                }
            }
            OrderKey::Permutation(permutation) => {
                if q.steps.len() < 2 {
                    push("step order question needs at least 2 steps".into());
                }
                if permutation.len() != q.steps.len() {
                    push("step order question has mismatched steps and correct order".into());
                } else {
                    let covered: HashSet<usize> = permutation.iter().copied().collect();
                    let valid = covered.len() == q.steps.len()
                        && covered.iter().all(|&i| i < q.steps.len());
                    if !valid {
                        push("correct order is not a permutation of the steps".into());
                    }
                }
            }
        },

        Question::FillBlank(q) => {
            if q.blanks.is_empty() {
                push("fill in blank question needs at least 1 blank".into());
            }
            let mut blank_ids = HashSet::new();
            let mut positions = HashSet::new();
            for blank in &q.blanks {
                if blank.id.trim().is_empty() || blank.answer.trim().is_empty() {
                    push(format!("invalid blank '{}'", blank.id));
                }
                if !blank_ids.insert(blank.id.as_str()) {
                    push(format!("duplicate blank id: {}", blank.id));
                }
                if !positions.insert(blank.position) {
                    push(format!("duplicate blank position: {}", blank.position));
                }
            }
            let markers = placeholder_positions(&q.question);
            if markers != positions {
                push("blank positions do not match the {n} markers in the question text".into());
            }
        }

        Question::LineMatch(q) => {
            if q.left_items.is_empty() {
                push("line match question needs items on both sides".into());
            }
            if q.left_items.len() != q.right_items.len() {
                push("line match question has mismatched left and right items".into());
            }
            if q.correct_connections.len() != q.left_items.len() {
                push("line match question has invalid connections".into());
            }
            let froms: HashSet<usize> = q.correct_connections.iter().map(|c| c.from).collect();
            let tos: HashSet<usize> = q.correct_connections.iter().map(|c| c.to).collect();
            let bijective = froms.len() == q.correct_connections.len()
                && tos.len() == q.correct_connections.len()
                && froms.iter().all(|&i| i < q.left_items.len())
                && tos.iter().all(|&i| i < q.right_items.len());
            if !q.correct_connections.is_empty() && !bijective {
                push("connections are not a bijection over the items".into());
            }
        }

        Question::QuickTap(q) => {
            if q.items.len() < 2 {
                push("quick tap question needs at least 2 items".into());
            }
            if q.time_limit < 1 {
                push("quick tap question needs a valid time limit".into());
            }
            let correct_count = q.items.iter().filter(|i| i.is_correct).count() as u32;
            if correct_count == 0 {
                push("quick tap question needs at least 1 correct item".into());
            }
            if q.min_correct < 1 || q.min_correct > correct_count {
                push(format!(
                    "invalid minimum correct count {} (question has {} correct items)",
                    q.min_correct, correct_count
                ));
            }
        }

        Question::TypeIn(q) => {
            if q.correct_answer.trim().is_empty() {
                push("type-in question is missing a correct answer".into());
            }
            if let Some(rule) = &q.validation {
                match rule.kind {
                    ValidationKind::Number => {
                        if q.correct_answer.trim().parse::<f64>().is_err() {
                            push("number validation requires a numeric correct answer".into());
                        }
                        if let (Some(min), Some(max)) = (rule.min, rule.max) {
                            if min > max {
                                push(format!("invalid numeric range {min}..{max}"));
                            }
                        }
                        if rule.tolerance.is_some_and(|t| t < 0.0) {
                            push("tolerance must not be negative".into());
                        }
                    }
                    ValidationKind::Text => {
                        if let Some(pattern) = &rule.pattern {
                            if Regex::new(pattern).is_err() {
                                push(format!("invalid validation pattern: {pattern}"));
                            }
                        }
                    }
                    ValidationKind::Formula => {
                        if let Err(e) = expr::check(&q.correct_answer) {
                            push(format!("correct answer is not a valid formula: {e}"));
                        }
                    }
                }
            }
        }

        Question::GraphPlot(q) => {
            if let Err(e) = expr::check(&q.correct_function) {
                push(format!("correct function does not evaluate: {e}"));
            }
            check_grid(&q.grid, &mut push);
        }

        Question::SliderInput(q) => {
            if q.min >= q.max {
                push(format!("invalid slider range {}..{}", q.min, q.max));
            }
            if q.correct_answer < q.min || q.correct_answer > q.max {
                push("correct answer is outside the slider range".into());
            }
            if q.tolerance.is_some_and(|t| t < 0.0) {
                push("tolerance must not be negative".into());
            }
        }
    }
}

fn check_grid(grid: &GridConfig, push: &mut impl FnMut(String)) {
    if grid.x_min >= grid.x_max || grid.y_min >= grid.y_max {
        push("grid configuration has inverted or empty bounds".into());
    }
}

/// The `{n}` placeholder markers embedded in fill-blank question text.
fn placeholder_positions(text: &str) -> HashSet<u32> {
    Regex::new(r"\{(\d+)\}")
        .expect("placeholder pattern is valid")
        .captures_iter(text)
        .filter_map(|c| c[1].parse().ok())
        .collect()
}
