//! Answer evaluation: one correctness rule per question variant.
//!
//! [`evaluate`] is pure and total — a malformed or mismatched submission
//! yields an incorrect result, never an error, so it is safe to call
//! straight from an input event handler.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::expr;
use crate::model::{
    item_index, Connection, GridConfig, OrderKey, Question, QuickTapQuestion, SortDirection,
    SubmittedAnswer, TapPolicy, TypeInQuestion, ValidationKind,
};

/// Maximum |submitted − expected| when sampling a plotted function.
const PLOT_TOLERANCE: f64 = 0.1;

/// Number of evenly spaced samples when a graph-plot question has no
/// explicit check points.
const PLOT_SAMPLES: usize = 10;

/// Outcome of judging one submitted answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Whether the submission is judged correct.
    pub correct: bool,
    /// Normalized form of a textual submission, for caller display.
    pub normalized: Option<String>,
}

impl Evaluation {
    fn of(correct: bool) -> Self {
        Self {
            correct,
            normalized: None,
        }
    }

    fn incorrect() -> Self {
        Self::of(false)
    }

    fn with_normalized(correct: bool, normalized: String) -> Self {
        Self {
            correct,
            normalized: Some(normalized),
        }
    }
}

/// Judge a submitted answer against a question's answer key.
pub fn evaluate(question: &Question, submitted: &SubmittedAnswer) -> Evaluation {
    match question {
        Question::MultipleChoice(q) => {
            let SubmittedAnswer::Choices { selected } = submitted else {
                return Evaluation::incorrect();
            };
            // Compare as a set of content strings: duplicates collapse, and
            // an extra selection fails the size check.
            let chosen: BTreeSet<&str> = selected.iter().map(String::as_str).collect();
            let correct = chosen.len() == q.correct_answers.len()
                && q.correct_answers.iter().all(|a| chosen.contains(a.as_str()));
            Evaluation::of(correct)
        }

        Question::DragDrop(q) => {
            let SubmittedAnswer::Placements { placed } = submitted else {
                return Evaluation::incorrect();
            };
            let correct = q.drop_zones.iter().all(|zone| {
                let expected = item_index(&zone.correct_item_id)
                    .and_then(|i| q.items.get(i))
                    .map(|item| item.content());
                match (expected, placed.get(&zone.id)) {
                    (Some(expected), Some(content)) => content == expected,
                    _ => false,
                }
            });
            Evaluation::of(correct)
        }

        Question::Graph(q) => {
            let SubmittedAnswer::Points { points } = submitted else {
                return Evaluation::incorrect();
            };
            let tolerance = graph_tolerance(&q.grid);
            let correct = q.correct_points.iter().any(|target| {
                points.iter().any(|p| {
                    (p.x - target.x).abs() < tolerance && (p.y - target.y).abs() < tolerance
                })
            });
            Evaluation::of(correct)
        }

        Question::Order(q) => match (&q.correct_order, submitted) {
            (OrderKey::Direction(direction), SubmittedAnswer::NumberOrder { sequence }) => {
                let mut expected = q.numbers.clone();
                expected.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                if *direction == SortDirection::Descending {
                    expected.reverse();
                }
                let correct = sequence.len() == expected.len()
                    && sequence.iter().zip(&expected).all(|(a, b)| a == b);
                Evaluation::of(correct)
            }
            (OrderKey::Permutation(permutation), SubmittedAnswer::StepOrder { sequence }) => {
                Evaluation::of(sequence == permutation)
            }
            _ => Evaluation::incorrect(),
        },

        Question::FillBlank(q) => {
            let SubmittedAnswer::Blanks { entries } = submitted else {
                return Evaluation::incorrect();
            };
            // Every blank judged independently; a blank with no entry fails.
            let correct = q.blanks.iter().all(|blank| {
                entries
                    .get(&blank.id)
                    .map(|text| {
                        let given = normalize_text(text);
                        given == normalize_text(&blank.answer)
                            || blank
                                .acceptable_answers
                                .iter()
                                .any(|alt| given == normalize_text(alt))
                    })
                    .unwrap_or(false)
            });
            let mut ordered: Vec<&crate::model::Blank> = q.blanks.iter().collect();
            ordered.sort_by_key(|b| b.position);
            let normalized = ordered
                .iter()
                .map(|b| {
                    entries
                        .get(&b.id)
                        .map(|t| normalize_text(t))
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join(", ");
            Evaluation::with_normalized(correct, normalized)
        }

        Question::LineMatch(q) => {
            let SubmittedAnswer::Connections { connections } = submitted else {
                return Evaluation::incorrect();
            };
            // Subset check: the caller guarantees one connection per left
            // item before a submission reaches the evaluator.
            let key: HashSet<Connection> = q.correct_connections.iter().copied().collect();
            Evaluation::of(connections.iter().all(|c| key.contains(c)))
        }

        Question::QuickTap(q) => {
            let SubmittedAnswer::Taps {
                indices,
                elapsed_ms,
            } = submitted
            else {
                return Evaluation::incorrect();
            };
            Evaluation::of(quick_tap_correct(q, indices, *elapsed_ms))
        }

        Question::TypeIn(q) => {
            let SubmittedAnswer::Text { input } = submitted else {
                return Evaluation::incorrect();
            };
            evaluate_type_in(q, input.trim())
        }

        Question::GraphPlot(q) => {
            let SubmittedAnswer::Curve { expression } = submitted else {
                return Evaluation::incorrect();
            };
            let correct = plot_matches(q, expression);
            Evaluation::with_normalized(correct, expr::normalize(expression))
        }

        Question::SliderInput(q) => {
            let SubmittedAnswer::Value { value } = submitted else {
                return Evaluation::incorrect();
            };
            let tolerance = q.tolerance.unwrap_or(1.0);
            Evaluation::of((value - q.correct_answer).abs() <= tolerance)
        }
    }
}

/// Point-placement tolerance, proportional to the visible x-range so
/// small-range graphs aren't too forgiving and large-range graphs aren't
/// impossibly strict.
pub fn graph_tolerance(grid: &GridConfig) -> f64 {
    ((grid.x_max - grid.x_min) * 0.02).clamp(0.1, 0.2)
}

fn quick_tap_correct(q: &QuickTapQuestion, indices: &[usize], elapsed_ms: u64) -> bool {
    let distinct: BTreeSet<usize> = indices.iter().copied().collect();
    if distinct.iter().any(|&i| i >= q.items.len()) {
        return false;
    }
    let tapped_correct = distinct.iter().filter(|&&i| q.items[i].is_correct).count();
    let total_correct = q.items.iter().filter(|item| item.is_correct).count();

    match q.policy {
        TapPolicy::Exact => tapped_correct == total_correct && distinct.len() == tapped_correct,
        TapPolicy::Threshold => {
            tapped_correct as u32 >= q.min_correct && elapsed_ms <= u64::from(q.time_limit) * 1000
        }
    }
}

fn evaluate_type_in(q: &TypeInQuestion, input: &str) -> Evaluation {
    let Some(rule) = &q.validation else {
        // Plain comparison against the main answer and alternatives.
        let fold = |s: &str| {
            if q.case_sensitive {
                s.trim().to_string()
            } else {
                normalize_text(s)
            }
        };
        let given = fold(input);
        let correct = given == fold(&q.correct_answer)
            || q.acceptable_answers.iter().any(|alt| given == fold(alt));
        return Evaluation::with_normalized(correct, given);
    };

    match rule.kind {
        ValidationKind::Number => {
            let Ok(value) = input.parse::<f64>() else {
                return Evaluation::incorrect();
            };
            if rule.integer && value.fract() != 0.0 {
                return Evaluation::incorrect();
            }
            if rule.min.is_some_and(|min| value < min) || rule.max.is_some_and(|max| value > max) {
                return Evaluation::incorrect();
            }
            if let Some(precision) = rule.precision {
                if decimal_places(input) > precision {
                    return Evaluation::incorrect();
                }
            }
            let mut candidates = std::iter::once(&q.correct_answer)
                .chain(&q.acceptable_answers)
                .filter_map(|s| s.trim().parse::<f64>().ok());
            let correct = match rule.tolerance {
                Some(tolerance) => candidates.any(|c| (value - c).abs() <= tolerance),
                None => candidates.any(|c| value == c),
            };
            Evaluation::with_normalized(correct, input.to_string())
        }

        ValidationKind::Text => {
            if let Some(pattern) = &rule.pattern {
                let matched = Regex::new(pattern)
                    .map(|re| re.is_match(input))
                    .unwrap_or(false);
                if !matched {
                    return Evaluation::incorrect();
                }
            }
            let given = normalize_text(input);
            let correct = given == normalize_text(&q.correct_answer)
                || q
                    .acceptable_answers
                    .iter()
                    .any(|alt| given == normalize_text(alt));
            Evaluation::with_normalized(correct, given)
        }

        ValidationKind::Formula => {
            let correct = expr::formulas_equal(input, &q.correct_answer)
                || q
                    .acceptable_answers
                    .iter()
                    .any(|alt| expr::formulas_equal(input, alt));
            Evaluation::with_normalized(correct, expr::normalize(input))
        }
    }
}

fn plot_matches(q: &crate::model::GraphPlotQuestion, expression: &str) -> bool {
    let samples: Vec<(f64, f64)> = if q.check_points.is_empty() {
        let span = q.grid.x_max - q.grid.x_min;
        (0..PLOT_SAMPLES)
            .map(|i| q.grid.x_min + (i as f64 / (PLOT_SAMPLES - 1) as f64) * span)
            .map(|x| expr::eval(&q.correct_function, x).map(|y| (x, y)))
            .collect::<Result<_, _>>()
            .unwrap_or_default()
    } else {
        q.check_points.iter().map(|p| (p.x, p.y)).collect()
    };
    if samples.is_empty() {
        return false;
    }

    samples.iter().all(|&(x, expected)| {
        matches!(
            expr::eval(expression, x),
            Ok(y) if y.is_finite() && (y - expected).abs() < PLOT_TOLERANCE
        )
    })
}

/// Trim and case-fold for textual answer comparison. Idempotent.
pub fn normalize_text(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Decimal places in a raw numeric input string.
fn decimal_places(input: &str) -> u32 {
    input
        .split_once('.')
        .map(|(_, frac)| frac.len() as u32)
        .unwrap_or(0)
}

/// Derive the canonically correct submission from a question's answer key.
///
/// Useful to session drivers and as the round-trip oracle for the shuffle
/// transform: a key-derived answer must always evaluate as correct.
pub fn answer_key(question: &Question) -> SubmittedAnswer {
    match question {
        Question::MultipleChoice(q) => SubmittedAnswer::Choices {
            selected: q.correct_answers.clone(),
        },
        Question::DragDrop(q) => SubmittedAnswer::Placements {
            placed: q
                .drop_zones
                .iter()
                .filter_map(|zone| {
                    let item = item_index(&zone.correct_item_id).and_then(|i| q.items.get(i))?;
                    Some((zone.id.clone(), item.content().to_string()))
                })
                .collect(),
        },
        Question::Graph(q) => SubmittedAnswer::Points {
            points: q.correct_points.clone(),
        },
        Question::Order(q) => match &q.correct_order {
            OrderKey::Direction(direction) => {
                let mut sequence = q.numbers.clone();
                sequence.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                if *direction == SortDirection::Descending {
                    sequence.reverse();
                }
                SubmittedAnswer::NumberOrder { sequence }
            }
            OrderKey::Permutation(permutation) => SubmittedAnswer::StepOrder {
                sequence: permutation.clone(),
            },
        },
        Question::FillBlank(q) => SubmittedAnswer::Blanks {
            entries: q
                .blanks
                .iter()
                .map(|b| (b.id.clone(), b.answer.clone()))
                .collect(),
        },
        Question::LineMatch(q) => SubmittedAnswer::Connections {
            connections: q.correct_connections.clone(),
        },
        Question::QuickTap(q) => SubmittedAnswer::Taps {
            indices: q
                .items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.is_correct)
                .map(|(i, _)| i)
                .collect(),
            elapsed_ms: 0,
        },
        Question::TypeIn(q) => SubmittedAnswer::Text {
            input: q.correct_answer.clone(),
        },
        Question::GraphPlot(q) => SubmittedAnswer::Curve {
            expression: q.correct_function.clone(),
        },
        Question::SliderInput(q) => SubmittedAnswer::Value {
            value: q.correct_answer,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use std::collections::HashMap;

    fn mc(options: &[&str], correct: &[&str]) -> Question {
        Question::MultipleChoice(MultipleChoiceQuestion {
            id: "mc".into(),
            question: "pick".into(),
            difficulty: 1,
            points: 10,
            options: options.iter().map(|&o| o.into()).collect(),
            correct_answers: correct.iter().map(|&c| c.to_string()).collect(),
            multi_select: correct.len() > 1,
            explanation: None,
        })
    }

    fn choices(selected: &[&str]) -> SubmittedAnswer {
        SubmittedAnswer::Choices {
            selected: selected.iter().map(|&s| s.to_string()).collect(),
        }
    }

    #[test]
    fn multiple_choice_exact_set() {
        let q = mc(&["4", "5", "6"], &["4"]);
        assert!(evaluate(&q, &choices(&["4"])).correct);
        // Extra selection on a single-select question.
        assert!(!evaluate(&q, &choices(&["4", "5"])).correct);
        assert!(!evaluate(&q, &choices(&["5"])).correct);
        assert!(!evaluate(&q, &choices(&[])).correct);
    }

    #[test]
    fn multiple_choice_multi_select() {
        let q = mc(&["2", "3", "4", "5"], &["2", "4"]);
        assert!(evaluate(&q, &choices(&["2", "4"])).correct);
        assert!(evaluate(&q, &choices(&["4", "2"])).correct);
        assert!(!evaluate(&q, &choices(&["2"])).correct);
        assert!(!evaluate(&q, &choices(&["2", "4", "5"])).correct);
        // Duplicate selections collapse to a set.
        assert!(evaluate(&q, &choices(&["2", "2", "4"])).correct);
    }

    #[test]
    fn mismatched_submission_shape_is_incorrect() {
        let q = mc(&["4", "5"], &["4"]);
        let wrong_shape = SubmittedAnswer::Value { value: 4.0 };
        assert!(!evaluate(&q, &wrong_shape).correct);
    }

    fn drag_drop() -> Question {
        Question::DragDrop(DragDropQuestion {
            id: "dd".into(),
            question: "sort".into(),
            difficulty: 2,
            points: 15,
            items: vec!["1/2".into(), "3/4".into(), "7/8".into()],
            drop_zones: vec![
                DropZone {
                    id: "zone-a".into(),
                    correct_item_id: "item-2".into(),
                    placeholder: Some("largest".into()),
                },
                DropZone {
                    id: "zone-b".into(),
                    correct_item_id: "item-0".into(),
                    placeholder: Some("smallest".into()),
                },
            ],
            explanation: None,
        })
    }

    #[test]
    fn drag_drop_judges_by_content() {
        let q = drag_drop();
        let mut placed = HashMap::new();
        placed.insert("zone-a".to_string(), "7/8".to_string());
        placed.insert("zone-b".to_string(), "1/2".to_string());
        assert!(evaluate(&q, &SubmittedAnswer::Placements { placed: placed.clone() }).correct);

        placed.insert("zone-b".to_string(), "3/4".to_string());
        assert!(!evaluate(&q, &SubmittedAnswer::Placements { placed }).correct);
    }

    #[test]
    fn drag_drop_missing_zone_is_incorrect() {
        let q = drag_drop();
        let mut placed = HashMap::new();
        placed.insert("zone-a".to_string(), "7/8".to_string());
        assert!(!evaluate(&q, &SubmittedAnswer::Placements { placed }).correct);
    }

    fn graph(x_min: f64, x_max: f64) -> Question {
        Question::Graph(GraphQuestion {
            id: "g".into(),
            question: "place the point".into(),
            difficulty: 2,
            points: 15,
            correct_points: vec![Point { x: 2.0, y: 3.0 }],
            grid: GridConfig {
                x_min,
                x_max,
                y_min: -5.0,
                y_max: 5.0,
            },
            explanation: None,
        })
    }

    #[test]
    fn graph_tolerance_scales_with_range() {
        let narrow = GridConfig {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        let wide = GridConfig {
            x_min: -100.0,
            x_max: 100.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert_eq!(graph_tolerance(&narrow), 0.1);
        assert_eq!(graph_tolerance(&wide), 0.2);
    }

    #[test]
    fn graph_point_within_tolerance() {
        let q = graph(-5.0, 5.0);
        let near = SubmittedAnswer::Points {
            points: vec![Point { x: 2.05, y: 3.05 }],
        };
        let far = SubmittedAnswer::Points {
            points: vec![Point { x: 2.5, y: 3.0 }],
        };
        assert!(evaluate(&q, &near).correct);
        assert!(!evaluate(&q, &far).correct);
        assert!(!evaluate(&q, &SubmittedAnswer::Points { points: vec![] }).correct);
    }

    fn number_order(direction: SortDirection) -> Question {
        Question::Order(OrderQuestion {
            id: "ord".into(),
            question: "arrange".into(),
            difficulty: 1,
            points: 10,
            correct_order: OrderKey::Direction(direction),
            numbers: vec![3.0, 1.0, 2.0],
            steps: vec![],
            initial_equation: None,
            explanation: None,
        })
    }

    #[test]
    fn order_numbers_ascending_and_descending() {
        let asc = number_order(SortDirection::Ascending);
        assert!(
            evaluate(
                &asc,
                &SubmittedAnswer::NumberOrder {
                    sequence: vec![1.0, 2.0, 3.0]
                }
            )
            .correct
        );
        assert!(
            !evaluate(
                &asc,
                &SubmittedAnswer::NumberOrder {
                    sequence: vec![3.0, 2.0, 1.0]
                }
            )
            .correct
        );

        let desc = number_order(SortDirection::Descending);
        assert!(
            evaluate(
                &desc,
                &SubmittedAnswer::NumberOrder {
                    sequence: vec![3.0, 2.0, 1.0]
                }
            )
            .correct
        );
    }

    #[test]
    fn order_steps_match_permutation() {
        let q = Question::Order(OrderQuestion {
            id: "steps".into(),
            question: "solve".into(),
            difficulty: 3,
            points: 20,
            correct_order: OrderKey::Permutation(vec![2, 0, 1]),
            numbers: vec![],
            steps: vec![
                OrderStep {
                    text: "subtract 3".into(),
                    equation: "2x = 4".into(),
                    explanation: None,
                },
                OrderStep {
                    text: "divide by 2".into(),
                    equation: "x = 2".into(),
                    explanation: None,
                },
                OrderStep {
                    text: "start".into(),
                    equation: "2x + 3 = 7".into(),
                    explanation: None,
                },
            ],
            initial_equation: None,
            explanation: None,
        });
        assert!(
            evaluate(
                &q,
                &SubmittedAnswer::StepOrder {
                    sequence: vec![2, 0, 1]
                }
            )
            .correct
        );
        assert!(
            !evaluate(
                &q,
                &SubmittedAnswer::StepOrder {
                    sequence: vec![0, 1, 2]
                }
            )
            .correct
        );
    }

    fn fill_blank() -> Question {
        Question::FillBlank(FillBlankQuestion {
            id: "fb".into(),
            question: "{0} plus {1} is four".into(),
            difficulty: 1,
            points: 10,
            blanks: vec![
                Blank {
                    id: "b1".into(),
                    answer: "two".into(),
                    position: 0,
                    acceptable_answers: vec!["2".into()],
                },
                Blank {
                    id: "b2".into(),
                    answer: "two".into(),
                    position: 1,
                    acceptable_answers: vec![],
                },
            ],
            explanation: None,
        })
    }

    fn blanks(entries: &[(&str, &str)]) -> SubmittedAnswer {
        SubmittedAnswer::Blanks {
            entries: entries
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn fill_blank_all_blanks_must_pass() {
        let q = fill_blank();
        assert!(evaluate(&q, &blanks(&[("b1", "two"), ("b2", "two")])).correct);
        assert!(evaluate(&q, &blanks(&[("b1", " TWO "), ("b2", "Two")])).correct);
        assert!(evaluate(&q, &blanks(&[("b1", "2"), ("b2", "two")])).correct);
        assert!(!evaluate(&q, &blanks(&[("b1", "two"), ("b2", "three")])).correct);
        assert!(!evaluate(&q, &blanks(&[("b1", "two")])).correct);
    }

    #[test]
    fn text_normalization_is_idempotent() {
        for s in ["  Mixed Case  ", "already lower", "\tTWO\n"] {
            let once = normalize_text(s);
            assert_eq!(normalize_text(&once), once);
        }
    }

    fn line_match() -> Question {
        Question::LineMatch(LineMatchQuestion {
            id: "lm".into(),
            question: "match".into(),
            difficulty: 2,
            points: 15,
            left_items: vec!["1/2".into(), "1/4".into()],
            right_items: vec!["0.25".into(), "0.5".into()],
            correct_connections: vec![
                Connection { from: 0, to: 1 },
                Connection { from: 1, to: 0 },
            ],
            explanation: None,
        })
    }

    #[test]
    fn line_match_subset_of_key() {
        let q = line_match();
        let full = SubmittedAnswer::Connections {
            connections: vec![Connection { from: 0, to: 1 }, Connection { from: 1, to: 0 }],
        };
        let crossed = SubmittedAnswer::Connections {
            connections: vec![Connection { from: 0, to: 0 }, Connection { from: 1, to: 1 }],
        };
        assert!(evaluate(&q, &full).correct);
        assert!(!evaluate(&q, &crossed).correct);
    }

    fn quick_tap(policy: TapPolicy) -> Question {
        Question::QuickTap(QuickTapQuestion {
            id: "qt".into(),
            question: "tap evens".into(),
            difficulty: 1,
            points: 10,
            items: vec![
                TapItem {
                    text: "2".into(),
                    is_correct: true,
                },
                TapItem {
                    text: "3".into(),
                    is_correct: false,
                },
                TapItem {
                    text: "4".into(),
                    is_correct: true,
                },
                TapItem {
                    text: "5".into(),
                    is_correct: false,
                },
            ],
            time_limit: 10,
            min_correct: 2,
            policy,
            explanation: None,
        })
    }

    #[test]
    fn quick_tap_exact_policy() {
        let q = quick_tap(TapPolicy::Exact);
        let tap = |indices: &[usize]| SubmittedAnswer::Taps {
            indices: indices.to_vec(),
            elapsed_ms: 4_000,
        };
        assert!(evaluate(&q, &tap(&[0, 2])).correct);
        assert!(!evaluate(&q, &tap(&[0])).correct);
        assert!(!evaluate(&q, &tap(&[0, 1, 2])).correct);
        assert!(!evaluate(&q, &tap(&[0, 2, 99])).correct);
    }

    #[test]
    fn quick_tap_threshold_policy() {
        let q = quick_tap(TapPolicy::Threshold);
        let in_time = SubmittedAnswer::Taps {
            indices: vec![0, 1, 2],
            elapsed_ms: 9_000,
        };
        let too_late = SubmittedAnswer::Taps {
            indices: vec![0, 2],
            elapsed_ms: 11_000,
        };
        // Incorrect taps don't matter under the threshold policy.
        assert!(evaluate(&q, &in_time).correct);
        assert!(!evaluate(&q, &too_late).correct);
        assert!(
            !evaluate(
                &q,
                &SubmittedAnswer::Taps {
                    indices: vec![0],
                    elapsed_ms: 1_000
                }
            )
            .correct
        );
    }

    fn type_in_number(tolerance: Option<f64>) -> Question {
        Question::TypeIn(TypeInQuestion {
            id: "ti".into(),
            question: "what is 30?".into(),
            difficulty: 1,
            points: 10,
            correct_answer: "30".into(),
            acceptable_answers: vec![],
            case_sensitive: false,
            validation: Some(ValidationRule {
                kind: ValidationKind::Number,
                min: Some(0.0),
                max: Some(100.0),
                precision: Some(2),
                integer: false,
                tolerance,
                pattern: None,
            }),
            explanation: None,
        })
    }

    fn text(input: &str) -> SubmittedAnswer {
        SubmittedAnswer::Text {
            input: input.into(),
        }
    }

    #[test]
    fn type_in_number_tolerance_boundaries() {
        let q = type_in_number(Some(2.0));
        assert!(evaluate(&q, &text("30")).correct);
        assert!(evaluate(&q, &text("28")).correct);
        assert!(evaluate(&q, &text("32")).correct);
        assert!(!evaluate(&q, &text("27.5")).correct);
        assert!(!evaluate(&q, &text("32.5")).correct);
    }

    #[test]
    fn type_in_number_exact_without_tolerance() {
        let q = type_in_number(None);
        assert!(evaluate(&q, &text("30")).correct);
        assert!(evaluate(&q, &text("30.0")).correct);
        assert!(!evaluate(&q, &text("30.1")).correct);
    }

    #[test]
    fn type_in_number_rejects_malformed_input() {
        let q = type_in_number(Some(2.0));
        assert!(!evaluate(&q, &text("thirty")).correct);
        assert!(!evaluate(&q, &text("")).correct);
        assert!(!evaluate(&q, &text("101")).correct); // above max
        assert!(!evaluate(&q, &text("30.125")).correct); // too many decimals
    }

    #[test]
    fn type_in_number_integer_requirement() {
        let mut q = type_in_number(None);
        if let Question::TypeIn(inner) = &mut q {
            inner.validation.as_mut().unwrap().integer = true;
            inner.validation.as_mut().unwrap().precision = None;
        }
        assert!(evaluate(&q, &text("30")).correct);
        assert!(!evaluate(&q, &text("30.5")).correct);
    }

    #[test]
    fn type_in_text_pattern_and_fold() {
        let q = Question::TypeIn(TypeInQuestion {
            id: "ti-text".into(),
            question: "name the shape".into(),
            difficulty: 1,
            points: 10,
            correct_answer: "Triangle".into(),
            acceptable_answers: vec!["3-gon".into()],
            case_sensitive: false,
            validation: Some(ValidationRule {
                kind: ValidationKind::Text,
                min: None,
                max: None,
                precision: None,
                integer: false,
                tolerance: None,
                pattern: Some(r"^[A-Za-z0-9-]+$".into()),
            }),
            explanation: None,
        });
        assert!(evaluate(&q, &text("triangle")).correct);
        assert!(evaluate(&q, &text("  TRIANGLE ")).correct);
        assert!(evaluate(&q, &text("3-gon")).correct);
        assert!(!evaluate(&q, &text("tri angle")).correct); // fails pattern
        assert!(!evaluate(&q, &text("square")).correct);
    }

    #[test]
    fn type_in_formula_normalized_equality() {
        let q = Question::TypeIn(TypeInQuestion {
            id: "ti-formula".into(),
            question: "expand (x+1)^2".into(),
            difficulty: 3,
            points: 20,
            correct_answer: "x**2 + 2*x + 1".into(),
            acceptable_answers: vec!["x^2+2x+1".into()],
            case_sensitive: false,
            validation: Some(ValidationRule {
                kind: ValidationKind::Formula,
                min: None,
                max: None,
                precision: None,
                integer: false,
                tolerance: None,
                pattern: None,
            }),
            explanation: None,
        });
        assert!(evaluate(&q, &text("x^2 + 2x + 1")).correct);
        assert!(evaluate(&q, &text("X**2+2X+1")).correct);
        assert!(!evaluate(&q, &text("x^2 + 2x")).correct);
    }

    #[test]
    fn type_in_plain_case_sensitivity() {
        let q = Question::TypeIn(TypeInQuestion {
            id: "ti-plain".into(),
            question: "spell it".into(),
            difficulty: 1,
            points: 5,
            correct_answer: "Pi".into(),
            acceptable_answers: vec![],
            case_sensitive: true,
            validation: None,
            explanation: None,
        });
        assert!(evaluate(&q, &text("Pi")).correct);
        assert!(!evaluate(&q, &text("pi")).correct);
    }

    fn graph_plot(check_points: Vec<Point>) -> Question {
        Question::GraphPlot(GraphPlotQuestion {
            id: "gp".into(),
            question: "plot".into(),
            difficulty: 4,
            points: 25,
            correct_function: "x**2".into(),
            grid: GridConfig {
                x_min: -3.0,
                x_max: 3.0,
                y_min: -1.0,
                y_max: 9.0,
            },
            check_points,
            explanation: None,
        })
    }

    fn curve(expression: &str) -> SubmittedAnswer {
        SubmittedAnswer::Curve {
            expression: expression.into(),
        }
    }

    #[test]
    fn graph_plot_against_check_points() {
        let q = graph_plot(vec![
            Point { x: 0.0, y: 0.0 },
            Point { x: 2.0, y: 4.0 },
            Point { x: -2.0, y: 4.0 },
        ]);
        assert!(evaluate(&q, &curve("x^2")).correct);
        assert!(evaluate(&q, &curve("x*x")).correct);
        assert!(!evaluate(&q, &curve("x^2 + 1")).correct);
    }

    #[test]
    fn graph_plot_dense_sampling_fallback() {
        let q = graph_plot(vec![]);
        assert!(evaluate(&q, &curve("x**2")).correct);
        assert!(!evaluate(&q, &curve("x**2 + 0.5")).correct);
    }

    #[test]
    fn graph_plot_unparseable_is_incorrect() {
        let q = graph_plot(vec![Point { x: 1.0, y: 1.0 }]);
        assert!(!evaluate(&q, &curve("x +")).correct);
        assert!(!evaluate(&q, &curve("1/0 +")).correct);
        assert!(!evaluate(&q, &curve("foo(x)")).correct);
    }

    fn slider(tolerance: Option<f64>) -> Question {
        Question::SliderInput(SliderInputQuestion {
            id: "sl".into(),
            question: "angle of the sun".into(),
            difficulty: 2,
            points: 15,
            min: 0.0,
            max: 90.0,
            correct_answer: 30.0,
            tolerance,
            unit: Some("°".into()),
            scenario: None,
            explanation: None,
        })
    }

    #[test]
    fn slider_within_tolerance() {
        let q = slider(Some(2.0));
        assert!(evaluate(&q, &SubmittedAnswer::Value { value: 31.0 }).correct);
        assert!(evaluate(&q, &SubmittedAnswer::Value { value: 28.0 }).correct);
        assert!(!evaluate(&q, &SubmittedAnswer::Value { value: 33.0 }).correct);
    }

    #[test]
    fn slider_default_tolerance_is_one() {
        let q = slider(None);
        assert!(evaluate(&q, &SubmittedAnswer::Value { value: 31.0 }).correct);
        assert!(!evaluate(&q, &SubmittedAnswer::Value { value: 31.5 }).correct);
    }

    #[test]
    fn answer_key_always_evaluates_correct() {
        let questions = vec![
            mc(&["4", "5", "6"], &["4"]),
            drag_drop(),
            graph(-5.0, 5.0),
            number_order(SortDirection::Ascending),
            fill_blank(),
            line_match(),
            quick_tap(TapPolicy::Exact),
            quick_tap(TapPolicy::Threshold),
            type_in_number(Some(2.0)),
            graph_plot(vec![Point { x: 1.0, y: 1.0 }]),
            slider(Some(2.0)),
        ];
        for q in &questions {
            let key = answer_key(q);
            assert!(
                evaluate(q, &key).correct,
                "answer key rejected for {}",
                q.id()
            );
        }
    }
}
