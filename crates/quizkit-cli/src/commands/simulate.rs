//! The `quizkit simulate` command.
//!
//! Drives a full adaptive session against a bank with a synthetic student:
//! each turn the controller picks a question, the student answers correctly
//! with the configured probability, the evaluator judges the submission,
//! and the outcome feeds back into the controller.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quizkit_core::adaptive::AdaptiveController;
use quizkit_core::evaluate::{answer_key, evaluate};
use quizkit_core::model::{
    Connection, OrderKey, Point, Question, SortDirection, SubmittedAnswer, TapPolicy,
};
use quizkit_core::parser;
use quizkit_core::session::{Response, SessionReport};
use quizkit_core::shuffle::shuffle_bank;
use quizkit_core::validate::validate_bank;

pub fn execute(
    bank_path: PathBuf,
    seed: Option<u64>,
    questions: usize,
    accuracy: f64,
    shuffle: bool,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = crate::config::load_config_from(config_path.as_deref())?;
    let bank = parser::parse_bank(&bank_path)?;

    let errors = validate_bank(&bank);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  ERROR: {e}");
        }
        anyhow::bail!(
            "bank '{}' failed validation with {} error(s); run `quizkit validate` for details",
            bank.id,
            errors.len()
        );
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let bank = if shuffle {
        tracing::info!("shuffling bank '{}' for this session", bank.id);
        shuffle_bank(&bank, &mut rng)
    } else {
        bank
    };

    let accuracy = accuracy.clamp(0.0, 1.0);
    let debounce = config.adaptive.debounce_ms;
    let mut controller = AdaptiveController::new(config.adaptive);
    let mut responses = Vec::new();
    let mut clock: u64 = 0;

    for _ in 0..questions {
        let Some(question) = controller.select_next(&bank.questions, &mut rng) else {
            break;
        };

        let submitted = if rng.gen_bool(accuracy) {
            answer_key(question)
        } else {
            wrong_answer(question)
        };
        let evaluation = evaluate(question, &submitted);
        let time_taken_ms = 1500 + rng.gen_range(0..2000);

        clock += debounce + time_taken_ms;
        controller.on_answer(evaluation.correct, question.id(), clock);
        responses.push(Response::graded(
            question,
            submitted,
            evaluation.correct,
            time_taken_ms,
        ));
    }

    let report = SessionReport::new(&bank, responses, controller.difficulty());
    print_summary(&report);

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// A plausible same-shape incorrect submission for each variant.
fn wrong_answer(question: &Question) -> SubmittedAnswer {
    match question {
        Question::MultipleChoice(q) => SubmittedAnswer::Choices {
            selected: q
                .options
                .iter()
                .map(|o| o.content().to_string())
                .find(|c| !q.correct_answers.contains(c))
                .into_iter()
                .collect(),
        },
        Question::DragDrop(_) => SubmittedAnswer::Placements {
            placed: Default::default(),
        },
        Question::Graph(q) => SubmittedAnswer::Points {
            points: vec![Point {
                x: q.grid.x_min - 10.0,
                y: q.grid.y_min - 10.0,
            }],
        },
        Question::Order(q) => match &q.correct_order {
            OrderKey::Direction(direction) => {
                // Sort the wrong way round.
                let mut sequence = q.numbers.clone();
                sequence.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                if *direction == SortDirection::Ascending {
                    sequence.reverse();
                }
                SubmittedAnswer::NumberOrder { sequence }
            }
            OrderKey::Permutation(permutation) => {
                let mut sequence = permutation.clone();
                let rotate_by = 1.min(sequence.len().saturating_sub(1));
                sequence.rotate_left(rotate_by);
                SubmittedAnswer::StepOrder { sequence }
            }
        },
        Question::FillBlank(q) => SubmittedAnswer::Blanks {
            entries: q
                .blanks
                .iter()
                .map(|b| (b.id.clone(), String::new()))
                .collect(),
        },
        Question::LineMatch(q) => SubmittedAnswer::Connections {
            connections: q
                .correct_connections
                .first()
                .map(|c| Connection {
                    from: c.from,
                    to: (c.to + 1) % q.right_items.len().max(1),
                })
                .into_iter()
                .collect(),
        },
        Question::QuickTap(q) => match q.policy {
            TapPolicy::Exact => SubmittedAnswer::Taps {
                indices: q
                    .items
                    .iter()
                    .position(|item| !item.is_correct)
                    .into_iter()
                    .collect(),
                elapsed_ms: 1_000,
            },
            TapPolicy::Threshold => SubmittedAnswer::Taps {
                indices: Vec::new(),
                elapsed_ms: u64::from(q.time_limit) * 1000,
            },
        },
        Question::TypeIn(q) => SubmittedAnswer::Text {
            input: format!("{}!", q.correct_answer),
        },
        Question::GraphPlot(_) => SubmittedAnswer::Curve {
            expression: "x + 1000000".into(),
        },
        Question::SliderInput(q) => SubmittedAnswer::Value {
            value: q.correct_answer + q.tolerance.unwrap_or(1.0) + 1.0,
        },
    }
}

fn print_summary(report: &SessionReport) {
    let summary = &report.summary;

    println!(
        "Session summary for '{}' ({} questions in bank)",
        report.bank.name, report.bank.question_count
    );

    let mut table = Table::new();
    table.set_header(vec![
        "Answered",
        "Correct",
        "Accuracy",
        "Points",
        "Best streak",
        "Final difficulty",
    ]);
    table.add_row(vec![
        Cell::new(summary.answered),
        Cell::new(summary.correct),
        Cell::new(format!("{:.1}%", summary.accuracy * 100.0)),
        Cell::new(summary.points),
        Cell::new(summary.best_streak),
        Cell::new(summary.final_difficulty),
    ]);
    println!("{table}");

    if !summary.per_difficulty.is_empty() {
        let mut by_level = Table::new();
        by_level.set_header(vec!["Difficulty", "Answered", "Correct"]);
        for (level, stats) in &summary.per_difficulty {
            by_level.add_row(vec![
                Cell::new(level),
                Cell::new(stats.answered),
                Cell::new(stats.correct),
            ]);
        }
        println!("{by_level}");
    }
}
