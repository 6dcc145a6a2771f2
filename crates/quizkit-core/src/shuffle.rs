//! Presentation shuffling that preserves answer-key integrity.
//!
//! Every variant encodes its answer key differently (by index, by id
//! string, by bijection, or by implicit sort order), so each needs its own
//! remapping. All remaps go through an explicit old-index → new-index map
//! built once per call — never a lookup by value, which breaks when two
//! items share the same display content.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{item_id, item_index, OrderKey, Question};
use crate::parser::QuestionBank;

/// Permute `items`, returning the shuffled copy and the old→new index map.
fn permute<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> (Vec<T>, Vec<usize>) {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.shuffle(rng);
    // order[new] = old
    let mut old_to_new = vec![0; items.len()];
    for (new, &old) in order.iter().enumerate() {
        old_to_new[old] = new;
    }
    let shuffled = order.iter().map(|&old| items[old].clone()).collect();
    (shuffled, old_to_new)
}

/// Produce a presentation-randomized copy of a question.
///
/// The returned question carries the same id and judges the same answers as
/// the source: `evaluate(shuffle(q, rng), answer_key(shuffle(q, rng)))` is
/// correct for every variant. The source is never modified; a shuffled
/// variant is a per-session value, not a bank entry.
pub fn shuffle_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
    match question {
        Question::MultipleChoice(q) => {
            let mut q = q.clone();
            // The key stores content strings, not indices, so only the
            // display order changes.
            (q.options, _) = permute(&q.options, rng);
            Question::MultipleChoice(q)
        }

        Question::DragDrop(q) => {
            let mut q = q.clone();
            let (items, map) = permute(&q.items, rng);
            q.items = items;
            for zone in &mut q.drop_zones {
                if let Some(new) = item_index(&zone.correct_item_id).and_then(|old| map.get(old)) {
                    zone.correct_item_id = item_id(*new);
                }
            }
            Question::DragDrop(q)
        }

        Question::LineMatch(q) => {
            let mut q = q.clone();
            let (left, left_map) = permute(&q.left_items, rng);
            let (right, right_map) = permute(&q.right_items, rng);
            q.left_items = left;
            q.right_items = right;
            for connection in &mut q.correct_connections {
                if let (Some(&from), Some(&to)) = (
                    left_map.get(connection.from),
                    right_map.get(connection.to),
                ) {
                    connection.from = from;
                    connection.to = to;
                }
            }
            Question::LineMatch(q)
        }

        Question::QuickTap(q) => {
            let mut q = q.clone();
            // The correctness flag travels with its item.
            (q.items, _) = permute(&q.items, rng);
            Question::QuickTap(q)
        }

        Question::Order(q) => {
            let mut q = q.clone();
            match &q.correct_order {
                // Value-keyed: correctness comes from sorting, so only the
                // presentation order changes.
                OrderKey::Direction(_) => {
                    (q.numbers, _) = permute(&q.numbers, rng);
                }
                // Index-keyed: rewrite the stored permutation through the
                // same map that moved the steps.
                OrderKey::Permutation(permutation) => {
                    let (steps, map) = permute(&q.steps, rng);
                    let rewritten = permutation
                        .iter()
                        .map(|&old| map.get(old).copied().unwrap_or(old))
                        .collect();
                    q.steps = steps;
                    q.correct_order = OrderKey::Permutation(rewritten);
                }
            }
            Question::Order(q)
        }

        // No presentable list order to permute.
        Question::Graph(_)
        | Question::FillBlank(_)
        | Question::TypeIn(_)
        | Question::GraphPlot(_)
        | Question::SliderInput(_) => question.clone(),
    }
}

/// Shuffle every question in a bank, producing a fresh per-session copy.
pub fn shuffle_bank<R: Rng + ?Sized>(bank: &QuestionBank, rng: &mut R) -> QuestionBank {
    QuestionBank {
        id: bank.id.clone(),
        name: bank.name.clone(),
        description: bank.description.clone(),
        questions: bank
            .questions
            .iter()
            .map(|q| shuffle_question(q, rng))
            .collect(),
    }
}
