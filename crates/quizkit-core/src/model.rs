//! Core data model types for quizkit.
//!
//! These are the fundamental types the entire quizkit system uses to
//! represent questions, their answer keys, and submitted answers.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest difficulty a question may carry.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest difficulty a question may carry.
pub const MAX_DIFFICULTY: u8 = 4;

/// A displayable piece of question content: either a plain string or rich
/// content carrying a format hint for the presentation layer.
///
/// Two items are interchangeable for answer checking whenever their content
/// strings match, regardless of formatting (see [`QuestionItem::content`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionItem {
    /// Plain display text.
    Plain(String),
    /// Formatted content (math, code, formula rendering).
    Rich {
        content: String,
        format: ItemFormat,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl QuestionItem {
    /// The textual payload used for content equality.
    pub fn content(&self) -> &str {
        match self {
            QuestionItem::Plain(s) => s,
            QuestionItem::Rich { content, .. } => content,
        }
    }
}

impl From<&str> for QuestionItem {
    fn from(s: &str) -> Self {
        QuestionItem::Plain(s.to_string())
    }
}

/// Rendering format of a rich content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFormat {
    Text,
    Math,
    Code,
    Formula,
}

/// A point in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Visible coordinate bounds of a graph question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// A single connection in a line-match question, by item position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
}

/// A question in the bank. Tagged union over the ten supported variants;
/// the discriminant is the `type` field of the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice(MultipleChoiceQuestion),
    DragDrop(DragDropQuestion),
    Graph(GraphQuestion),
    Order(OrderQuestion),
    FillBlank(FillBlankQuestion),
    LineMatch(LineMatchQuestion),
    QuickTap(QuickTapQuestion),
    TypeIn(TypeInQuestion),
    GraphPlot(GraphPlotQuestion),
    SliderInput(SliderInputQuestion),
}

impl Question {
    /// Unique identifier, stable across shuffles.
    pub fn id(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.id,
            Question::DragDrop(q) => &q.id,
            Question::Graph(q) => &q.id,
            Question::Order(q) => &q.id,
            Question::FillBlank(q) => &q.id,
            Question::LineMatch(q) => &q.id,
            Question::QuickTap(q) => &q.id,
            Question::TypeIn(q) => &q.id,
            Question::GraphPlot(q) => &q.id,
            Question::SliderInput(q) => &q.id,
        }
    }

    /// Display text shown to the user.
    pub fn prompt(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.question,
            Question::DragDrop(q) => &q.question,
            Question::Graph(q) => &q.question,
            Question::Order(q) => &q.question,
            Question::FillBlank(q) => &q.question,
            Question::LineMatch(q) => &q.question,
            Question::QuickTap(q) => &q.question,
            Question::TypeIn(q) => &q.question,
            Question::GraphPlot(q) => &q.question,
            Question::SliderInput(q) => &q.question,
        }
    }

    /// Difficulty rating, 1 (easiest) through 4 (hardest).
    pub fn difficulty(&self) -> u8 {
        match self {
            Question::MultipleChoice(q) => q.difficulty,
            Question::DragDrop(q) => q.difficulty,
            Question::Graph(q) => q.difficulty,
            Question::Order(q) => q.difficulty,
            Question::FillBlank(q) => q.difficulty,
            Question::LineMatch(q) => q.difficulty,
            Question::QuickTap(q) => q.difficulty,
            Question::TypeIn(q) => q.difficulty,
            Question::GraphPlot(q) => q.difficulty,
            Question::SliderInput(q) => q.difficulty,
        }
    }

    /// Points awarded for a correct answer.
    pub fn points(&self) -> u32 {
        match self {
            Question::MultipleChoice(q) => q.points,
            Question::DragDrop(q) => q.points,
            Question::Graph(q) => q.points,
            Question::Order(q) => q.points,
            Question::FillBlank(q) => q.points,
            Question::LineMatch(q) => q.points,
            Question::QuickTap(q) => q.points,
            Question::TypeIn(q) => q.points,
            Question::GraphPlot(q) => q.points,
            Question::SliderInput(q) => q.points,
        }
    }

    /// Optional explanation shown after answering. Irrelevant to evaluation.
    pub fn explanation(&self) -> Option<&str> {
        match self {
            Question::MultipleChoice(q) => q.explanation.as_deref(),
            Question::DragDrop(q) => q.explanation.as_deref(),
            Question::Graph(q) => q.explanation.as_deref(),
            Question::Order(q) => q.explanation.as_deref(),
            Question::FillBlank(q) => q.explanation.as_deref(),
            Question::LineMatch(q) => q.explanation.as_deref(),
            Question::QuickTap(q) => q.explanation.as_deref(),
            Question::TypeIn(q) => q.explanation.as_deref(),
            Question::GraphPlot(q) => q.explanation.as_deref(),
            Question::SliderInput(q) => q.explanation.as_deref(),
        }
    }

    /// The serialized discriminant of this variant (e.g. "multiple-choice").
    pub fn variant(&self) -> &'static str {
        match self {
            Question::MultipleChoice(_) => "multiple-choice",
            Question::DragDrop(_) => "drag-drop",
            Question::Graph(_) => "graph",
            Question::Order(_) => "order",
            Question::FillBlank(_) => "fill-blank",
            Question::LineMatch(_) => "line-match",
            Question::QuickTap(_) => "quick-tap",
            Question::TypeIn(_) => "type-in",
            Question::GraphPlot(_) => "graph-plot",
            Question::SliderInput(_) => "slider-input",
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id(), self.variant())
    }
}

/// Select one or more options from a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    /// Display order of the options; permuted by shuffling.
    pub options: Vec<QuestionItem>,
    /// Content strings of the correct options. Compared by content, not by
    /// position, so shuffling never invalidates them.
    pub correct_answers: Vec<String>,
    /// Presentation hint: allow selecting more than one option.
    #[serde(default)]
    pub multi_select: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Drag each item into its drop zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragDropQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub items: Vec<QuestionItem>,
    pub drop_zones: Vec<DropZone>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A target zone referencing its correct item by position-encoded id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropZone {
    pub id: String,
    /// `item-<index>` into the question's `items` list.
    pub correct_item_id: String,
    #[serde(default)]
    pub placeholder: Option<String>,
}

/// Parse an `item-<index>` reference into the index it encodes.
pub fn item_index(correct_item_id: &str) -> Option<usize> {
    correct_item_id.strip_prefix("item-")?.parse().ok()
}

/// Format an item index as an `item-<index>` reference.
pub fn item_id(index: usize) -> String {
    format!("item-{index}")
}

/// Place one or more points on a coordinate grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub correct_points: Vec<Point>,
    pub grid: GridConfig,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Arrange numbers by magnitude, or solution steps into sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    /// Sort direction (numbers form) or index permutation (steps form).
    pub correct_order: OrderKey,
    /// Numbers to arrange; used with [`OrderKey::Direction`].
    #[serde(default)]
    pub numbers: Vec<f64>,
    /// Solution steps to arrange; used with [`OrderKey::Permutation`].
    #[serde(default)]
    pub steps: Vec<OrderStep>,
    /// Starting equation displayed above the steps.
    #[serde(default)]
    pub initial_equation: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Answer key of an order question. The numbers form stores a sort
/// direction (value-keyed, untouched by shuffling); the steps form stores an
/// explicit permutation (index-keyed, rewritten by shuffling).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderKey {
    Direction(SortDirection),
    Permutation(Vec<usize>),
}

/// Direction for number-ordering questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One step in a step-ordering question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStep {
    pub text: String,
    pub equation: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Type the answer into each blank embedded in the question text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillBlankQuestion {
    pub id: String,
    /// Question text with `{n}` placeholder markers, one per blank position.
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub blanks: Vec<Blank>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A single blank with its answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blank {
    pub id: String,
    pub answer: String,
    /// The `{n}` marker in the question text this blank fills.
    pub position: u32,
    #[serde(default)]
    pub acceptable_answers: Vec<String>,
}

/// Connect each left item to its matching right item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineMatchQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub left_items: Vec<QuestionItem>,
    pub right_items: Vec<QuestionItem>,
    /// A bijection over `left_items` positions.
    pub correct_connections: Vec<Connection>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Tap the correct items before the timer runs out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickTapQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub items: Vec<TapItem>,
    /// Time limit in seconds.
    pub time_limit: u32,
    /// Minimum correct taps needed under the threshold policy.
    pub min_correct: u32,
    /// Which correctness policy applies to this question.
    #[serde(default)]
    pub policy: TapPolicy,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// One tappable item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapItem {
    pub text: QuestionItem,
    pub is_correct: bool,
}

/// Correctness policy for a quick-tap question. Stored explicitly on the
/// question record; both policies use `min_correct`, so the field's presence
/// cannot distinguish them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TapPolicy {
    /// Every correct item tapped and no incorrect item tapped.
    #[default]
    Exact,
    /// At least `min_correct` correct taps before the time limit expires.
    Threshold,
}

/// Type a free-form answer, optionally validated as number/text/formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub correct_answer: String,
    #[serde(default)]
    pub acceptable_answers: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub validation: Option<ValidationRule>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Input validation descriptor for a type-in question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    pub kind: ValidationKind,
    /// Lowest accepted numeric value.
    #[serde(default)]
    pub min: Option<f64>,
    /// Highest accepted numeric value.
    #[serde(default)]
    pub max: Option<f64>,
    /// Maximum decimal places accepted in the raw input.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Require a whole number.
    #[serde(default)]
    pub integer: bool,
    /// Accepted distance from the correct numeric value; exact equality
    /// when absent.
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// Regex the raw text input must match.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Kind of validation applied to type-in input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    Number,
    Text,
    Formula,
}

/// Plot a function whose curve must pass through the expected points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphPlotQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    /// Symbolic expression in `x`, e.g. `x**2 + 2*x + 1`.
    pub correct_function: String,
    pub grid: GridConfig,
    /// Sample points the submitted function must pass through. When empty,
    /// the submission is compared against `correct_function` at evenly
    /// spaced samples across the grid's x-range.
    #[serde(default)]
    pub check_points: Vec<Point>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Pick a value on a slider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderInputQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: u8,
    pub points: u32,
    pub min: f64,
    pub max: f64,
    pub correct_answer: f64,
    /// Accepted distance from the correct value. Defaults to 1.
    #[serde(default)]
    pub tolerance: Option<f64>,
    /// Display unit, e.g. "°".
    #[serde(default)]
    pub unit: Option<String>,
    /// Optional scenario text displayed above the slider.
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// An answer collected by the presentation layer, shaped per question
/// variant. A submission whose shape does not match the question's variant
/// always evaluates as incorrect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SubmittedAnswer {
    /// Selected option contents (multiple-choice).
    Choices { selected: Vec<String> },
    /// Zone id to placed item content (drag-drop).
    Placements { placed: HashMap<String, String> },
    /// Placed coordinates (graph).
    Points { points: Vec<Point> },
    /// Numbers in submitted display order (order, numbers form).
    NumberOrder { sequence: Vec<f64> },
    /// Step indices in submitted display order (order, steps form);
    /// `sequence[i]` is the index into the question's `steps` of the step
    /// placed at position `i`.
    StepOrder { sequence: Vec<usize> },
    /// Blank id to typed text (fill-blank).
    Blanks { entries: HashMap<String, String> },
    /// Submitted connections (line-match).
    Connections { connections: Vec<Connection> },
    /// Indices of tapped items plus elapsed time (quick-tap).
    Taps { indices: Vec<usize>, elapsed_ms: u64 },
    /// Free-form text (type-in).
    Text { input: String },
    /// Symbolic expression in `x` (graph-plot).
    Curve { expression: String },
    /// Numeric value (slider-input).
    Value { value: f64 },
}
