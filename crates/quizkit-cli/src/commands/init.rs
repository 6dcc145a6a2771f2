//! The `quizkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizkit.toml
    if std::path::Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit banks/example.toml with your own questions");
    println!("  2. Run: quizkit validate --bank banks/example.toml");
    println!("  3. Run: quizkit simulate --bank banks/example.toml --seed 1");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

[adaptive]
# Consecutive correct answers before the difficulty rises.
streak_to_advance = 3
# Window (ms) during which a second answer submission is dropped.
debounce_ms = 2000
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small starter bank to get going"

[[questions]]
type = "multiple-choice"
id = "ex-1"
question = "What is 2 + 2?"
difficulty = 1
points = 10
options = ["4", "5", "6"]
correct_answers = ["4"]
explanation = "Two plus two makes four."

[[questions]]
type = "slider-input"
id = "ex-2"
question = "Slide to 30"
difficulty = 1
points = 10
min = 0.0
max = 90.0
correct_answer = 30.0
tolerance = 2.0

[[questions]]
type = "type-in"
id = "ex-3"
question = "Write one half as a decimal"
difficulty = 2
points = 15
correct_answer = "0.5"
acceptable_answers = [".5"]

[questions.validation]
kind = "number"
min = 0.0
max = 1.0
precision = 2
tolerance = 0.01

[[questions]]
type = "order"
id = "ex-4"
question = "Arrange from smallest to largest"
difficulty = 2
points = 15
numbers = [0.75, 0.25, 0.5]
correct_order = "ascending"
"#;
