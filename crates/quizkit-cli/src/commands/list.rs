//! The `quizkit list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizkit_core::parser;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        vec![parser::parse_bank(&bank_path)?]
    };

    if banks.is_empty() {
        println!("No banks found in {}", bank_path.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Bank", "Name", "Questions", "D1", "D2", "D3", "D4"]);

    for bank in &banks {
        let count_at = |level: u8| {
            bank.questions
                .iter()
                .filter(|q| q.difficulty() == level)
                .count()
        };
        table.add_row(vec![
            Cell::new(&bank.id),
            Cell::new(&bank.name),
            Cell::new(bank.questions.len()),
            Cell::new(count_at(1)),
            Cell::new(count_at(2)),
            Cell::new(count_at(3)),
            Cell::new(count_at(4)),
        ]);
    }

    println!("{table}");
    Ok(())
}
