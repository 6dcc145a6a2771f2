//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::parser;
use quizkit_core::validate::validate_bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        vec![parser::parse_bank(&bank_path)?]
    };

    let mut total_errors = 0;

    for bank in &banks {
        println!("Bank: {} ({} questions)", bank.name, bank.questions.len());

        let errors = validate_bank(bank);
        for e in &errors {
            println!("  ERROR: {e}");
        }
        total_errors += errors.len();
    }

    if total_errors == 0 {
        println!("All banks valid.");
        Ok(())
    } else {
        anyhow::bail!("{total_errors} validation error(s) found")
    }
}
