use anyhow::{Context, Result};
use std::fmt::Debug;
use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question.
pub trait Prompt: Debug {
    /// # Errors
    /// Fails if the answer cannot be read.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Reads answers from stdin; anything but `y`/`yes` means no.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "❓ {question} [y/N] ")?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer).context("Failed to read the answer")?;
        Ok(is_yes(&answer))
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
