//! Interactive input for passwords and return amounts.

use std::io::{self, BufRead, Write};

/// Source of typed answers.
pub trait Prompt {
    /// Read a secret without echo.
    fn password(&self, label: &str) -> io::Result<String>;

    /// Read one line, trimmed. End of input reads as empty.
    fn line(&self, label: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn password(&self, label: &str) -> io::Result<String> {
        rpassword::prompt_password(label)
    }

    fn line(&self, label: &str) -> io::Result<String> {
        print!("{}", label);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}
