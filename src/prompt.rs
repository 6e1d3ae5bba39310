//! Interactive input
//!
//! Everything that asks the user something goes through [`Prompter`], so the
//! login flow can be driven by a script in tests.

use std::io::{self, BufRead, Write};

use crate::error::{PewError, PewResult};

pub trait Prompter {
    /// Show `prompt` and read one line of visible input, without the newline
    fn read_line(&mut self, prompt: &str) -> PewResult<String>;

    /// Show `prompt` and read one line without echoing it
    fn read_secret(&mut self, prompt: &str) -> PewResult<String>;

    /// Print an informational message
    fn notice(&mut self, message: &str);
}

/// Reads from stdin, hides secrets with rpassword
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> PewResult<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| PewError::Prompt(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Err(PewError::Prompt("Unexpected end of input".into()));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> PewResult<String> {
        rpassword::prompt_password(prompt)
            .map_err(|e| PewError::Prompt(format!("Failed to read password: {}", e)))
    }

    fn notice(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Replays canned answers, in order. Test helper.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub answers: std::collections::VecDeque<String>,
    pub prompts: Vec<String>,
    pub notices: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }

    fn next(&mut self, prompt: &str) -> PewResult<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| PewError::Prompt("script exhausted".into()))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> PewResult<String> {
        self.next(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> PewResult<String> {
        self.next(prompt)
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}
