//! Line-oriented prompting over injected input/output streams.
//!
//! CHANGELOG:
//! - 10/17/2026 - Bounded retry loop replaces recursive reprompting

use super::SessionError;
use std::io::{BufRead, Write};

/// Reads answers from `input`, writes prompts and messages to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Print `prompt` and read one line without its line ending.
    ///
    /// End of input is reported as `SessionError::InputClosed`.
    pub fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Print a message on its own line.
    pub fn say(&mut self, message: &str) -> Result<(), SessionError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Run `attempt` until it yields a value, at most `max_attempts` times.
    ///
    /// `attempt` returns `Ok(None)` to ask again. `what` names the input in
    /// the error raised when the bound is hit.
    pub fn retry<T, F>(&mut self, what: &'static str, mut attempt: F) -> Result<T, SessionError>
    where
        F: FnMut(&mut Self) -> Result<Option<T>, SessionError>,
    {
        for _ in 0..self.max_attempts {
            if let Some(value) = attempt(self)? {
                return Ok(value);
            }
        }
        Err(SessionError::TooManyAttempts(what))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
