//! Line-input sources for interactive prompts.
//!
//! Bootstrap reads every operator answer through [`LineInput`], so the
//! terminal can be swapped for a scripted source.

use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};

/// Source of operator-typed lines.
pub trait LineInput {
    /// Show `prompt` and read one line without its trailing newline.
    ///
    /// `hidden` asks the source not to echo the answer. `Ok(None)` means the
    /// input reached end-of-file.
    fn read_line(&mut self, prompt: &str, hidden: bool) -> io::Result<Option<String>>;
}

/// Terminal-backed input. Prompts go to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinInput;

impl LineInput for StdinInput {
    fn read_line(&mut self, prompt: &str, hidden: bool) -> io::Result<Option<String>> {
        if hidden && io::stdin().is_terminal() {
            return rpassword::prompt_password(prompt).map(Some);
        }

        let mut stderr = io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            eprintln!();
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Pre-recorded answers, consumed in order.
///
/// Every prompt shown is recorded so callers can assert on what was asked.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineInput for ScriptedInput {
    fn read_line(&mut self, prompt: &str, _hidden: bool) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
