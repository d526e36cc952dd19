//! Line-oriented input sources for interactive prompts

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Errors while reading user input
#[derive(Error, Debug)]
pub enum InputError {
    /// Input stream closed (Ctrl-D or end of piped input)
    #[error("input closed")]
    Closed,

    /// Ctrl-C at a prompt
    #[error("interrupted")]
    Interrupted,

    #[error("could not read input: {0}")]
    Readline(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Source of user-typed lines
pub trait LineSource {
    /// Show `prompt` and read one line, without the trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// [`LineSource`] backed by a rustyline editor with in-memory history
pub struct TerminalLineSource {
    editor: DefaultEditor,
}

impl TerminalLineSource {
    pub fn new() -> Result<Self, InputError> {
        let editor = DefaultEditor::new().map_err(map_readline_error)?;
        Ok(Self { editor })
    }
}

impl LineSource for TerminalLineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
        let line = self.editor.readline(prompt).map_err(map_readline_error)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
        }
        Ok(line)
    }
}

fn map_readline_error(e: ReadlineError) -> InputError {
    match e {
        ReadlineError::Eof => InputError::Closed,
        ReadlineError::Interrupted => InputError::Interrupted,
        ReadlineError::Io(io) => InputError::Io(io),
        other => InputError::Readline(other.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted lines and records the prompts it was shown
    #[derive(Default)]
    pub struct ScriptedLines {
        lines: VecDeque<String>,
        pub prompts: Vec<String>,
    }

    impl ScriptedLines {
        pub fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl LineSource for ScriptedLines {
        fn read_line(&mut self, prompt: &str) -> Result<String, InputError> {
            self.prompts.push(prompt.to_string());
            self.lines.pop_front().ok_or(InputError::Closed)
        }
    }
}
