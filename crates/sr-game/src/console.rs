//! Player-facing text I/O.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::rc::Rc;

/// Where game text goes and where player input comes from.
pub trait Console: fmt::Debug {
    /// Show a block of text to the player.
    fn emit(&mut self, text: &str);

    /// Block until the player enters a line, returned without its newline.
    ///
    /// End of input is reported as the quit command so every interactive
    /// state can wind down normally.
    fn get_player_input(&mut self) -> io::Result<String>;

    /// Show a prompt, then read a line.
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.emit(text);
        self.get_player_input()
    }
}

/// Shared view of everything a [`MemoryConsole`] emitted.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Vec<String>>>);

impl Transcript {
    /// All emitted blocks, in order.
    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Whether any emitted block contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.0.borrow().iter().any(|l| l.contains(needle))
    }

    /// Number of emitted blocks.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// In-memory console fed from a script of inputs.
///
/// Once the script runs out every read returns `quit_command`.
#[derive(Debug)]
pub struct MemoryConsole {
    inputs: VecDeque<String>,
    quit_command: String,
    transcript: Transcript,
}

impl MemoryConsole {
    /// A console that will answer reads with `inputs`, then `"q"`.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            quit_command: "q".to_string(),
            transcript: Transcript::default(),
        }
    }

    /// Change what is returned after the script runs out.
    pub fn with_quit_command(mut self, command: impl Into<String>) -> Self {
        self.quit_command = command.into();
        self
    }

    /// Handle on the emitted text; stays valid after the console is boxed.
    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    /// Inputs not yet consumed.
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for MemoryConsole {
    fn emit(&mut self, text: &str) {
        self.transcript.0.borrow_mut().push(text.to_string());
    }

    fn get_player_input(&mut self) -> io::Result<String> {
        Ok(self
            .inputs
            .pop_front()
            .unwrap_or_else(|| self.quit_command.clone()))
    }
}
