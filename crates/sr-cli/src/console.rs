//! Terminal console: game text on stdout, player input from stdin.

use std::fmt;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use sr_game::Console;

/// Line-based console over a reader and a writer.
///
/// End of input reads as the quit command, so every interactive state
/// winds down when stdin closes.
pub struct StdConsole {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    quit_command: String,
}

impl StdConsole {
    /// Console on the process's stdin and stdout.
    pub fn new(quit_command: &str) -> Self {
        Self::with_io(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
            quit_command,
        )
    }

    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>, quit_command: &str) -> Self {
        Self {
            input,
            output,
            quit_command: quit_command.to_string(),
        }
    }

    fn write(&mut self, text: &str) {
        let written = write!(self.output, "{text}").and_then(|()| self.output.flush());
        if let Err(e) = written {
            tracing::warn!("cannot write to console: {e}");
        }
    }
}

impl fmt::Debug for StdConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdConsole")
            .field("quit_command", &self.quit_command)
            .finish_non_exhaustive()
    }
}

impl Console for StdConsole {
    fn emit(&mut self, text: &str) {
        self.write(&format!("{text}\n"));
    }

    fn get_player_input(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            tracing::debug!("end of input");
            return Ok(self.quit_command.clone());
        }
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.write(&text.cyan().bold().to_string());
        self.get_player_input()
    }
}
