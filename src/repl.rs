//! Line-oriented command interface on top of a [`Calculator`].
//!
//! This module turns one line of user input into a reply. Reading lines
//! from a terminal is left to the binary.

use crate::calculator::Calculator;
use crate::error::{CalcError, Result};
use crate::operations::OperationRegistry;
use crate::validation::normalize_name;
use std::fmt::Write;

/// A parsed REPL command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// `<op> <a> <b>`; operands are validated by the calculator.
    Calculate {
        operation: String,
        a: String,
        b: String,
    },
    History,
    Clear,
    Undo,
    Redo,
    Save,
    Load,
    Operations,
    Help,
    Exit,
}

impl Command {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str, registry: &OperationRegistry) -> Result<Option<Command>> {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(None);
        };
        let word = normalize_name(first);
        let args: Vec<&str> = tokens.collect();

        let command = match word.as_str() {
            "history" => Command::History,
            "clear" => Command::Clear,
            "undo" => Command::Undo,
            "redo" => Command::Redo,
            "save" => Command::Save,
            "load" => Command::Load,
            "operations" => Command::Operations,
            "help" => Command::Help,
            "exit" | "quit" => Command::Exit,
            _ if registry.contains(&word) => {
                let [a, b] = args.as_slice() else {
                    return Err(CalcError::Validation(format!(
                        "'{word}' requires exactly 2 numeric arguments (usage: {word} <a> <b>)"
                    )));
                };
                return Ok(Some(Command::Calculate {
                    operation: word,
                    a: a.to_string(),
                    b: b.to_string(),
                }));
            }
            _ => {
                return Err(CalcError::Validation(format!(
                    "Unknown command: '{word}'. Type 'help' for a list of commands."
                )))
            }
        };

        if !args.is_empty() {
            return Err(CalcError::Validation(format!(
                "'{word}' does not take any arguments"
            )));
        }
        Ok(Some(command))
    }
}

/// Result of handling one line.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    /// Text to show the user (may be empty).
    pub text: String,
    /// Whether the session should end.
    pub exit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }

    fn error(e: &CalcError) -> Self {
        Self::text(format!("{}: {}", e.category().label(), e))
    }
}

/// Drives a calculator from text commands.
pub struct Repl {
    calculator: Calculator,
}

impl Repl {
    pub fn new(calculator: Calculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Greeting shown when an interactive session starts.
    pub fn banner(&self) -> String {
        "Calculator ready. Type 'help' for commands, 'exit' to quit.".to_string()
    }

    /// Handle one line of input. Errors are turned into reply text.
    pub fn dispatch(&mut self, line: &str) -> Reply {
        match Command::parse(line, self.calculator.registry()) {
            Ok(None) => Reply::text(""),
            Ok(Some(command)) => self.execute(command).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "command failed");
                Reply::error(&e)
            }),
            Err(e) => Reply::error(&e),
        }
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        let calc = &mut self.calculator;
        let reply = match command {
            Command::Calculate { operation, a, b } => {
                let record = calc.calculate(&operation, &a, &b)?;
                Reply::text(format!("Result: {}", calc.format_value(record.result())))
            }
            Command::History => Reply::text(self.render_history()),
            Command::Clear => {
                if calc.clear() {
                    Reply::text("History cleared.")
                } else {
                    Reply::text("History is already empty.")
                }
            }
            Command::Undo => {
                calc.undo()?;
                Reply::text(format!("Undo successful.\n{}", self.render_history()))
            }
            Command::Redo => {
                calc.redo()?;
                Reply::text(format!("Redo successful.\n{}", self.render_history()))
            }
            Command::Save => {
                let count = calc.save()?;
                Reply::text(format!(
                    "Saved {count} calculation(s) to {}",
                    calc.history_file().path().display()
                ))
            }
            Command::Load => {
                let count = calc.load()?;
                Reply::text(format!(
                    "Loaded {count} calculation(s) from {}",
                    calc.history_file().path().display()
                ))
            }
            Command::Operations => Reply::text(self.render_operations()),
            Command::Help => Reply::text(self.render_help()),
            Command::Exit => self.shutdown(),
        };
        Ok(reply)
    }

    /// Run lines non-interactively, stopping at `exit`. The session always
    /// ends through [`Repl::shutdown`], so the last reply has `exit` set.
    pub fn run_batch<S: AsRef<str>>(&mut self, lines: &[S]) -> Vec<Reply> {
        let mut replies = Vec::with_capacity(lines.len() + 1);
        for line in lines {
            let reply = self.dispatch(line.as_ref());
            let exit = reply.exit;
            replies.push(reply);
            if exit {
                return replies;
            }
        }
        replies.push(self.shutdown());
        replies
    }

    /// Final reply for a session ending, saving first when auto-save is on.
    pub fn shutdown(&mut self) -> Reply {
        let mut text = String::new();
        if self.calculator.config().auto_save {
            match self.calculator.save() {
                Ok(_) => text.push_str("History saved.\n"),
                Err(e) => {
                    let _ = writeln!(text, "Warning: could not save history: {e}");
                }
            }
        }
        text.push_str("Goodbye!");
        Reply { text, exit: true }
    }

    fn render_history(&self) -> String {
        let history = self.calculator.history();
        if history.is_empty() {
            return "No calculations in history.".to_string();
        }
        let mut out = String::from("Calculation history:");
        for (i, record) in history.iter().enumerate() {
            let _ = write!(
                out,
                "\n  {}. [{}] {} {} {} = {}",
                i + 1,
                record.timestamp(),
                self.calculator.format_value(record.operand_a()),
                record.operation(),
                self.calculator.format_value(record.operand_b()),
                self.calculator.format_value(record.result()),
            );
        }
        out
    }

    fn render_operations(&self) -> String {
        let registry = self.calculator.registry();
        let mut out = String::from("Available operations:");
        for name in registry.names() {
            let _ = write!(out, "\n  {name}");
        }
        out
    }

    fn render_help(&self) -> String {
        let registry = self.calculator.registry();
        let names = registry.names();
        let width = names
            .iter()
            .map(|n| n.len() + " <a> <b>".len())
            .max()
            .unwrap_or(0)
            .max("exit | quit".len());

        let mut out = String::from("Operations:");
        for name in &names {
            let usage = format!("{name} <a> <b>");
            let description = registry.describe(name).unwrap_or("");
            let _ = write!(out, "\n  {usage:<width$}  {description}");
        }
        out.push_str("\n\nHistory:");
        for (usage, description) in [
            ("history", "Show calculation history"),
            ("clear", "Clear calculation history"),
            ("undo", "Undo the last change to history"),
            ("redo", "Redo the last undone change"),
            ("save", "Save history to the CSV file"),
            ("load", "Load history from the CSV file"),
        ] {
            let _ = write!(out, "\n  {usage:<width$}  {description}");
        }
        out.push_str("\n\nOther:");
        for (usage, description) in [
            ("operations", "List available operations"),
            ("help", "Show this help"),
            ("exit | quit", "Leave the calculator"),
        ] {
            let _ = write!(out, "\n  {usage:<width$}  {description}");
        }
        out
    }
}
