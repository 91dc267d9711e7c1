use clap::Parser;
use reckon::{Calculator, CalculatorConfig, Repl};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;

/// Interactive calculator with undo/redo and CSV history.
#[derive(Debug, Parser)]
#[command(name = "reckon", version, about)]
struct Args {
    /// CSV file used for save, load and auto-save.
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Maximum number of calculations kept in history.
    #[arg(long)]
    max_history: Option<usize>,

    /// Disable saving history after every change.
    #[arg(long)]
    no_auto_save: bool,

    /// Log filter directive (e.g. `info`, `reckon=debug`).
    #[arg(long)]
    log_level: Option<String>,

    /// Run a command non-interactively; may be repeated.
    #[arg(short, long = "eval", value_name = "COMMAND")]
    eval: Vec<String>,
}

impl Args {
    fn apply(self, config: &mut CalculatorConfig) -> Vec<String> {
        if let Some(path) = self.history_file {
            config.history_file = path;
        }
        if let Some(size) = self.max_history {
            config.max_history_size = size;
        }
        if self.no_auto_save {
            config.auto_save = false;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        self.eval
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = match CalculatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let eval = args.apply(&mut config);
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = reckon::logging::init(&config) {
        eprintln!("Configuration error: {e}");
        return ExitCode::FAILURE;
    }

    let mut repl = Repl::new(Calculator::new(config));

    if !eval.is_empty() {
        for reply in repl.run_batch(&eval) {
            print_reply(&reply.text);
        }
        tracing::info!("calculator exiting");
        return ExitCode::SUCCESS;
    }

    run_interactive(&mut repl)
}

fn run_interactive(repl: &mut Repl) -> ExitCode {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Failed to start line editor: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", repl.banner());
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                let reply = repl.dispatch(&line);
                print_reply(&reply.text);
                if reply.exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use 'exit' to quit.");
            }
            Err(ReadlineError::Eof) => {
                print_reply(&repl.shutdown().text);
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                tracing::error!(error = %e, "readline failed");
                break;
            }
        }
    }

    tracing::info!("calculator exiting");
    ExitCode::SUCCESS
}

fn print_reply(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}
