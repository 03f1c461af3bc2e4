//! Command-line client for OpenAI-compatible chat endpoints.
//!
//! Sends one prompt, streams the reply to stdout as it arrives, and manages
//! the list of models kept in `~/.ai_cli_config`.
//!
//! # Usage
//!
//! ```bash
//! # Ask a question with the default model
//! ai-cli how do I list open ports
//!
//! # Pipe the prompt in
//! git diff | ai-cli
//!
//! # Use another model for this invocation only
//! ai-cli --model gpt-4.1-mini explain this error
//!
//! # Pick the default model from a menu, or by name
//! ai-cli model
//! ai-cli model gpt-4.1-nano
//!
//! # Edit the model list
//! ai-cli add o3-mini
//! ai-cli remove
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use ai_cli::config::{Configuration, LoadOutcome, default_config_path};
use ai_cli::error::{EXIT_CONFIG_CREATED, EXIT_FAILURE};
use ai_cli::menu::{parse_selection, render_choices};
use ai_cli::observability::stream_totals;
use ai_cli::{ChatClient, Error, PlainTextRenderer, Renderer, Result};

const USAGE: &str = "ai-cli [OPTIONS] <PROMPT>...
       ai-cli [OPTIONS] model [NAME]
       ai-cli [OPTIONS] add <NAME>
       ai-cli [OPTIONS] remove";

/// Command-line arguments for ai-cli.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct Args {
    /// Model to use for this invocation instead of the configured default.
    #[arrrg(optional, "Model to use (overrides the configured default)", "MODEL")]
    model: Option<String>,

    /// Alternate configuration file.
    #[arrrg(optional, "Configuration file (default: ~/.ai_cli_config)", "PATH")]
    config: Option<String>,

    /// Print timing and stream statistics to stderr.
    #[arrrg(flag, "Print timing and stream statistics to stderr")]
    verbose: bool,
}

/// What the free arguments ask for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Prompt(Vec<String>),
    Model(Option<String>),
    Add(String),
    Remove,
}

impl Command {
    /// Returns `None` when a model command has the wrong number of arguments.
    fn parse(mut free: Vec<String>) -> Option<Self> {
        let Some(first) = free.first().cloned() else {
            return Some(Command::Prompt(free));
        };
        match (first.as_str(), free.len()) {
            ("model", 1) => Some(Command::Model(None)),
            ("model", 2) => free.pop().map(|name| Command::Model(Some(name))),
            ("add", 2) => free.pop().map(Command::Add),
            ("remove", 1) => Some(Command::Remove),
            ("model" | "add" | "remove", _) => None,
            _ => Some(Command::Prompt(free)),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (args, free) = Args::from_command_line_relaxed(USAGE);

    let Some(command) = Command::parse(free) else {
        eprintln!("Usage: {USAGE}");
        std::process::exit(EXIT_FAILURE);
    };

    if let Err(err) = run(args, command).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(args: Args, command: Command) -> Result<()> {
    let path = match args.config {
        Some(path) => PathBuf::from(path),
        None => default_config_path()?,
    };

    let mut config = match Configuration::load_or_create(&path)? {
        LoadOutcome::Loaded(config) => config,
        LoadOutcome::Created { path } => {
            eprintln!(
                "Configuration file not found. Created default config at: {}",
                path.display()
            );
            eprintln!(
                "\nIMPORTANT: Please edit '{}' to add your API key and customize settings. Then run the command again.",
                path.display()
            );
            std::process::exit(EXIT_CONFIG_CREATED);
        }
    };

    match command {
        Command::Prompt(words) => {
            let prompt = read_prompt(words)?;
            if prompt.is_empty() {
                println!("Usage: {USAGE}");
                return Ok(());
            }
            let model = args.model.unwrap_or_else(|| config.default_model.clone());
            ask(&config, &model, &prompt, args.verbose).await
        }
        Command::Model(Some(name)) => {
            config.set_default_model(&name)?;
            config.save(&path)?;
            println!("Default model set to '{name}'");
            Ok(())
        }
        Command::Model(None) => {
            if config.models.is_empty() {
                eprintln!("No models configured. Add one with `ai-cli add <NAME>`.");
                return Ok(());
            }
            let prompt = format!(
                "Select the default model (current: {}), Enter to cancel: ",
                config.default_model
            );
            let Some(index) = choose(&config, &prompt)? else {
                println!("Cancelled.");
                return Ok(());
            };
            let name = config.models[index].clone();
            config.set_default_model(&name)?;
            config.save(&path)?;
            println!("Default model set to '{name}'");
            Ok(())
        }
        Command::Add(name) => {
            config.add_model(&name)?;
            config.save(&path)?;
            println!("Model '{}' added.", name.trim());
            Ok(())
        }
        Command::Remove => {
            if config.models.is_empty() {
                eprintln!("No models configured; nothing to remove.");
                return Ok(());
            }
            let Some(index) = choose(&config, "Select a model to remove, Enter to cancel: ")?
            else {
                println!("Cancelled.");
                return Ok(());
            };
            let removed = config.remove_model(index)?;
            config.save(&path)?;
            println!("Model '{removed}' removed.");
            Ok(())
        }
    }
}

/// Joins the free arguments, or reads the prompt from stdin when it is piped.
fn read_prompt(words: Vec<String>) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut prompt = String::new();
    stdin
        .read_to_string(&mut prompt)
        .map_err(|err| Error::io(format!("failed to read from stdin: {err}"), err))?;
    Ok(prompt.trim().to_string())
}

/// Shows the model menu and returns the chosen index, or `None` on cancel.
fn choose(config: &Configuration, prompt: &str) -> Result<Option<usize>> {
    println!("Available models:");
    print!("{}", render_choices(&config.models, &config.default_model));

    let mut rl = DefaultEditor::new().map_err(readline_error)?;
    let line = match rl.readline(prompt) {
        Ok(line) => line,
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(None),
        Err(err) => return Err(readline_error(err)),
    };
    parse_selection(&line, config.models.len())
}

fn readline_error(err: ReadlineError) -> Error {
    Error::io(
        format!("failed to read selection: {err}"),
        io::Error::other(err.to_string()),
    )
}

async fn ask(config: &Configuration, model: &str, prompt: &str, verbose: bool) -> Result<()> {
    let client = ChatClient::new(config)?;
    let mut renderer = PlainTextRenderer::new();
    let result = client.send(model, prompt, &mut renderer).await;

    if verbose {
        let totals = stream_totals();
        renderer.print_info(&format!("Model: {model}"));
        renderer.print_info(&format!("Endpoint: {}", client.endpoint()));
        if let Ok(summary) = &result {
            renderer.print_info(&format!("Duration: {:?}", summary.elapsed));
            if let Some(ttfb) = summary.time_to_first_fragment {
                renderer.print_info(&format!("Time to first fragment: {ttfb:?}"));
            }
        }
        renderer.print_info(&format!("Fragments: {}", totals.fragments));
        renderer.print_info(&format!("Bytes received: {}", totals.bytes));
        renderer.print_info(&format!("Discarded lines: {}", totals.discarded_lines));
    }

    result.map(|_| ())
}
