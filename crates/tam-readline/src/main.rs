use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use tam_application::{
    ChatClient, ChatClientDeps, LoadOutcome, NewPatientOutcome, Route, register_patient,
};
use tam_core::TamError;
use tam_core::chat::ChatApi;
use tam_core::storage::ClientStorage;
use tam_infrastructure::config_storage::ENV_ENDPOINT;
use tam_infrastructure::{ConfigStorage, FileClientStorage, TamPaths};
use tam_interaction::HttpChatApi;

mod command;
mod helper;
mod logging;
mod prompts;
mod terminal_view;

use command::{COMMANDS, Command};
use helper::CliHelper;
use prompts::{EditorPrompter, TamEditor, read_registration};
use terminal_view::TerminalView;

#[derive(Parser)]
#[command(name = "tam")]
#[command(about = "Tam - chat with an AI health assistant from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the chat service
    #[arg(long, env = ENV_ENDPOINT)]
    endpoint: Option<String>,

    /// Key-value storage file holding the registered patient
    #[arg(long)]
    storage_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a patient and exit
    Register,
    /// Write a default config file if none exists
    InitConfig,
}

/// Why the chat loop handed control back.
enum ChatExit {
    Quit,
    Registration,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let config_storage = ConfigStorage::new()?;
    if matches!(cli.command, Some(Commands::InitConfig)) {
        if config_storage.ensure_file()? {
            println!("Wrote {}", config_storage.path().display());
        } else {
            println!("{} already exists", config_storage.path().display());
        }
        return Ok(());
    }

    let mut config = config_storage.load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(path) = cli.storage_file {
        config.storage_file = Some(path);
    }
    config.validate()?;

    let _log_guard = logging::init_logging(&TamPaths::logs_dir()?, &config.log_level)?;
    tracing::info!(endpoint = %config.endpoint, "tam starting");

    // ===== Collaborators =====
    let storage: Arc<dyn ClientStorage> = Arc::new(match &config.storage_file {
        Some(path) => FileClientStorage::with_path(path.clone()),
        None => FileClientStorage::open_default()?,
    });
    let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(&config));

    let mut rl: TamEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    // Replies arrive on background tasks; print them above the prompt
    let view = Arc::new(match rl.create_external_printer() {
        Ok(printer) => TerminalView::with_printer(config.assistant_name.clone(), Box::new(printer)),
        Err(err) => {
            tracing::warn!(error = %err, "No external printer, writing replies to stdout");
            TerminalView::new(config.assistant_name.clone())
        }
    });

    if matches!(cli.command, Some(Commands::Register)) {
        register(&mut rl, storage.as_ref())?;
        return Ok(());
    }

    println!("{}", "=== Tam ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or '/quit' to exit.".bright_black()
    );
    println!();

    // ===== Load, chat, and re-register until the user quits =====
    loop {
        let deps = ChatClientDeps {
            api: Arc::clone(&api),
            storage: Arc::clone(&storage),
            view: view.clone(),
            assistant_name: config.assistant_name.clone(),
        };

        let client = match ChatClient::load(deps).await? {
            LoadOutcome::Ready(client) => client,
            LoadOutcome::RegistrationRequired => {
                if register(&mut rl, storage.as_ref())? {
                    continue;
                }
                break;
            }
        };

        match run_chat(&mut rl, &client).await? {
            ChatExit::Quit => break,
            ChatExit::Registration => {
                if !register(&mut rl, storage.as_ref())? {
                    break;
                }
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    tracing::info!("tam exiting");
    Ok(())
}

/// Reads lines until the user quits or asks for a new patient.
///
/// Each chat message runs on its own task so the prompt comes back at once;
/// replies print whenever they arrive.
async fn run_chat(rl: &mut TamEditor, client: &ChatClient) -> Result<ChatExit> {
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match Command::parse(trimmed) {
                    Some(Command::Quit) => return Ok(ChatExit::Quit),
                    Some(Command::Help) => print_help(),
                    Some(Command::NewChat) => {
                        // The /new-chat call finishes in the background
                        let _ = client.start_new_chat(&mut EditorPrompter::new(rl)).await;
                    }
                    Some(Command::NewPatient) => {
                        match client.start_new_patient(&mut EditorPrompter::new(rl)).await? {
                            NewPatientOutcome::Cancelled => {}
                            NewPatientOutcome::Redirect(Route::Registration) => {
                                return Ok(ChatExit::Registration);
                            }
                        }
                    }
                    Some(Command::Unknown(name)) => {
                        println!("{}", format!("Unknown command {}", name).bright_black());
                    }
                    None => {
                        let client = client.clone();
                        let input = trimmed.to_string();
                        tokio::spawn(async move {
                            let outcome = client.submit(&input).await;
                            tracing::debug!(?outcome, "Message handled");
                        });
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => return Ok(ChatExit::Quit),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Runs the registration prompts until a valid profile is stored.
///
/// Returns `false` if the user backed out.
fn register(rl: &mut TamEditor, storage: &dyn ClientStorage) -> Result<bool> {
    println!("{}", "Patient registration".bright_magenta().bold());
    println!(
        "{}",
        "First and last name are required. Press CTRL-C to cancel.".bright_black()
    );

    loop {
        let Some(form) = read_registration(|prompt| rl.readline(prompt))? else {
            println!("{}", "Registration cancelled.".yellow());
            return Ok(false);
        };

        match register_patient(storage, &form) {
            Ok(profile) => {
                println!(
                    "{}",
                    format!("Registered {}.", profile.full_name()).bright_green()
                );
                println!();
                return Ok(true);
            }
            Err(err @ TamError::Validation { .. }) => {
                println!("{}", err.to_string().red());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn print_help() {
    for (name, description) in COMMANDS {
        println!("  {}  {}", name.bright_cyan(), description.bright_black());
    }
}
